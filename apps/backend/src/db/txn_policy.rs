use std::sync::OnceLock;

use sea_orm::{DatabaseTransaction, DbErr};

/// How `with_txn` finishes a transaction whose closure returned `Ok`.
///
/// Failed closures always roll back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxnPolicy {
    #[default]
    CommitOnOk,
    /// Test binaries that exercise handlers against a shared database set
    /// this so nothing they do is persisted.
    RollbackOnOk,
}

impl TxnPolicy {
    pub(crate) async fn finish(self, txn: DatabaseTransaction) -> Result<(), DbErr> {
        match self {
            TxnPolicy::CommitOnOk => txn.commit().await,
            TxnPolicy::RollbackOnOk => txn.rollback().await,
        }
    }
}

static POLICY: OnceLock<TxnPolicy> = OnceLock::new();

pub fn current() -> TxnPolicy {
    POLICY.get().copied().unwrap_or_default()
}

/// Fix the policy for this process. Later calls are ignored.
pub fn set_txn_policy(policy: TxnPolicy) {
    if POLICY.set(policy).is_err() && current() != policy {
        tracing::warn!(requested = ?policy, active = ?current(), "txn policy already set");
    }
}
