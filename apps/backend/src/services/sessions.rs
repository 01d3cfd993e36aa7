//! Login sessions. A player counts as online while one of their rows is unexpired.

use std::time::Duration;

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::adapters::sessions_sea::SessionCreate;
use crate::error::AppError;
use crate::repos::sessions::{self, PlayerSession};

pub struct SessionService;

impl SessionService {
    pub fn new() -> Self {
        Self
    }

    pub async fn open_session<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        player_id: i64,
        now: OffsetDateTime,
        ttl: Duration,
    ) -> Result<PlayerSession, AppError> {
        let session = sessions::create_session(
            conn,
            SessionCreate {
                id: uuid::Uuid::new_v4().to_string(),
                player_id,
                expires_at: now + ttl,
            },
        )
        .await?;
        debug!(player_id, session_id = %session.id, "Session opened");
        Ok(session)
    }

    /// Idempotent; closing an unknown session is not an error.
    pub async fn close_session<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: &str,
    ) -> Result<(), AppError> {
        if sessions::delete_session(conn, session_id).await? {
            debug!(session_id, "Session closed");
        }
        Ok(())
    }

    pub async fn find_active<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        session_id: &str,
        now: OffsetDateTime,
    ) -> Result<Option<PlayerSession>, AppError> {
        let session = sessions::find_by_id(conn, session_id).await?;
        Ok(session.filter(|s| s.is_active_at(now)))
    }

    pub async fn purge_expired<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        now: OffsetDateTime,
    ) -> Result<u64, AppError> {
        let removed = sessions::delete_expired(conn, now).await?;
        if removed > 0 {
            info!(removed, "Expired sessions purged");
        }
        Ok(removed)
    }
}

impl Default for SessionService {
    fn default() -> Self {
        Self::new()
    }
}
