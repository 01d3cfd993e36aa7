//! Player session repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::sessions_sea::{self as sessions_adapter, SessionCreate};
use crate::entities::player_sessions;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSession {
    pub id: String,
    pub player_id: i64,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl PlayerSession {
    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at >= now
    }
}

pub async fn create_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<PlayerSession, DomainError> {
    let session = sessions_adapter::create(conn, dto).await?;
    Ok(PlayerSession::from(session))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<Option<PlayerSession>, DomainError> {
    let session = sessions_adapter::find_by_id(conn, id).await?;
    Ok(session.map(PlayerSession::from))
}

pub async fn delete_session<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<bool, DomainError> {
    Ok(sessions_adapter::delete(conn, id).await? > 0)
}

pub async fn delete_expired<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: OffsetDateTime,
) -> Result<u64, DomainError> {
    Ok(sessions_adapter::delete_expired(conn, now).await?)
}

impl From<player_sessions::Model> for PlayerSession {
    fn from(model: player_sessions::Model) -> Self {
        Self {
            id: model.id,
            player_id: model.player_id,
            created_at: model.created_at,
            expires_at: model.expires_at,
        }
    }
}
