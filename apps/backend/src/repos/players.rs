//! Player repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::players_sea::{self as players_adapter, PlayerCreate, PlayerUpdate};
use crate::entities::players;
use crate::errors::domain::DomainError;

/// Player domain model. The password hash never leaves this layer serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub date_joined: OffsetDateTime,
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_id(conn, id).await?;
    Ok(player.map(Player::from))
}

pub async fn find_by_nickname<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    nickname: &str,
) -> Result<Option<Player>, DomainError> {
    let player = players_adapter::find_by_nickname(conn, nickname).await?;
    Ok(player.map(Player::from))
}

pub async fn create_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<Player, DomainError> {
    let player = players_adapter::create(conn, dto).await?;
    Ok(Player::from(player))
}

pub async fn update_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerUpdate,
) -> Result<Player, DomainError> {
    let player = players_adapter::update(conn, dto).await?;
    Ok(Player::from(player))
}

/// Returns whether a row was removed.
pub async fn delete_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, DomainError> {
    Ok(players_adapter::delete(conn, id).await? > 0)
}

pub async fn list_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Player>, DomainError> {
    let rows = players_adapter::list(conn).await?;
    Ok(rows.into_iter().map(Player::from).collect())
}

pub async fn find_online<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: OffsetDateTime,
) -> Result<Vec<Player>, DomainError> {
    let rows = players_adapter::find_online(conn, now).await?;
    Ok(rows.into_iter().map(Player::from).collect())
}

impl From<players::Model> for Player {
    fn from(model: players::Model) -> Self {
        Self {
            id: model.id,
            nickname: model.nickname,
            email: model.email,
            password_hash: model.password_hash,
            is_active: model.is_active,
            is_admin: model.is_admin,
            date_joined: model.date_joined,
        }
    }
}
