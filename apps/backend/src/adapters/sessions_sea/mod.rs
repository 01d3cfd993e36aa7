//! SeaORM adapter for player sessions.

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use time::OffsetDateTime;

use crate::entities::player_sessions;

pub mod dto;

pub use dto::SessionCreate;

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: SessionCreate,
) -> Result<player_sessions::Model, sea_orm::DbErr> {
    let active = player_sessions::ActiveModel {
        id: Set(dto.id),
        player_id: Set(dto.player_id),
        created_at: Set(OffsetDateTime::now_utc()),
        expires_at: Set(dto.expires_at),
    };

    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<Option<player_sessions::Model>, sea_orm::DbErr> {
    player_sessions::Entity::find_by_id(id.to_owned())
        .one(conn)
        .await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: &str,
) -> Result<u64, sea_orm::DbErr> {
    let result = player_sessions::Entity::delete_by_id(id.to_owned())
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_expired<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: OffsetDateTime,
) -> Result<u64, sea_orm::DbErr> {
    let result = player_sessions::Entity::delete_many()
        .filter(player_sessions::Column::ExpiresAt.lt(now))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
