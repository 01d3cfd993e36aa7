//! SeaORM adapter for players.

use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set,
};
use time::OffsetDateTime;

use crate::entities::{player_sessions, players};

pub mod dto;

pub use dto::{PlayerCreate, PlayerUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_nickname<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    nickname: &str,
) -> Result<Option<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .filter(players::Column::Nickname.eq(nickname))
        .one(conn)
        .await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerCreate,
) -> Result<players::Model, sea_orm::DbErr> {
    let active = players::ActiveModel {
        id: NotSet,
        nickname: Set(dto.nickname),
        email: Set(dto.email),
        password_hash: Set(dto.password_hash),
        is_active: Set(true),
        is_admin: Set(dto.is_admin),
        date_joined: Set(OffsetDateTime::now_utc()),
    };

    active.insert(conn).await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: PlayerUpdate,
) -> Result<players::Model, sea_orm::DbErr> {
    let existing = players::Entity::find_by_id(dto.id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("players.id={}", dto.id)))?;

    if dto.nickname.is_none()
        && dto.email.is_none()
        && dto.is_active.is_none()
        && dto.is_admin.is_none()
    {
        return Ok(existing);
    }

    let mut active: players::ActiveModel = existing.into();
    if let Some(nickname) = dto.nickname {
        active.nickname = Set(nickname);
    }
    if let Some(email) = dto.email {
        active.email = Set(email);
    }
    if let Some(is_active) = dto.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(is_admin) = dto.is_admin {
        active.is_admin = Set(is_admin);
    }

    active.update(conn).await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = players::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    players::Entity::find()
        .order_by_asc(players::Column::Nickname)
        .all(conn)
        .await
}

/// Non-admin players holding at least one unexpired session.
pub async fn find_online<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: OffsetDateTime,
) -> Result<Vec<players::Model>, sea_orm::DbErr> {
    let active_sessions = Query::select()
        .column(player_sessions::Column::PlayerId)
        .from(player_sessions::Entity)
        .and_where(player_sessions::Column::ExpiresAt.gte(now))
        .to_owned();

    players::Entity::find()
        .filter(players::Column::IsAdmin.eq(false))
        .filter(players::Column::Id.in_subquery(active_sessions))
        .order_by_asc(players::Column::Nickname)
        .all(conn)
        .await
}
