//! SeaORM adapter for reservations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::reservations;

pub mod dto;

pub use dto::ReservationCreate;

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: ReservationCreate,
) -> Result<reservations::Model, sea_orm::DbErr> {
    let active = reservations::ActiveModel {
        id: NotSet,
        question_id: Set(dto.question_id),
        player_id: Set(dto.player_id),
        approved: Set(dto.approved),
        reserved_at: Set(OffsetDateTime::now_utc()),
    };

    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<reservations::Model>, sea_orm::DbErr> {
    reservations::Entity::find_by_id(id).one(conn).await
}

pub async fn count_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
    player_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    reservations::Entity::find()
        .filter(reservations::Column::QuestionId.eq(question_id))
        .filter(reservations::Column::PlayerId.eq(player_id))
        .count(conn)
        .await
}

/// Earliest reservation the player holds on the question.
pub async fn find_first_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
    player_id: i64,
) -> Result<Option<reservations::Model>, sea_orm::DbErr> {
    reservations::Entity::find()
        .filter(reservations::Column::QuestionId.eq(question_id))
        .filter(reservations::Column::PlayerId.eq(player_id))
        .order_by_asc(reservations::Column::ReservedAt)
        .order_by_asc(reservations::Column::Id)
        .one(conn)
        .await
}

pub async fn find_approved_for_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
) -> Result<Option<reservations::Model>, sea_orm::DbErr> {
    reservations::Entity::find()
        .filter(reservations::Column::QuestionId.eq(question_id))
        .filter(reservations::Column::Approved.eq(true))
        .one(conn)
        .await
}

pub async fn set_approved<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    approved: bool,
) -> Result<reservations::Model, sea_orm::DbErr> {
    let existing = find_by_id(conn, id)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound(format!("reservations.id={id}")))?;
    if existing.approved == approved {
        return Ok(existing);
    }

    let mut active: reservations::ActiveModel = existing.into();
    active.approved = Set(approved);
    active.update(conn).await
}

/// All reservations in arrival order, optionally for one question.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: Option<i64>,
) -> Result<Vec<reservations::Model>, sea_orm::DbErr> {
    let mut query = reservations::Entity::find();
    if let Some(qid) = question_id {
        query = query.filter(reservations::Column::QuestionId.eq(qid));
    }

    query
        .order_by_asc(reservations::Column::ReservedAt)
        .order_by_asc(reservations::Column::Id)
        .all(conn)
        .await
}
