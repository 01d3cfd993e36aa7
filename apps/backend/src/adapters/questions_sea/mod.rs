//! SeaORM adapter for questions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::{questions, QuestionStatus};

pub mod dto;

pub use dto::QuestionCreate;

fn missing(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::RecordNotFound(format!("questions.id={id}"))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: QuestionCreate,
) -> Result<questions::Model, sea_orm::DbErr> {
    let active = questions::ActiveModel {
        id: NotSet,
        question_text: Set(dto.question_text),
        status: Set(dto.status),
        created_at: Set(OffsetDateTime::now_utc()),
    };

    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<questions::Model>, sea_orm::DbErr> {
    questions::Entity::find_by_id(id).one(conn).await
}

/// Persist `status` unconditionally. No transition check happens here.
pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    status: QuestionStatus,
) -> Result<questions::Model, sea_orm::DbErr> {
    let existing = find_by_id(conn, id).await?.ok_or_else(|| missing(id))?;
    if existing.status == status {
        return Ok(existing);
    }

    let mut active: questions::ActiveModel = existing.into();
    active.status = Set(status);
    active.update(conn).await
}

pub async fn update_text<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    question_text: String,
) -> Result<questions::Model, sea_orm::DbErr> {
    let existing = find_by_id(conn, id).await?.ok_or_else(|| missing(id))?;
    if existing.question_text == question_text {
        return Ok(existing);
    }

    let mut active: questions::ActiveModel = existing.into();
    active.question_text = Set(question_text);
    active.update(conn).await
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = questions::Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected)
}

pub async fn count_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: QuestionStatus,
) -> Result<u64, sea_orm::DbErr> {
    questions::Entity::find()
        .filter(questions::Column::Status.eq(status))
        .count(conn)
        .await
}

/// Most recently created question in `status`; ties broken by id.
pub async fn find_latest_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: QuestionStatus,
) -> Result<Option<questions::Model>, sea_orm::DbErr> {
    questions::Entity::find()
        .filter(questions::Column::Status.eq(status))
        .order_by_desc(questions::Column::CreatedAt)
        .order_by_desc(questions::Column::Id)
        .one(conn)
        .await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<questions::Model>, sea_orm::DbErr> {
    questions::Entity::find()
        .order_by_desc(questions::Column::CreatedAt)
        .order_by_desc(questions::Column::Id)
        .all(conn)
        .await
}
