//! SeaORM adapter for answers.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;

use crate::entities::{answers, AnswerStatus};

pub mod dto;

pub use dto::AnswerCreate;

fn missing(id: i64) -> sea_orm::DbErr {
    sea_orm::DbErr::RecordNotFound(format!("answers.id={id}"))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AnswerCreate,
) -> Result<answers::Model, sea_orm::DbErr> {
    let active = answers::ActiveModel {
        id: NotSet,
        question_id: Set(dto.question_id),
        player_id: Set(dto.player_id),
        answer_text: Set(dto.answer_text),
        status: Set(dto.status),
        created_at: Set(OffsetDateTime::now_utc()),
    };

    active.insert(conn).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<answers::Model>, sea_orm::DbErr> {
    answers::Entity::find_by_id(id).one(conn).await
}

pub async fn find_by_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
) -> Result<Option<answers::Model>, sea_orm::DbErr> {
    answers::Entity::find()
        .filter(answers::Column::QuestionId.eq(question_id))
        .one(conn)
        .await
}

pub async fn count_for_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    answers::Entity::find()
        .filter(answers::Column::QuestionId.eq(question_id))
        .count(conn)
        .await
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    status: AnswerStatus,
) -> Result<answers::Model, sea_orm::DbErr> {
    let existing = find_by_id(conn, id).await?.ok_or_else(|| missing(id))?;
    if existing.status == status {
        return Ok(existing);
    }

    let mut active: answers::ActiveModel = existing.into();
    active.status = Set(status);
    active.update(conn).await
}

pub async fn update_text<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    answer_text: String,
) -> Result<answers::Model, sea_orm::DbErr> {
    let existing = find_by_id(conn, id).await?.ok_or_else(|| missing(id))?;
    if existing.answer_text == answer_text {
        return Ok(existing);
    }

    let mut active: answers::ActiveModel = existing.into();
    active.answer_text = Set(answer_text);
    active.update(conn).await
}

pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<answers::Model>, sea_orm::DbErr> {
    answers::Entity::find()
        .order_by_desc(answers::Column::CreatedAt)
        .order_by_desc(answers::Column::Id)
        .all(conn)
        .await
}
