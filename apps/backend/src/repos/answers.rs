//! Answer repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::answers_sea::{self as answers_adapter, AnswerCreate};
use crate::domain::crop;
use crate::entities::{answers, AnswerStatus};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub id: i64,
    pub question_id: i64,
    pub player_id: i64,
    pub answer_text: String,
    pub status: AnswerStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Answer {
    pub fn label(&self) -> String {
        crop(&self.answer_text)
    }
}

pub async fn create_answer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: AnswerCreate,
) -> Result<Answer, DomainError> {
    let answer = answers_adapter::create(conn, dto).await?;
    Ok(Answer::from(answer))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Answer>, DomainError> {
    let answer = answers_adapter::find_by_id(conn, id).await?;
    Ok(answer.map(Answer::from))
}

pub async fn find_by_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
) -> Result<Option<Answer>, DomainError> {
    let answer = answers_adapter::find_by_question(conn, question_id).await?;
    Ok(answer.map(Answer::from))
}

pub async fn count_for_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
) -> Result<u64, DomainError> {
    Ok(answers_adapter::count_for_question(conn, question_id).await?)
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    status: AnswerStatus,
) -> Result<Answer, DomainError> {
    let answer = answers_adapter::update_status(conn, id, status).await?;
    Ok(Answer::from(answer))
}

pub async fn update_text<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    answer_text: String,
) -> Result<Answer, DomainError> {
    let answer = answers_adapter::update_text(conn, id, answer_text).await?;
    Ok(Answer::from(answer))
}

pub async fn list_answers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Answer>, DomainError> {
    let rows = answers_adapter::list(conn).await?;
    Ok(rows.into_iter().map(Answer::from).collect())
}

impl From<answers::Model> for Answer {
    fn from(model: answers::Model) -> Self {
        Self {
            id: model.id,
            question_id: model.question_id,
            player_id: model.player_id,
            answer_text: model.answer_text,
            status: model.status,
            created_at: model.created_at,
        }
    }
}
