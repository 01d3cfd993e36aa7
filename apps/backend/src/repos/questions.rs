//! Question repository functions for domain layer.

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::questions_sea::{self as questions_adapter, QuestionCreate};
use crate::domain::crop;
use crate::entities::{questions, QuestionStatus};
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    pub status: QuestionStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Question {
    /// Short display form used in listings and logs.
    pub fn label(&self) -> String {
        crop(&self.question_text)
    }
}

pub async fn create_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: QuestionCreate,
) -> Result<Question, DomainError> {
    let question = questions_adapter::create(conn, dto).await?;
    Ok(Question::from(question))
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<Question>, DomainError> {
    let question = questions_adapter::find_by_id(conn, id).await?;
    Ok(question.map(Question::from))
}

pub async fn update_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    status: QuestionStatus,
) -> Result<Question, DomainError> {
    let question = questions_adapter::update_status(conn, id, status).await?;
    Ok(Question::from(question))
}

pub async fn update_text<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    question_text: String,
) -> Result<Question, DomainError> {
    let question = questions_adapter::update_text(conn, id, question_text).await?;
    Ok(Question::from(question))
}

pub async fn delete_question<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, DomainError> {
    Ok(questions_adapter::delete(conn, id).await? > 0)
}

pub async fn count_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: QuestionStatus,
) -> Result<u64, DomainError> {
    Ok(questions_adapter::count_by_status(conn, status).await?)
}

pub async fn find_latest_by_status<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: QuestionStatus,
) -> Result<Option<Question>, DomainError> {
    let question = questions_adapter::find_latest_by_status(conn, status).await?;
    Ok(question.map(Question::from))
}

pub async fn list_questions<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<Question>, DomainError> {
    let rows = questions_adapter::list(conn).await?;
    Ok(rows.into_iter().map(Question::from).collect())
}

impl From<questions::Model> for Question {
    fn from(model: questions::Model) -> Self {
        Self {
            id: model.id,
            question_text: model.question_text,
            status: model.status,
            created_at: model.created_at,
        }
    }
}
