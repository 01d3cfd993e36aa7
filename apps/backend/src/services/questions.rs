//! Question authoring and the direct admin transitions.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::adapters::questions_sea::QuestionCreate;
use crate::domain::can_delete;
use crate::entities::QuestionStatus;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::repos::questions::{self, Question};

pub struct QuestionService;

impl QuestionService {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_question<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question_text: &str,
    ) -> Result<Question, AppError> {
        let text = non_empty(question_text, "Question text must not be empty")?;
        let question = questions::create_question(conn, QuestionCreate::new(text)).await?;
        info!(question_id = question.id, label = %question.label(), "Question created");
        Ok(question)
    }

    /// Forces `status`. Any jump is allowed; the admin owns the board.
    pub async fn set_status<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        status: QuestionStatus,
    ) -> Result<Question, AppError> {
        let existing = self.get_question(conn, id).await?;
        let question = questions::update_status(conn, id, status).await?;
        if existing.status != question.status {
            info!(
                question_id = id,
                from = ?existing.status,
                to = ?question.status,
                "Question status set"
            );
        }
        Ok(question)
    }

    pub async fn update_text<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
        question_text: &str,
    ) -> Result<Question, AppError> {
        let text = non_empty(question_text, "Question text must not be empty")?;
        Ok(questions::update_text(conn, id, text).await?)
    }

    /// Live and reserved questions cannot be deleted. Children go with the question.
    pub async fn delete_question<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<(), AppError> {
        let question = self.get_question(conn, id).await?;
        if !can_delete(question.status) {
            return Err(DomainError::permission_denied(format!(
                "Question {id} is {:?} and cannot be deleted",
                question.status
            ))
            .into());
        }

        questions::delete_question(conn, id).await?;
        info!(question_id = id, "Question deleted");
        Ok(())
    }

    /// Number of live questions.
    pub async fn questions_available<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<u64, AppError> {
        Ok(questions::count_by_status(conn, QuestionStatus::Live).await?)
    }

    /// The newest live question, the one players are shown.
    pub async fn current_live_question<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Option<Question>, AppError> {
        Ok(questions::find_latest_by_status(conn, QuestionStatus::Live).await?)
    }

    pub async fn list_questions<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Question>, AppError> {
        Ok(questions::list_questions(conn).await?)
    }

    pub async fn get_question<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Question, AppError> {
        questions::find_by_id(conn, id)
            .await?
            .ok_or_else(|| question_not_found(id).into())
    }
}

impl Default for QuestionService {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn question_not_found(id: i64) -> DomainError {
    DomainError::not_found(NotFoundKind::Question, format!("Question {id} not found"))
}

pub(crate) fn non_empty(text: &str, detail: &str) -> Result<String, DomainError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(ValidationKind::EmptyText, detail));
    }
    Ok(trimmed.to_string())
}
