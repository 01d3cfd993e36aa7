//! DTOs for questions_sea adapter.

use crate::entities::QuestionStatus;

/// DTO for creating a question.
#[derive(Debug, Clone)]
pub struct QuestionCreate {
    pub question_text: String,
    pub status: QuestionStatus,
}

impl QuestionCreate {
    pub fn new(question_text: impl Into<String>) -> Self {
        Self {
            question_text: question_text.into(),
            status: QuestionStatus::Idle,
        }
    }

    pub fn with_status(mut self, status: QuestionStatus) -> Self {
        self.status = status;
        self
    }
}
