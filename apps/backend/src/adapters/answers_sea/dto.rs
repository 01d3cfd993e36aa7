//! DTOs for answers_sea adapter.

use crate::entities::AnswerStatus;

#[derive(Debug, Clone)]
pub struct AnswerCreate {
    pub question_id: i64,
    pub player_id: i64,
    pub answer_text: String,
    pub status: AnswerStatus,
}

impl AnswerCreate {
    pub fn new(question_id: i64, player_id: i64, answer_text: impl Into<String>) -> Self {
        Self {
            question_id,
            player_id,
            answer_text: answer_text.into(),
            status: AnswerStatus::Idle,
        }
    }
}
