//! Question lifecycle rules.
//!
//! A question moves Idle -> Live -> Reserved -> Closed. Only Idle -> Live is a
//! direct admin action; every other move is derived from the reservation or
//! answer row that was just written. Services apply these rules inside the
//! same transaction as the child write.

use crate::entities::{AnswerStatus, QuestionStatus};

/// Width of list labels for question and answer text.
pub const LABEL_CHARS: usize = 30;

/// Question status after a reservation row is saved.
///
/// Revoking an approval puts the question back on the board.
pub fn status_after_reservation_saved(approved: bool) -> QuestionStatus {
    if approved {
        QuestionStatus::Reserved
    } else {
        QuestionStatus::Live
    }
}

/// Question status after an answer row is saved.
///
/// An unjudged answer pins the question to Reserved; any judgement closes it.
pub fn status_after_answer_saved(answer_status: AnswerStatus) -> QuestionStatus {
    match answer_status {
        AnswerStatus::Idle => QuestionStatus::Reserved,
        AnswerStatus::Approved | AnswerStatus::Rejected => QuestionStatus::Closed,
    }
}

/// Live and reserved questions are in front of players and must stay.
pub fn can_delete(status: QuestionStatus) -> bool {
    !matches!(status, QuestionStatus::Live | QuestionStatus::Reserved)
}

/// First [`LABEL_CHARS`] characters of `text`.
pub fn crop(text: &str) -> String {
    text.chars().take(LABEL_CHARS).collect()
}
