//! Answer submission and judgement.

use sea_orm::{ConnectionTrait, TransactionTrait};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::questions::{non_empty, question_not_found};
use crate::adapters::answers_sea::AnswerCreate;
use crate::domain::status_after_answer_saved;
use crate::entities::AnswerStatus;
use crate::error::AppError;
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::errors::ErrorCode;
use crate::repos::answers::{self, Answer};
use crate::repos::reservations::{self, Reservation};
use crate::repos::questions;

/// Result of a player's submission. `accepted == false` means an answer
/// already existed and `answer` is that earlier one, unchanged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerSubmission {
    pub answer: Answer,
    pub accepted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    Pending,
}

impl From<AnswerStatus> for AnswerOutcome {
    fn from(status: AnswerStatus) -> Self {
        match status {
            AnswerStatus::Approved => AnswerOutcome::Correct,
            AnswerStatus::Rejected => AnswerOutcome::Wrong,
            AnswerStatus::Idle => AnswerOutcome::Pending,
        }
    }
}

pub struct AnswerService;

impl AnswerService {
    pub fn new() -> Self {
        Self
    }

    /// First answer per question wins; later submissions are dropped without error.
    ///
    /// The answer belongs to the reservation's player, who must also be `submitter_id`.
    pub async fn provide_answer<C: ConnectionTrait + TransactionTrait + Send + Sync>(
        &self,
        conn: &C,
        question_id: i64,
        reservation_id: i64,
        submitter_id: i64,
        answer_text: &str,
    ) -> Result<AnswerSubmission, AppError> {
        questions::find_by_id(conn, question_id)
            .await?
            .ok_or_else(|| question_not_found(question_id))?;

        let reservation = reservations::find_by_id(conn, reservation_id)
            .await?
            .filter(|r| r.question_id == question_id)
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Reservation,
                    format!("Reservation {reservation_id} not found on question {question_id}"),
                )
            })?;

        if reservation.player_id != submitter_id {
            return Err(AppError::forbidden(
                ErrorCode::NotReservationHolder,
                "Only the reservation holder may answer",
            ));
        }
        ensure_approved(&reservation)?;

        if let Some(existing) = answers::find_by_question(conn, question_id).await? {
            debug!(question_id, answer_id = existing.id, "Answer already provided, dropping submission");
            return Ok(AnswerSubmission {
                answer: existing,
                accepted: false,
            });
        }

        let text = non_empty(answer_text, "Answer text must not be empty")?;

        // Savepoint so a lost insert race leaves the outer transaction usable.
        let savepoint = conn.begin().await?;
        let created = answers::create_answer(
            &savepoint,
            AnswerCreate::new(question_id, reservation.player_id, text),
        )
        .await;

        let answer = match created {
            Ok(answer) => {
                savepoint.commit().await?;
                answer
            }
            Err(DomainError::Conflict(ConflictKind::AnswerAlreadyProvided, _)) => {
                savepoint.rollback().await?;
                let existing = answers::find_by_question(conn, question_id)
                    .await?
                    .ok_or_else(|| answer_missing_for(question_id))?;
                debug!(question_id, answer_id = existing.id, "Lost answer insert race");
                return Ok(AnswerSubmission {
                    answer: existing,
                    accepted: false,
                });
            }
            Err(e) => return Err(e.into()),
        };

        apply_save_rule(conn, &answer).await?;
        info!(
            answer_id = answer.id,
            question_id,
            player_id = answer.player_id,
            "Answer provided"
        );
        Ok(AnswerSubmission {
            answer,
            accepted: true,
        })
    }

    pub async fn current_answer<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        question_id: i64,
    ) -> Result<Option<Answer>, AppError> {
        Ok(answers::find_by_question(conn, question_id).await?)
    }

    /// Judges an answer. A judged answer can be re-judged but not reset to Idle.
    pub async fn set_status<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        answer_id: i64,
        status: AnswerStatus,
    ) -> Result<Answer, AppError> {
        let existing = self.get_answer(conn, answer_id).await?;
        if existing.status != AnswerStatus::Idle && status == AnswerStatus::Idle {
            return Err(DomainError::validation(
                ValidationKind::AnswerAlreadyJudged,
                format!("Answer {answer_id} has already been judged"),
            )
            .into());
        }

        let answer = answers::update_status(conn, answer_id, status).await?;
        apply_save_rule(conn, &answer).await?;
        if existing.status != answer.status {
            info!(
                answer_id,
                question_id = answer.question_id,
                from = ?existing.status,
                to = ?answer.status,
                "Answer judged"
            );
        }
        Ok(answer)
    }

    /// Admin text edit; the save rule runs again like any other save.
    pub async fn update_text<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        answer_id: i64,
        answer_text: &str,
    ) -> Result<Answer, AppError> {
        let text = non_empty(answer_text, "Answer text must not be empty")?;
        self.get_answer(conn, answer_id).await?;
        let answer = answers::update_text(conn, answer_id, text).await?;
        apply_save_rule(conn, &answer).await?;
        Ok(answer)
    }

    pub async fn steer<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        answer_id: i64,
    ) -> Result<AnswerOutcome, AppError> {
        let answer = self.get_answer(conn, answer_id).await?;
        Ok(AnswerOutcome::from(answer.status))
    }

    pub async fn list_answers<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<Vec<Answer>, AppError> {
        Ok(answers::list_answers(conn).await?)
    }

    pub async fn get_answer<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: i64,
    ) -> Result<Answer, AppError> {
        answers::find_by_id(conn, id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Answer, format!("Answer {id} not found")).into()
        })
    }
}

impl Default for AnswerService {
    fn default() -> Self {
        Self::new()
    }
}

/// Question status follows the answer that was just written.
async fn apply_save_rule<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    answer: &Answer,
) -> Result<(), AppError> {
    let target = status_after_answer_saved(answer.status);
    let before = questions::find_by_id(conn, answer.question_id)
        .await?
        .ok_or_else(|| question_not_found(answer.question_id))?;

    if answer.status == AnswerStatus::Idle && before.status != target {
        warn!(
            question_id = answer.question_id,
            answer_id = answer.id,
            from = ?before.status,
            "Unjudged answer saved; pinning question to Reserved"
        );
    }

    if before.status != target {
        questions::update_status(conn, answer.question_id, target).await?;
        info!(
            question_id = answer.question_id,
            answer_id = answer.id,
            from = ?before.status,
            to = ?target,
            "Question status follows answer"
        );
    }
    Ok(())
}

/// Only an approved reservation opens the answer form; a pending one is still
/// part of the race.
pub fn ensure_approved(reservation: &Reservation) -> Result<(), AppError> {
    if reservation.approved {
        Ok(())
    } else {
        Err(AppError::forbidden(
            ErrorCode::ReservationNotApproved,
            format!("Reservation {} has not been approved", reservation.id),
        ))
    }
}

fn answer_missing_for(question_id: i64) -> DomainError {
    DomainError::not_found(
        NotFoundKind::Answer,
        format!("No answer on question {question_id}"),
    )
}
