//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; repos convert through the `From` impl
//! here and higher layers map `DomainError` to `AppError`.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column" messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let marker = "UNIQUE constraint failed: ";
    let start = error_msg.find(marker)? + marker.len();
    error_msg[start..]
        .split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn map_sqlite_table_column_to_conflict(table_column: &str) -> Option<(ConflictKind, &'static str)> {
    match table_column {
        "players.nickname" => Some((ConflictKind::NicknameTaken, "Nickname already taken")),
        "reservations.question_id" => Some((
            ConflictKind::ReservationAlreadyApproved,
            "Question already has an approved reservation",
        )),
        "answers.question_id" => Some((
            ConflictKind::AnswerAlreadyProvided,
            "Question already has an answer",
        )),
        _ => None,
    }
}

fn map_postgres_constraint_to_conflict(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("ux_players_nickname") {
        return Some((ConflictKind::NicknameTaken, "Nickname already taken"));
    }
    if error_msg.contains("ux_reservations_one_approved") {
        return Some((
            ConflictKind::ReservationAlreadyApproved,
            "Question already has an approved reservation",
        ));
    }
    if error_msg.contains("ux_answers_question") {
        return Some((
            ConflictKind::AnswerAlreadyProvided,
            "Question already has an answer",
        ));
    }
    None
}

/// `RecordNotFound` payloads from the adapters look like `questions.id=42`.
fn not_found_from_record(msg: &str) -> DomainError {
    let (table, id) = msg.split_once(".id=").unwrap_or((msg, ""));
    let (kind, label) = match table {
        "players" => (NotFoundKind::Player, "Player"),
        "questions" => (NotFoundKind::Question, "Question"),
        "reservations" => (NotFoundKind::Reservation, "Reservation"),
        "answers" => (NotFoundKind::Answer, "Answer"),
        "player_sessions" => (NotFoundKind::Session, "Session"),
        _ => return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found"),
    };
    if id.is_empty() {
        DomainError::not_found(kind, format!("{label} not found"))
    } else {
        DomainError::not_found(kind, format!("{label} {id} not found"))
    }
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(msg) => return not_found_from_record(msg),
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some(table_column) = extract_sqlite_table_column(&error_msg) {
            if let Some((kind, detail)) = map_sqlite_table_column_to_conflict(table_column) {
                return DomainError::conflict(kind, detail);
            }
        }

        if let Some((kind, detail)) = map_postgres_constraint_to_conflict(&error_msg) {
            return DomainError::conflict(kind, detail);
        }

        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key constraint violation");
        return DomainError::validation_other("Foreign key constraint violation");
    }

    if error_msg.contains("timeout") || error_msg.contains("database is locked") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        map_db_err(e)
    }
}
