//! Error codes for the quiz backend API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in HTTP responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Missing or malformed Bearer token
    UnauthorizedMissingBearer,
    /// Invalid JWT token
    UnauthorizedInvalidJwt,
    /// JWT token has expired
    UnauthorizedExpiredJwt,
    /// Session was closed or has expired
    SessionExpired,
    /// Nickname/password pair rejected
    InvalidCredentials,
    /// Access denied
    Forbidden,
    /// Player from the token no longer exists or is inactive
    ForbiddenPlayerInactive,
    /// Route requires an admin player
    AdminRequired,
    /// Only the reservation's player may answer
    NotReservationHolder,
    /// Reservation exists but the admin has not approved it
    ReservationNotApproved,

    // Request Validation
    /// General validation error
    ValidationError,
    /// Nickname missing or blank
    NicknameRequired,
    /// Password confirmation does not match
    PasswordMismatch,
    /// Question or answer text is empty
    EmptyText,
    /// Admin flag can only be granted
    AdminDemotionForbidden,
    /// A judged answer cannot be moved back to idle
    AnswerAlreadyJudged,
    /// General bad request error
    BadRequest,

    // Resource Not Found
    /// Player not found
    PlayerNotFound,
    /// Question not found
    QuestionNotFound,
    /// Reservation not found
    ReservationNotFound,
    /// Answer not found
    AnswerNotFound,
    /// General not found error
    NotFound,

    // State rules
    /// Question is live or reserved and cannot be deleted
    QuestionDeleteForbidden,

    // Business Logic Conflicts
    /// Nickname already registered
    NicknameTaken,
    /// Another reservation for the question is already approved
    ReservationAlreadyApproved,
    /// Question already has an answer
    AnswerAlreadyProvided,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Internal server error
    Internal,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenPlayerInactive => "FORBIDDEN_PLAYER_INACTIVE",
            Self::AdminRequired => "ADMIN_REQUIRED",
            Self::NotReservationHolder => "NOT_RESERVATION_HOLDER",
            Self::ReservationNotApproved => "RESERVATION_NOT_APPROVED",

            Self::ValidationError => "VALIDATION_ERROR",
            Self::NicknameRequired => "NICKNAME_REQUIRED",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::EmptyText => "EMPTY_TEXT",
            Self::AdminDemotionForbidden => "ADMIN_DEMOTION_FORBIDDEN",
            Self::AnswerAlreadyJudged => "ANSWER_ALREADY_JUDGED",
            Self::BadRequest => "BAD_REQUEST",

            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::QuestionNotFound => "QUESTION_NOT_FOUND",
            Self::ReservationNotFound => "RESERVATION_NOT_FOUND",
            Self::AnswerNotFound => "ANSWER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::QuestionDeleteForbidden => "QUESTION_DELETE_FORBIDDEN",

            Self::NicknameTaken => "NICKNAME_TAKEN",
            Self::ReservationAlreadyApproved => "RESERVATION_ALREADY_APPROVED",
            Self::AnswerAlreadyProvided => "ANSWER_ALREADY_PROVIDED",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
