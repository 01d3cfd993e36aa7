//! Domain services. Every operation takes the connection (normally the
//! request transaction) it runs against.

pub mod answers;
pub mod players;
pub mod questions;
pub mod reservations;
pub mod sessions;

pub use answers::{AnswerOutcome, AnswerService, AnswerSubmission};
pub use players::{PlayerPatch, PlayerService};
pub use questions::QuestionService;
pub use reservations::{ReservationOutcome, ReservationService};
pub use sessions::SessionService;
