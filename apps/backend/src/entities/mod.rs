pub mod answers;
pub mod player_sessions;
pub mod players;
pub mod questions;
pub mod reservations;

pub use answers::AnswerStatus;
pub use questions::QuestionStatus;
