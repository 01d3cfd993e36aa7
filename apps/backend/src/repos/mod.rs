//! Repository functions for the domain layer (generic over ConnectionTrait).

pub mod answers;
pub mod players;
pub mod questions;
pub mod reservations;
pub mod sessions;
