//! Shared helpers for the quiz backend test suites.
//!
//! Kept free of backend types so both unit and integration tests can use it.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
