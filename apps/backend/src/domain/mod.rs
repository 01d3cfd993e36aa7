//! Domain layer: pure quiz rules, no I/O.

pub mod lifecycle;

#[cfg(test)]
mod tests_props_lifecycle;

pub use lifecycle::{
    can_delete, crop, status_after_answer_saved, status_after_reservation_saved, LABEL_CHARS,
};
