use proptest::prelude::*;

use crate::domain::lifecycle::{can_delete, crop, status_after_answer_saved, LABEL_CHARS};
use crate::entities::{AnswerStatus, QuestionStatus};

fn question_status() -> impl Strategy<Value = QuestionStatus> {
    prop_oneof![
        Just(QuestionStatus::Idle),
        Just(QuestionStatus::Live),
        Just(QuestionStatus::Reserved),
        Just(QuestionStatus::Closed),
    ]
}

fn judged() -> impl Strategy<Value = AnswerStatus> {
    prop_oneof![Just(AnswerStatus::Approved), Just(AnswerStatus::Rejected)]
}

proptest! {
    /// Labels never exceed the width and are always a prefix of the text.
    #[test]
    fn prop_crop_is_bounded_prefix(text in ".{0,80}") {
        let label = crop(&text);
        prop_assert!(label.chars().count() <= LABEL_CHARS);
        prop_assert!(text.starts_with(&label));
        if text.chars().count() <= LABEL_CHARS {
            prop_assert_eq!(label, text);
        }
    }

    /// Any judgement closes the question; closed questions are deletable.
    #[test]
    fn prop_judged_answer_closes_question(status in judged()) {
        let next = status_after_answer_saved(status);
        prop_assert_eq!(next, QuestionStatus::Closed);
        prop_assert!(can_delete(next));
    }

    /// Exactly the two player-facing states block deletion.
    #[test]
    fn prop_delete_guard_matches_visibility(status in question_status()) {
        let visible = matches!(status, QuestionStatus::Live | QuestionStatus::Reserved);
        prop_assert_eq!(can_delete(status), !visible);
    }
}
