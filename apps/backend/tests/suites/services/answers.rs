use quiz_backend::db::require_db;
use quiz_backend::entities::{AnswerStatus, QuestionStatus};
use quiz_backend::errors::ErrorCode;
use quiz_backend::repos::reservations::Reservation;
use quiz_backend::services::{AnswerOutcome, AnswerService, QuestionService, ReservationService};
use quiz_backend::AppError;
use sea_orm::ConnectionTrait;

use crate::support::build_test_state;
use crate::support::factory::{
    create_answer, create_live_question, create_player, create_reservation,
};

/// Reservation the admin has approved, which leaves the question Reserved.
async fn approved_reservation<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    question_id: i64,
    player_id: i64,
) -> Result<Reservation, AppError> {
    let pending = create_reservation(conn, question_id, player_id, false).await?;
    ReservationService::new()
        .set_approved(conn, pending.id, true)
        .await
}

#[tokio::test]
async fn holder_answer_is_accepted_and_question_stays_reserved() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_live_question(db, "2 + 2?").await?;
    let player = create_player(db, "kim").await?;
    let reservation = approved_reservation(db, question.id, player.id).await?;
    assert_eq!(
        QuestionService::new().get_question(db, question.id).await?.status,
        QuestionStatus::Reserved
    );

    let submission = AnswerService::new()
        .provide_answer(db, question.id, reservation.id, player.id, " four ")
        .await?;

    assert!(submission.accepted);
    assert_eq!(submission.answer.answer_text, "four");
    assert_eq!(submission.answer.player_id, player.id);
    assert_eq!(submission.answer.status, AnswerStatus::Idle);
    assert_eq!(
        QuestionService::new().get_question(db, question.id).await?.status,
        QuestionStatus::Reserved
    );
    Ok(())
}

#[tokio::test]
async fn later_submissions_are_dropped_silently() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = AnswerService::new();

    let question = create_live_question(db, "Capital of Chile?").await?;
    let player = create_player(db, "lee").await?;
    let reservation = approved_reservation(db, question.id, player.id).await?;

    let first = service
        .provide_answer(db, question.id, reservation.id, player.id, "Santiago")
        .await?;
    let second = service
        .provide_answer(db, question.id, reservation.id, player.id, "Valparaiso")
        .await?;

    assert!(!second.accepted);
    assert_eq!(second.answer.id, first.answer.id);
    assert_eq!(second.answer.answer_text, "Santiago");
    assert_eq!(service.list_answers(db).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn only_the_reservation_holder_may_answer() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_live_question(db, "Whose turn?").await?;
    let holder = create_player(db, "max").await?;
    let intruder = create_player(db, "ned").await?;
    let reservation = approved_reservation(db, question.id, holder.id).await?;

    let err = AnswerService::new()
        .provide_answer(db, question.id, reservation.id, intruder.id, "mine")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotReservationHolder);
    Ok(())
}

#[tokio::test]
async fn pending_reservation_cannot_answer() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = AnswerService::new();

    let question = create_live_question(db, "Not yours yet").await?;
    let early = create_player(db, "early").await?;
    let pending = create_reservation(db, question.id, early.id, false).await?;

    let err = service
        .provide_answer(db, question.id, pending.id, early.id, "jumping the gun")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ReservationNotApproved);
    assert_eq!(err.status().as_u16(), 403);
    assert_eq!(
        QuestionService::new().get_question(db, question.id).await?.status,
        QuestionStatus::Live
    );
    assert!(service.current_answer(db, question.id).await?.is_none());

    // The slot is still free for whoever the admin approves.
    let winner = create_player(db, "winner").await?;
    let approved = approved_reservation(db, question.id, winner.id).await?;
    let submission = service
        .provide_answer(db, question.id, approved.id, winner.id, "on time")
        .await?;
    assert!(submission.accepted);
    Ok(())
}

#[tokio::test]
async fn reservation_must_belong_to_the_question() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_live_question(db, "Here").await?;
    let other = create_live_question(db, "There").await?;
    let player = create_player(db, "oz").await?;
    let reservation = approved_reservation(db, other.id, player.id).await?;

    let err = AnswerService::new()
        .provide_answer(db, question.id, reservation.id, player.id, "answer")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::ReservationNotFound);
    Ok(())
}

#[tokio::test]
async fn empty_answer_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_live_question(db, "Say something").await?;
    let player = create_player(db, "pat").await?;
    let reservation = approved_reservation(db, question.id, player.id).await?;

    let err = AnswerService::new()
        .provide_answer(db, question.id, reservation.id, player.id, "  ")
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::EmptyText);
    Ok(())
}

#[tokio::test]
async fn judging_closes_the_question() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = AnswerService::new();

    for (verdict, outcome) in [
        (AnswerStatus::Approved, AnswerOutcome::Correct),
        (AnswerStatus::Rejected, AnswerOutcome::Wrong),
    ] {
        let question = create_live_question(db, "Judge me").await?;
        let player = create_player(db, "quinn").await?;
        let answer = create_answer(db, question.id, player.id, "a guess").await?;

        assert_eq!(service.steer(db, answer.id).await?, AnswerOutcome::Pending);

        service.set_status(db, answer.id, verdict).await?;
        assert_eq!(service.steer(db, answer.id).await?, outcome);
        assert_eq!(
            QuestionService::new().get_question(db, question.id).await?.status,
            QuestionStatus::Closed
        );
    }
    Ok(())
}

#[tokio::test]
async fn judged_answer_cannot_return_to_idle() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = AnswerService::new();

    let question = create_live_question(db, "No take-backs").await?;
    let player = create_player(db, "ray").await?;
    let answer = create_answer(db, question.id, player.id, "final").await?;
    service
        .set_status(db, answer.id, AnswerStatus::Approved)
        .await?;

    let err = service
        .set_status(db, answer.id, AnswerStatus::Idle)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::AnswerAlreadyJudged);

    let rejudged = service
        .set_status(db, answer.id, AnswerStatus::Rejected)
        .await?;
    assert_eq!(rejudged.status, AnswerStatus::Rejected);
    Ok(())
}

#[tokio::test]
async fn admin_text_edit_reapplies_the_save_rule() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_live_question(db, "Typo fix").await?;
    let player = create_player(db, "sam").await?;
    let answer = create_answer(db, question.id, player.id, "Pari").await?;

    let edited = AnswerService::new()
        .update_text(db, answer.id, "Paris")
        .await?;
    assert_eq!(edited.answer_text, "Paris");
    assert_eq!(
        QuestionService::new().get_question(db, question.id).await?.status,
        QuestionStatus::Reserved
    );
    Ok(())
}

#[tokio::test]
async fn unknown_answer_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let err = AnswerService::new().steer(db, 77).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::AnswerNotFound);
    Ok(())
}
