use quiz_backend::db::require_db;
use quiz_backend::entities::QuestionStatus;
use quiz_backend::errors::ErrorCode;
use quiz_backend::services::{QuestionService, ReservationOutcome, ReservationService};
use quiz_backend::AppError;

use crate::support::build_test_state;
use crate::support::factory::{
    create_live_question, create_player, create_question, create_reservation,
};

#[tokio::test]
async fn first_reservation_is_recorded_once() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = ReservationService::new();

    let question = create_live_question(db, "Name a prime above 100").await?;
    let player = create_player(db, "ann").await?;

    let (first, created) = service.reserve_if_first(db, question.id, player.id).await?;
    assert!(created);
    assert!(!first.approved);

    let (second, created_again) = service.reserve_if_first(db, question.id, player.id).await?;
    assert!(!created_again);
    assert_eq!(second.id, first.id);

    let all = service.list_reservations(db, Some(question.id)).await?;
    assert_eq!(all.len(), 1);
    Ok(())
}

#[tokio::test]
async fn unapproved_reservation_keeps_question_live() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_live_question(db, "Still open").await?;
    let player = create_player(db, "bo").await?;
    ReservationService::new()
        .create_reservation(db, question.id, player.id)
        .await?;

    let question = QuestionService::new().get_question(db, question.id).await?;
    assert_eq!(question.status, QuestionStatus::Live);
    Ok(())
}

#[tokio::test]
async fn create_reservation_always_inserts_a_new_row() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = ReservationService::new();

    let question = create_live_question(db, "Ask twice").await?;
    let player = create_player(db, "twice").await?;

    let first = service.create_reservation(db, question.id, player.id).await?;
    let second = service.create_reservation(db, question.id, player.id).await?;

    assert_ne!(first.id, second.id);
    assert_eq!((second.question_id, second.player_id), (question.id, player.id));
    let rows = service.list_reservations(db, Some(question.id)).await?;
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| !r.approved));
    Ok(())
}

#[tokio::test]
async fn reserving_unknown_question_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_player(db, "cy").await?;

    let err = ReservationService::new()
        .reserve_if_first(db, 999, player.id)
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::QuestionNotFound);
    Ok(())
}

#[tokio::test]
async fn approval_reserves_and_revocation_reopens() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = ReservationService::new();
    let questions = QuestionService::new();

    let question = create_live_question(db, "Approve me").await?;
    let player = create_player(db, "dee").await?;
    let reservation = create_reservation(db, question.id, player.id, false).await?;

    service.set_approved(db, reservation.id, true).await?;
    assert_eq!(
        questions.get_question(db, question.id).await?.status,
        QuestionStatus::Reserved
    );

    service.set_approved(db, reservation.id, false).await?;
    assert_eq!(
        questions.get_question(db, question.id).await?.status,
        QuestionStatus::Live
    );
    Ok(())
}

#[tokio::test]
async fn second_approval_on_a_question_conflicts() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = ReservationService::new();

    let question = create_live_question(db, "Only one winner").await?;
    let first = create_player(db, "eve").await?;
    let second = create_player(db, "fox").await?;
    let r1 = create_reservation(db, question.id, first.id, false).await?;
    let r2 = create_reservation(db, question.id, second.id, false).await?;

    service.set_approved(db, r1.id, true).await?;
    let err = service.set_approved(db, r2.id, true).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::ReservationAlreadyApproved);

    let approved: Vec<_> = service
        .list_reservations(db, Some(question.id))
        .await?
        .into_iter()
        .filter(|r| r.approved)
        .collect();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, r1.id);
    Ok(())
}

#[tokio::test]
async fn steer_reports_pending_won_and_lost() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = ReservationService::new();

    let question = create_live_question(db, "Who gets it?").await?;
    let winner = create_player(db, "gil").await?;
    let loser = create_player(db, "hal").await?;
    let won = create_reservation(db, question.id, winner.id, false).await?;
    create_reservation(db, question.id, loser.id, false).await?;

    assert_eq!(
        service.steer(db, question.id, winner.id).await?,
        ReservationOutcome::Pending
    );

    service.set_approved(db, won.id, true).await?;

    assert_eq!(
        service.steer(db, question.id, winner.id).await?,
        ReservationOutcome::Won {
            reservation_id: won.id
        }
    );
    assert_eq!(
        service.steer(db, question.id, loser.id).await?,
        ReservationOutcome::Lost {
            approved_player: winner.nickname.clone()
        }
    );
    Ok(())
}

#[tokio::test]
async fn reserving_a_closed_question_puts_it_back_live() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_question(db, "Already done", QuestionStatus::Closed).await?;
    let player = create_player(db, "ivy").await?;
    ReservationService::new()
        .create_reservation(db, question.id, player.id)
        .await?;

    let question = QuestionService::new().get_question(db, question.id).await?;
    assert_eq!(question.status, QuestionStatus::Live);
    Ok(())
}

#[tokio::test]
async fn list_can_be_filtered_by_question() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = ReservationService::new();

    let q1 = create_live_question(db, "first").await?;
    let q2 = create_live_question(db, "second").await?;
    let player = create_player(db, "jo").await?;
    create_reservation(db, q1.id, player.id, false).await?;
    create_reservation(db, q2.id, player.id, false).await?;

    assert_eq!(service.list_reservations(db, None).await?.len(), 2);
    let only_q2 = service.list_reservations(db, Some(q2.id)).await?;
    assert_eq!(only_q2.len(), 1);
    assert_eq!(only_q2[0].question_id, q2.id);
    Ok(())
}
