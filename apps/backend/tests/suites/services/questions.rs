use quiz_backend::db::require_db;
use quiz_backend::entities::QuestionStatus;
use quiz_backend::errors::ErrorCode;
use quiz_backend::repos::{answers, players, questions, reservations};
use quiz_backend::services::QuestionService;
use quiz_backend::AppError;

use crate::support::build_test_state;
use crate::support::factory::{
    create_answer, create_live_question, create_player, create_question, create_reservation,
};

#[tokio::test]
async fn new_questions_start_idle() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = QuestionService::new()
        .create_question(db, "  What is the capital of Peru?  ")
        .await?;

    assert_eq!(question.status, QuestionStatus::Idle);
    assert_eq!(question.question_text, "What is the capital of Peru?");
    Ok(())
}

#[tokio::test]
async fn blank_question_text_is_rejected() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let err = QuestionService::new()
        .create_question(db, "   ")
        .await
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::EmptyText);
    assert_eq!(QuestionService::new().list_questions(db).await?.len(), 0);
    Ok(())
}

#[tokio::test]
async fn questions_available_counts_live_only() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = QuestionService::new();

    create_question(db, "idle one", QuestionStatus::Idle).await?;
    create_live_question(db, "live one").await?;
    create_live_question(db, "live two").await?;
    create_question(db, "reserved one", QuestionStatus::Reserved).await?;
    create_question(db, "closed one", QuestionStatus::Closed).await?;

    assert_eq!(service.questions_available(db).await?, 2);
    Ok(())
}

#[tokio::test]
async fn current_live_question_is_the_newest_live_one() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = QuestionService::new();

    assert!(service.current_live_question(db).await?.is_none());

    create_live_question(db, "older").await?;
    let newer = create_live_question(db, "newer").await?;
    create_question(db, "newest but idle", QuestionStatus::Idle).await?;

    let current = service.current_live_question(db).await?.unwrap();
    assert_eq!(current.id, newer.id);
    Ok(())
}

#[tokio::test]
async fn admin_can_force_any_status() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = QuestionService::new();

    let question = create_question(db, "jump around", QuestionStatus::Closed).await?;
    let back = service
        .set_status(db, question.id, QuestionStatus::Idle)
        .await?;
    assert_eq!(back.status, QuestionStatus::Idle);

    let live = service
        .set_status(db, question.id, QuestionStatus::Live)
        .await?;
    assert_eq!(live.status, QuestionStatus::Live);
    Ok(())
}

#[tokio::test]
async fn live_and_reserved_questions_cannot_be_deleted() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let service = QuestionService::new();

    for status in [QuestionStatus::Live, QuestionStatus::Reserved] {
        let question = create_question(db, "on the board", status).await?;
        let err = service.delete_question(db, question.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::QuestionDeleteForbidden);
        assert!(questions::find_by_id(db, question.id).await?.is_some());
    }

    for status in [QuestionStatus::Idle, QuestionStatus::Closed] {
        let question = create_question(db, "off the board", status).await?;
        service.delete_question(db, question.id).await?;
        assert!(questions::find_by_id(db, question.id).await?.is_none());
    }
    Ok(())
}

#[tokio::test]
async fn deleting_a_closed_question_removes_its_reservations_and_answer() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let question = create_question(db, "Finished round", QuestionStatus::Closed).await?;
    let winner = create_player(db, "tia").await?;
    let runner_up = create_player(db, "uma").await?;
    let approved = create_reservation(db, question.id, winner.id, true).await?;
    let pending = create_reservation(db, question.id, runner_up.id, false).await?;
    let answer = create_answer(db, question.id, winner.id, "done").await?;

    QuestionService::new().delete_question(db, question.id).await?;

    assert!(questions::find_by_id(db, question.id).await?.is_none());
    assert!(reservations::find_by_id(db, approved.id).await?.is_none());
    assert!(reservations::find_by_id(db, pending.id).await?.is_none());
    assert!(answers::find_by_id(db, answer.id).await?.is_none());
    // Players outlive the question.
    assert!(players::find_by_id(db, winner.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn unknown_question_is_not_found() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    let err = QuestionService::new().get_question(db, 4242).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::QuestionNotFound);
    assert!(err.to_string().contains("4242"));
    Ok(())
}

#[tokio::test]
async fn list_labels_are_cropped() -> Result<(), AppError> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;

    create_question(
        db,
        "Which river flows through Budapest and Vienna?",
        QuestionStatus::Idle,
    )
    .await?;

    let listed = QuestionService::new().list_questions(db).await?;
    assert_eq!(listed[0].label(), "Which river flows through Buda");
    Ok(())
}
