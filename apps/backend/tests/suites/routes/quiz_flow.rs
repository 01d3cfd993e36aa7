//! The whole quiz over HTTP, admin and players taking turns.

use actix_web::http::StatusCode;
use actix_web::test;
use quiz_backend::db::require_db;
use serde_json::json;

use crate::common::{assert_problem, json_body};
use crate::support::auth::{bearer, login_token};
use crate::support::factory::{create_admin, create_live_question, create_player, create_reservation};
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn end_to_end_round() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let admin = create_admin(db, "host").await?;
    let alice = create_player(db, "alice").await?;
    let bob = create_player(db, "bob").await?;
    let admin_token = login_token(&state, &admin).await?;
    let alice_token = login_token(&state, &alice).await?;
    let bob_token = login_token(&state, &bob).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    // Nothing live yet.
    let req = test::TestRequest::get()
        .uri("/api/quiz/question")
        .insert_header(bearer(&alice_token))
        .to_request();
    let (status, page) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page["question"].is_null());
    assert_eq!(page["available_questions"], 0);
    let online: Vec<&str> = page["online_players"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["nickname"].as_str().unwrap())
        .collect();
    assert!(online.contains(&alice.nickname.as_str()));
    assert!(online.contains(&bob.nickname.as_str()));
    assert!(!online.contains(&admin.nickname.as_str()));

    // Admin publishes.
    let req = test::TestRequest::post()
        .uri("/api/admin/questions")
        .insert_header(bearer(&admin_token))
        .set_json(json!({ "question_text": "Largest ocean?" }))
        .to_request();
    let (status, question) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(question["status"], "idle");
    let qid = question["id"].as_i64().unwrap();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/questions/{qid}"))
        .insert_header(bearer(&admin_token))
        .set_json(json!({ "status": "live" }))
        .to_request();
    let (_, question) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(question["status"], "live");

    let req = test::TestRequest::get()
        .uri("/api/quiz/question")
        .insert_header(bearer(&bob_token))
        .to_request();
    let (_, page) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(page["question"]["id"], qid);
    assert_eq!(page["available_questions"], 1);

    // Both reserve; a repeat does not add a row.
    for token in [&alice_token, &bob_token, &alice_token] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/quiz/questions/{qid}/reservation"))
            .insert_header(bearer(token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/reservations?question_id={qid}"))
        .insert_header(bearer(&admin_token))
        .to_request();
    let (_, reservations) = json_body(test::call_service(&app, req).await).await;
    let reservations = reservations.as_array().unwrap().clone();
    assert_eq!(reservations.len(), 2);
    let alice_res = reservations
        .iter()
        .find(|r| r["player_id"] == alice.id)
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/quiz/questions/{qid}/reservation/steer"))
        .insert_header(bearer(&bob_token))
        .to_request();
    let (_, outcome) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(outcome, json!({ "outcome": "pending" }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/check_question_reservation/{qid}"))
        .insert_header(bearer(&bob_token))
        .to_request();
    let (_, poll) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(poll, json!({ "question_reserved": false }));

    // Admin approves Alice.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/reservations/{alice_res}"))
        .insert_header(bearer(&admin_token))
        .set_json(json!({ "approved": true }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/check_question_reservation/{qid}"))
        .insert_header(bearer(&bob_token))
        .to_request();
    let (_, poll) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(poll, json!({ "question_reserved": true }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/quiz/questions/{qid}/reservation/steer"))
        .insert_header(bearer(&bob_token))
        .to_request();
    let (_, outcome) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(outcome["outcome"], "lost");
    assert_eq!(outcome["approved_player"], alice.nickname.as_str());

    let req = test::TestRequest::get()
        .uri(&format!("/api/quiz/questions/{qid}/reservation/steer"))
        .insert_header(bearer(&alice_token))
        .to_request();
    let (_, outcome) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(outcome, json!({ "outcome": "won", "reservation_id": alice_res }));

    // Bob cannot answer on Alice's reservation.
    let answer_uri = format!("/api/quiz/questions/{qid}/reservations/{alice_res}/answer");
    let req = test::TestRequest::post()
        .uri(&answer_uri)
        .insert_header(bearer(&bob_token))
        .set_json(json!({ "answer_text": "Atlantic" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        "NOT_RESERVATION_HOLDER",
        StatusCode::FORBIDDEN,
    )
    .await;

    // Alice sees an empty form, answers, and a second try is dropped.
    let req = test::TestRequest::get()
        .uri(&answer_uri)
        .insert_header(bearer(&alice_token))
        .to_request();
    let (_, form) = json_body(test::call_service(&app, req).await).await;
    assert!(form["answer"].is_null());
    assert_eq!(form["read_only"], false);

    let req = test::TestRequest::post()
        .uri(&answer_uri)
        .insert_header(bearer(&alice_token))
        .set_json(json!({ "answer_text": "Pacific" }))
        .to_request();
    let (status, submitted) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(submitted["accepted"], true);
    assert_eq!(submitted["read_only"], true);
    let answer_id = submitted["answer"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&answer_uri)
        .insert_header(bearer(&alice_token))
        .set_json(json!({ "answer_text": "Indian" }))
        .to_request();
    let (_, again) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(again["accepted"], false);
    assert_eq!(again["answer"]["answer_text"], "Pacific");

    let req = test::TestRequest::get()
        .uri(&answer_uri)
        .insert_header(bearer(&alice_token))
        .to_request();
    let (_, form) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(form["read_only"], true);
    assert_eq!(form["answer"]["id"], answer_id);

    let req = test::TestRequest::get()
        .uri(&format!("/api/check_answer_status/{answer_id}"))
        .insert_header(bearer(&alice_token))
        .to_request();
    let (_, poll) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(poll, json!({ "answer_status": false }));

    // Admin judges.
    let req = test::TestRequest::patch()
        .uri(&format!("/api/admin/answers/{answer_id}"))
        .insert_header(bearer(&admin_token))
        .set_json(json!({ "status": "approved" }))
        .to_request();
    let (status, judged) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(judged["status"], "approved");

    let req = test::TestRequest::get()
        .uri(&format!("/api/check_answer_status/{answer_id}"))
        .insert_header(bearer(&alice_token))
        .to_request();
    let (_, poll) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(poll, json!({ "answer_status": true }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/quiz/questions/{qid}/answers/{answer_id}/steer"))
        .insert_header(bearer(&alice_token))
        .to_request();
    let (_, outcome) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(outcome, json!({ "outcome": "correct" }));

    let req = test::TestRequest::get()
        .uri(&format!("/api/admin/questions/{qid}"))
        .insert_header(bearer(&admin_token))
        .to_request();
    let (_, question) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(question["status"], "closed");
    Ok(())
}

#[actix_web::test]
async fn reservation_reports_created_once() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_player(db, "solo").await?;
    let question = create_live_question(db, "Only me").await?;
    let token = login_token(&state, &player).await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let uri = format!("/api/quiz/questions/{}/reservation", question.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&token))
        .to_request();
    let (_, first) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(first["created"], true);
    assert_eq!(first["question"]["status"], "live");

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&token))
        .to_request();
    let (_, second) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(second["created"], false);
    Ok(())
}

#[actix_web::test]
async fn answer_form_checks_reservation_matches_question() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_player(db, "mix").await?;
    let here = create_live_question(db, "Here").await?;
    let there = create_live_question(db, "There").await?;
    let reservation = create_reservation(db, there.id, player.id, true).await?;
    let token = login_token(&state, &player).await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/api/quiz/questions/{}/reservations/{}/answer",
            here.id, reservation.id
        ))
        .insert_header(bearer(&token))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        "RESERVATION_NOT_FOUND",
        StatusCode::NOT_FOUND,
    )
    .await;
    Ok(())
}

#[actix_web::test]
async fn pending_reservation_cannot_open_or_submit_the_answer(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let db = require_db(&state)?;
    let player = create_player(db, "eager").await?;
    let question = create_live_question(db, "Wait for the host").await?;
    let reservation = create_reservation(db, question.id, player.id, false).await?;
    let token = login_token(&state, &player).await?;
    let app = create_test_app(state).with_prod_routes().build().await;
    let answer_uri = format!(
        "/api/quiz/questions/{}/reservations/{}/answer",
        question.id, reservation.id
    );

    let req = test::TestRequest::get()
        .uri(&answer_uri)
        .insert_header(bearer(&token))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        "RESERVATION_NOT_APPROVED",
        StatusCode::FORBIDDEN,
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&answer_uri)
        .insert_header(bearer(&token))
        .set_json(json!({ "answer_text": "too soon" }))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        "RESERVATION_NOT_APPROVED",
        StatusCode::FORBIDDEN,
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/quiz/question")
        .insert_header(bearer(&token))
        .to_request();
    let (_, page) = json_body(test::call_service(&app, req).await).await;
    assert_eq!(page["question"]["id"], question.id);
    assert_eq!(page["question"]["status"], "live");
    Ok(())
}

#[actix_web::test]
async fn quiz_routes_require_a_token() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let req = test::TestRequest::get().uri("/api/quiz/question").to_request();
    assert_problem(
        test::call_service(&app, req).await,
        "UNAUTHORIZED_MISSING_BEARER",
        StatusCode::UNAUTHORIZED,
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/quiz/question")
        .insert_header(("Authorization", "Bearer not.a.jwt"))
        .to_request();
    assert_problem(
        test::call_service(&app, req).await,
        "UNAUTHORIZED_INVALID_JWT",
        StatusCode::UNAUTHORIZED,
    )
    .await;
    Ok(())
}
