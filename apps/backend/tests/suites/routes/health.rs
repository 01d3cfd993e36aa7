use actix_web::http::StatusCode;
use actix_web::test;

use crate::common::json_body;
use crate::support::{build_test_state, create_test_app};

#[actix_web::test]
async fn root_greets() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8(body.to_vec())?.contains("Quiz"));
    Ok(())
}

#[actix_web::test]
async fn health_reports_db_and_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    let (status, json) = json_body(resp).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db"], "ok");
    assert!(json["migrations"].as_str().unwrap().starts_with("m2"));
    assert!(json["app_version"].is_string());
    Ok(())
}

#[actix_web::test]
async fn health_without_db_still_answers() -> Result<(), Box<dyn std::error::Error>> {
    let state = quiz_backend::infra::state::build_state().build().await?;
    let app = create_test_app(state).with_prod_routes().build().await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    let (status, json) = json_body(resp).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["db"], "error");
    assert!(json["db_error"].is_string());
    Ok(())
}
