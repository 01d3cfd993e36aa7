#![allow(dead_code)]

use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

// Logging is auto-installed for every test binary that pulls in `common`.
#[ctor::ctor]
fn init_logging() {
    quiz_test_support::logging::init();
}

/// Status plus parsed JSON body.
pub async fn json_body(resp: ServiceResponse<BoxBody>) -> (StatusCode, Value) {
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response body should be JSON")
    };
    (status, json)
}

/// Checks the Problem Details contract and returns the parsed body.
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_code: &str,
    expected_status: StatusCode,
) -> quiz_test_support::problem_details::ProblemDetailsLike {
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = test::read_body(resp).await;
    quiz_test_support::problem_details::assert_problem_details_from_parts(
        status,
        &headers,
        &body,
        expected_code,
        expected_status,
        None,
    )
}
