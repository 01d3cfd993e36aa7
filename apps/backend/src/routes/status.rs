//! Polling endpoints the quiz pages call while waiting on the admin.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;

use crate::db::txn::with_txn;
use crate::entities::{AnswerStatus, QuestionStatus};
use crate::error::AppError;
use crate::extractors::CurrentPlayer;
use crate::middleware::JwtExtract;
use crate::services::{AnswerService, QuestionService};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct QuestionReservedResponse {
    pub question_reserved: bool,
}

#[derive(Debug, Serialize)]
pub struct AnswerStatusResponse {
    pub answer_status: bool,
}

async fn check_question_reservation(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let question_id = path.into_inner();
    let question = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { QuestionService::new().get_question(txn, question_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(QuestionReservedResponse {
        question_reserved: question.status == QuestionStatus::Reserved,
    }))
}

/// `true` once the admin has judged the answer either way.
async fn check_answer_status(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let answer_id = path.into_inner();
    let answer = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { AnswerService::new().get_answer(txn, answer_id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(AnswerStatusResponse {
        answer_status: answer.status != AnswerStatus::Idle,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/check_question_reservation/{question_id}")
            .wrap(JwtExtract)
            .route(web::get().to(check_question_reservation)),
    )
    .service(
        web::resource("/api/check_answer_status/{answer_id}")
            .wrap(JwtExtract)
            .route(web::get().to(check_answer_status)),
    );
}
