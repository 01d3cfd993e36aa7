//! Admin console: questions, reservations, answers and players.
//!
//! Every handler takes [`AdminPlayer`], so a logged-in non-admin gets 403.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::db::txn::with_txn;
use crate::entities::{AnswerStatus, QuestionStatus};
use crate::error::AppError;
use crate::extractors::{AdminPlayer, ValidatedJson};
use crate::repos::answers::Answer;
use crate::repos::questions::Question;
use crate::services::{AnswerService, PlayerPatch, PlayerService, QuestionService, ReservationService};
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct QuestionListItem {
    #[serde(flatten)]
    pub question: Question,
    pub label: String,
}

impl From<Question> for QuestionListItem {
    fn from(question: Question) -> Self {
        Self {
            label: question.label(),
            question,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerListItem {
    #[serde(flatten)]
    pub answer: Answer,
    pub label: String,
}

impl From<Answer> for AnswerListItem {
    fn from(answer: Answer) -> Self {
        Self {
            label: answer.label(),
            answer,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub question_text: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub status: Option<QuestionStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ReservationFilter {
    pub question_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub approved: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAnswerRequest {
    pub answer_text: Option<String>,
    pub status: Option<AnswerStatus>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

// Questions

async fn list_questions(
    http_req: HttpRequest,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let questions = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { QuestionService::new().list_questions(txn).await })
    })
    .await?;

    let items: Vec<QuestionListItem> = questions.into_iter().map(QuestionListItem::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

async fn create_question(
    http_req: HttpRequest,
    admin: AdminPlayer,
    body: ValidatedJson<CreateQuestionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let question_text = body.into_inner().question_text;
    let question = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            QuestionService::new()
                .create_question(txn, &question_text)
                .await
        })
    })
    .await?;

    info!(admin_id = admin.id, question_id = question.id, "Admin created question");
    Ok(HttpResponse::Created().json(question))
}

async fn get_question(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let question = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { QuestionService::new().get_question(txn, id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(question))
}

/// Text first, then status; both in one transaction.
async fn update_question(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    body: ValidatedJson<UpdateQuestionRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let question = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let service = QuestionService::new();
            let mut question = service.get_question(txn, id).await?;
            if let Some(text) = body.question_text {
                question = service.update_text(txn, id, &text).await?;
            }
            if let Some(status) = body.status {
                question = service.set_status(txn, id, status).await?;
            }
            Ok(question)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(question))
}

async fn delete_question(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { QuestionService::new().delete_question(txn, id).await })
    })
    .await?;

    Ok(HttpResponse::NoContent().finish())
}

// Reservations

async fn list_reservations(
    http_req: HttpRequest,
    query: web::Query<ReservationFilter>,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let question_id = query.into_inner().question_id;
    let reservations = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            ReservationService::new()
                .list_reservations(txn, question_id)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(reservations))
}

async fn get_reservation(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let reservation = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { ReservationService::new().get_reservation(txn, id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(reservation))
}

/// Approving picks the winner; a second approval on the same question is a 409.
async fn update_reservation(
    http_req: HttpRequest,
    path: web::Path<i64>,
    admin: AdminPlayer,
    body: ValidatedJson<UpdateReservationRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let approved = body.into_inner().approved;
    let reservation = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            ReservationService::new()
                .set_approved(txn, id, approved)
                .await
        })
    })
    .await?;

    info!(
        admin_id = admin.id,
        reservation_id = id,
        approved,
        "Admin updated reservation"
    );
    Ok(HttpResponse::Ok().json(reservation))
}

// Answers

async fn list_answers(
    http_req: HttpRequest,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let answers = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { AnswerService::new().list_answers(txn).await })
    })
    .await?;

    let items: Vec<AnswerListItem> = answers.into_iter().map(AnswerListItem::from).collect();
    Ok(HttpResponse::Ok().json(items))
}

async fn get_answer(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let answer = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { AnswerService::new().get_answer(txn, id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(answer))
}

async fn update_answer(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    body: ValidatedJson<UpdateAnswerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let body = body.into_inner();
    let answer = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let service = AnswerService::new();
            let mut answer = service.get_answer(txn, id).await?;
            if let Some(text) = body.answer_text {
                answer = service.update_text(txn, id, &text).await?;
            }
            if let Some(status) = body.status {
                answer = service.set_status(txn, id, status).await?;
            }
            Ok(answer)
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(answer))
}

// Players

async fn list_players(
    http_req: HttpRequest,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let players = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { PlayerService::new().list_players(txn).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(players))
}

async fn create_player(
    http_req: HttpRequest,
    _admin: AdminPlayer,
    body: ValidatedJson<CreatePlayerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let player = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let service = PlayerService::new();
            if body.is_admin {
                service
                    .create_superuser(txn, &body.nickname, &body.email, &body.password)
                    .await
            } else {
                service
                    .create_user(txn, &body.nickname, &body.email, &body.password)
                    .await
            }
        })
    })
    .await?;

    Ok(HttpResponse::Created().json(player))
}

async fn get_player(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let player = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { PlayerService::new().get_player(txn, id).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(player))
}

async fn update_player(
    http_req: HttpRequest,
    path: web::Path<i64>,
    _admin: AdminPlayer,
    body: ValidatedJson<PlayerPatch>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    let player = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { PlayerService::new().update_player(txn, id, patch).await })
    })
    .await?;

    Ok(HttpResponse::Ok().json(player))
}

async fn delete_player(
    http_req: HttpRequest,
    path: web::Path<i64>,
    admin: AdminPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move { PlayerService::new().delete_player(txn, id).await })
    })
    .await?;

    info!(admin_id = admin.id, player_id = id, "Admin deleted player");
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/questions")
            .route(web::get().to(list_questions))
            .route(web::post().to(create_question)),
    )
    .service(
        web::resource("/questions/{id}")
            .route(web::get().to(get_question))
            .route(web::patch().to(update_question))
            .route(web::delete().to(delete_question)),
    )
    .route("/reservations", web::get().to(list_reservations))
    .service(
        web::resource("/reservations/{id}")
            .route(web::get().to(get_reservation))
            .route(web::patch().to(update_reservation)),
    )
    .route("/answers", web::get().to(list_answers))
    .service(
        web::resource("/answers/{id}")
            .route(web::get().to(get_answer))
            .route(web::patch().to(update_answer)),
    )
    .service(
        web::resource("/players")
            .route(web::get().to(list_players))
            .route(web::post().to(create_player)),
    )
    .service(
        web::resource("/players/{id}")
            .route(web::get().to(get_player))
            .route(web::patch().to(update_player))
            .route(web::delete().to(delete_player)),
    );
}
