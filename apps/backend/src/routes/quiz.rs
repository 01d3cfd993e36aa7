//! Player-facing quiz flow: see the live question, reserve, answer, learn the outcome.

use actix_web::{web, HttpRequest, HttpResponse};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::extractors::{CurrentPlayer, ValidatedJson};
use crate::repos::answers::Answer;
use crate::repos::players::Player;
use crate::repos::questions::Question;
use crate::services::answers::ensure_approved;
use crate::services::{AnswerService, PlayerService, QuestionService, ReservationService};
use crate::state::app_state::AppState;

/// Another player as the quiz page shows them.
#[derive(Debug, Serialize)]
pub struct OnlinePlayer {
    pub id: i64,
    pub nickname: String,
}

impl From<Player> for OnlinePlayer {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            nickname: player.nickname,
        }
    }
}

/// Sidebar data every quiz page carries.
#[derive(Debug, Serialize)]
pub struct Lobby {
    pub online_players: Vec<OnlinePlayer>,
    pub available_questions: u64,
}

impl Lobby {
    async fn load<C: ConnectionTrait + Send + Sync>(
        conn: &C,
        now: OffsetDateTime,
    ) -> Result<Self, AppError> {
        let online_players = PlayerService::new()
            .get_online_players(conn, now)
            .await?
            .into_iter()
            .map(OnlinePlayer::from)
            .collect();
        let available_questions = QuestionService::new().questions_available(conn).await?;
        Ok(Self {
            online_players,
            available_questions,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct QuestionPage {
    pub question: Option<Question>,
    #[serde(flatten)]
    pub lobby: Lobby,
}

#[derive(Debug, Serialize)]
pub struct ReservationPage {
    pub question: Question,
    pub created: bool,
    #[serde(flatten)]
    pub lobby: Lobby,
}

#[derive(Debug, Serialize)]
pub struct AnswerPage {
    pub question: Question,
    pub answer: Option<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    pub read_only: bool,
    #[serde(flatten)]
    pub lobby: Lobby,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub answer_text: String,
}

/// The newest live question, or none when the board is empty.
async fn current_question(
    http_req: HttpRequest,
    _current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let now = OffsetDateTime::now_utc();
    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let question = QuestionService::new().current_live_question(txn).await?;
            let lobby = Lobby::load(txn, now).await?;
            Ok(QuestionPage { question, lobby })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

/// Records the caller's reservation unless they already hold one on this question.
async fn reserve(
    http_req: HttpRequest,
    path: web::Path<i64>,
    current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let question_id = path.into_inner();
    let player_id = current.id;
    let now = OffsetDateTime::now_utc();

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let (_, created) = ReservationService::new()
                .reserve_if_first(txn, question_id, player_id)
                .await?;
            let question = QuestionService::new().get_question(txn, question_id).await?;
            let lobby = Lobby::load(txn, now).await?;
            Ok(ReservationPage {
                question,
                created,
                lobby,
            })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

async fn reservation_steer(
    http_req: HttpRequest,
    path: web::Path<i64>,
    current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let question_id = path.into_inner();
    let player_id = current.id;

    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            ReservationService::new()
                .steer(txn, question_id, player_id)
                .await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

/// Shows the answer form, or the existing answer read-only.
async fn answer_form(
    http_req: HttpRequest,
    path: web::Path<(i64, i64)>,
    _current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (question_id, reservation_id) = path.into_inner();
    let now = OffsetDateTime::now_utc();

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let question = QuestionService::new().get_question(txn, question_id).await?;
            let reservation = ReservationService::new()
                .get_reservation(txn, reservation_id)
                .await?;
            if reservation.question_id != question_id {
                return Err(reservation_not_on(reservation_id, question_id));
            }
            ensure_approved(&reservation)?;
            let answer = AnswerService::new().current_answer(txn, question_id).await?;
            let lobby = Lobby::load(txn, now).await?;
            Ok(AnswerPage {
                question,
                read_only: answer.is_some(),
                answer,
                accepted: None,
                lobby,
            })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

async fn submit_answer(
    http_req: HttpRequest,
    path: web::Path<(i64, i64)>,
    current: CurrentPlayer,
    body: ValidatedJson<AnswerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (question_id, reservation_id) = path.into_inner();
    let answer_text = body.into_inner().answer_text;
    let player_id = current.id;
    let now = OffsetDateTime::now_utc();

    let page = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let submission = AnswerService::new()
                .provide_answer(txn, question_id, reservation_id, player_id, &answer_text)
                .await?;
            let question = QuestionService::new().get_question(txn, question_id).await?;
            let lobby = Lobby::load(txn, now).await?;
            Ok(AnswerPage {
                question,
                answer: Some(submission.answer),
                accepted: Some(submission.accepted),
                read_only: true,
                lobby,
            })
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(page))
}

async fn answer_steer(
    http_req: HttpRequest,
    path: web::Path<(i64, i64)>,
    _current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (question_id, answer_id) = path.into_inner();

    let outcome = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            QuestionService::new().get_question(txn, question_id).await?;
            let service = AnswerService::new();
            let answer = service.get_answer(txn, answer_id).await?;
            if answer.question_id != question_id {
                return Err(DomainError::not_found(
                    NotFoundKind::Answer,
                    format!("Answer {answer_id} not found on question {question_id}"),
                )
                .into());
            }
            service.steer(txn, answer_id).await
        })
    })
    .await?;

    Ok(HttpResponse::Ok().json(outcome))
}

fn reservation_not_on(reservation_id: i64, question_id: i64) -> AppError {
    DomainError::not_found(
        NotFoundKind::Reservation,
        format!("Reservation {reservation_id} not found on question {question_id}"),
    )
    .into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/question", web::get().to(current_question))
        .route(
            "/questions/{question_id}/reservation",
            web::post().to(reserve),
        )
        .route(
            "/questions/{question_id}/reservation/steer",
            web::get().to(reservation_steer),
        )
        .service(
            web::resource("/questions/{question_id}/reservations/{reservation_id}/answer")
                .route(web::get().to(answer_form))
                .route(web::post().to(submit_answer)),
        )
        .route(
            "/questions/{question_id}/answers/{answer_id}/steer",
            web::get().to(answer_steer),
        );
}
