use std::time::SystemTime;

use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;

use crate::auth::mint_access_token;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentPlayer, ValidatedJson};
use crate::middleware::JwtExtract;
use crate::repos::players::Player;
use crate::repos::sessions::PlayerSession;
use crate::services::{PlayerService, SessionService};
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub nickname: String,
    #[serde(default)]
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub player: Player,
}

fn issue_token(
    state: &AppState,
    player: Player,
    session: &PlayerSession,
    now: OffsetDateTime,
) -> Result<AuthResponse, AppError> {
    let token = mint_access_token(
        player.id,
        &player.nickname,
        &session.id,
        SystemTime::from(now),
        state.session_ttl,
        &state.security,
    )?;
    Ok(AuthResponse { token, player })
}

/// Registers a player and logs them straight in.
async fn signup(
    http_req: HttpRequest,
    body: ValidatedJson<SignupRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let now = OffsetDateTime::now_utc();
    let ttl = app_state.session_ttl;

    let (player, session) = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let player = PlayerService::new()
                .signup(txn, &body.nickname, &body.email, &body.password1, &body.password2)
                .await?;
            let session = SessionService::new()
                .open_session(txn, player.id, now, ttl)
                .await?;
            Ok((player, session))
        })
    })
    .await?;

    info!(player_id = player.id, "Player signed up");
    let response = issue_token(&app_state, player, &session, now)?;
    Ok(HttpResponse::Created().json(response))
}

async fn login(
    http_req: HttpRequest,
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let now = OffsetDateTime::now_utc();
    let ttl = app_state.session_ttl;

    let (player, session, purged) = with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            let player = PlayerService::new()
                .authenticate(txn, &body.nickname, &body.password)
                .await?;
            let sessions = SessionService::new();
            // Presence rows of players who never logged out.
            let purged = sessions.purge_expired(txn, now).await?;
            let session = sessions.open_session(txn, player.id, now, ttl).await?;
            Ok((player, session, purged))
        })
    })
    .await?;

    info!(player_id = player.id, purged_sessions = purged, "Player logged in");
    let response = issue_token(&app_state, player, &session, now)?;
    Ok(HttpResponse::Ok().json(response))
}

/// Drops the session row; the player leaves the online list at once.
async fn logout(
    http_req: HttpRequest,
    current: CurrentPlayer,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let session_id = current.session_id.clone();
    with_txn(Some(&http_req), &app_state, |txn| {
        Box::pin(async move {
            SessionService::new()
                .close_session(txn, &session_id)
                .await
        })
    })
    .await?;

    info!(player_id = current.id, "Player logged out");
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/signup", web::post().to(signup))
        .route("/login", web::post().to(login))
        .service(
            web::resource("/logout")
                .wrap(JwtExtract)
                .route(web::post().to(logout)),
        );
}
