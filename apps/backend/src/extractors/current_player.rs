use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpMessage, HttpRequest};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::auth::Claims;
use crate::db::require_db;
use crate::db::txn::SharedTxn;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::players::{self, Player};
use crate::services::SessionService;
use crate::state::app_state::AppState;

/// The authenticated player behind the request.
///
/// Claims come from `JwtExtract`; the session named in them must still be
/// active and the player must still be active.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentPlayer {
    pub id: i64,
    pub nickname: String,
    pub is_admin: bool,
    #[serde(skip_serializing)]
    pub session_id: String,
}

impl FromRequest for CurrentPlayer {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let claims = req
                .extensions()
                .get::<Claims>()
                .ok_or_else(AppError::unauthorized_missing_bearer)?
                .clone();

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            // Tests may hold the only connection in a shared transaction.
            if let Some(shared_txn) = SharedTxn::from_req(&req) {
                load(shared_txn.transaction(), &claims).await
            } else {
                load(require_db(app_state)?, &claims).await
            }
        })
    }
}

async fn load<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    claims: &Claims,
) -> Result<CurrentPlayer, AppError> {
    let player_id = claims.player_id()?;
    let now = OffsetDateTime::now_utc();

    let session = SessionService::new()
        .find_active(conn, &claims.sid, now)
        .await?
        .filter(|s| s.player_id == player_id);
    if session.is_none() {
        debug!(player_id, "Token refers to a closed or expired session");
        return Err(AppError::unauthorized(
            ErrorCode::SessionExpired,
            "Session has ended; log in again",
        ));
    }

    let player: Player = players::find_by_id(conn, player_id).await?.ok_or_else(|| {
        AppError::unauthorized(ErrorCode::SessionExpired, "Session has ended; log in again")
    })?;

    if !player.is_active {
        return Err(AppError::forbidden(
            ErrorCode::ForbiddenPlayerInactive,
            "Player account is inactive",
        ));
    }

    Ok(CurrentPlayer {
        id: player.id,
        nickname: player.nickname,
        is_admin: player.is_admin,
        session_id: claims.sid.clone(),
    })
}
