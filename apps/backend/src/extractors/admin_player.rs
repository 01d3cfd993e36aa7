use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};

use super::current_player::CurrentPlayer;
use crate::error::AppError;
use crate::errors::ErrorCode;

/// A [`CurrentPlayer`] with admin rights; 403 `ADMIN_REQUIRED` otherwise.
#[derive(Debug, Clone)]
pub struct AdminPlayer(pub CurrentPlayer);

impl Deref for AdminPlayer {
    type Target = CurrentPlayer;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AdminPlayer {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let current = CurrentPlayer::from_request(req, payload);

        Box::pin(async move {
            let player = current.await?;
            if !player.is_admin {
                return Err(AppError::forbidden(
                    ErrorCode::AdminRequired,
                    "Admin rights required",
                ));
            }
            Ok(AdminPlayer(player))
        })
    }
}
