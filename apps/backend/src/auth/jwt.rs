use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode};
use serde::{Deserialize, Serialize};

use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Claims included in our backend-issued access tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Player id (players.id) as a string
    pub sub: String,
    pub nickname: String,
    /// Session id (player_sessions.id); logout revokes the token through it
    pub sid: String,
    /// Issued-at (seconds since epoch)
    pub iat: i64,
    /// Expiry (seconds since epoch)
    pub exp: i64,
}

impl Claims {
    pub fn player_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::unauthorized_invalid_jwt())
    }
}

/// Mint a token that lives exactly as long as its session.
pub fn mint_access_token(
    player_id: i64,
    nickname: &str,
    session_id: &str,
    now: SystemTime,
    ttl: Duration,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = Claims {
        sub: player_id.to_string(),
        nickname: nickname.to_string(),
        sid: session_id.to_string(),
        iat,
        exp: iat + ttl.as_secs() as i64,
    };

    encode(&security.header(), &claims, security.encoding_key())
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify JWT and return claims.
///
/// Expired tokens map to `UNAUTHORIZED_EXPIRED_JWT`; every other decode
/// failure (bad signature, garbage) to `UNAUTHORIZED_INVALID_JWT`.
pub fn verify_access_token(token: &str, security: &SecurityConfig) -> Result<Claims, AppError> {
    decode::<Claims>(token, security.decoding_key(), &security.validation())
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}
