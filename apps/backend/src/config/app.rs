//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::config::db::{must_var, DbKind, RuntimeEnv};
use crate::error::AppError;

/// Two weeks; sessions have to outlive a browser close for presence to mean anything.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 14 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Database
    pub runtime_env: RuntimeEnv,
    pub db_kind: DbKind,

    // Security
    pub jwt_secret: String,
    pub session_ttl: Duration,
}

impl Config {
    /// Load and validate all configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port_str = env::var("BACKEND_PORT").unwrap_or_else(|_| "3001".to_string());
        let port = port_str.parse::<u16>().map_err(|_| {
            AppError::config(format!(
                "BACKEND_PORT must be a valid port number, got '{port_str}'"
            ))
        })?;

        let db_kind = match env::var("QUIZ_DB_KIND") {
            Ok(raw) => raw.parse::<DbKind>()?,
            Err(_) => DbKind::Postgres,
        };

        let jwt_secret = must_var("BACKEND_JWT_SECRET")?;
        if jwt_secret.trim().is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }

        let session_ttl = match env::var("QUIZ_SESSION_TTL_SECS") {
            Ok(raw) => {
                let secs = raw.parse::<u64>().map_err(|_| {
                    AppError::config(format!(
                        "QUIZ_SESSION_TTL_SECS must be a positive integer, got '{raw}'"
                    ))
                })?;
                if secs == 0 {
                    return Err(AppError::config("QUIZ_SESSION_TTL_SECS must be greater than 0"));
                }
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };

        Ok(Self {
            host,
            port,
            runtime_env: RuntimeEnv::Prod,
            db_kind,
            jwt_secret,
            session_ttl,
        })
    }
}
