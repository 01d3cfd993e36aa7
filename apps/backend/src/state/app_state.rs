use std::time::Duration;

use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (optional for test scenarios)
    pub db: Option<DatabaseConnection>,
    /// JWT signing settings
    pub security: SecurityConfig,
    /// Lifetime of a login session and of the token minted for it
    pub session_ttl: Duration,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig, session_ttl: Duration) -> Self {
        Self {
            db: Some(db),
            security,
            session_ttl,
        }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
