use quiz_backend::config::db::{DbKind, RuntimeEnv};
use quiz_backend::infra::state::build_state;
use quiz_backend::state::app_state::AppState;
use quiz_backend::state::security_config::SecurityConfig;
use quiz_backend::AppError;

pub const TEST_JWT_SECRET: &[u8] = b"quiz-test-secret";

pub fn test_security() -> SecurityConfig {
    SecurityConfig::new(TEST_JWT_SECRET)
}

/// Fresh, migrated in-memory database per call; tests never share rows.
pub async fn build_test_state() -> Result<AppState, AppError> {
    build_state()
        .with_env(RuntimeEnv::Test)
        .with_db(DbKind::SqliteMemory)
        .with_security(test_security())
        .build()
        .await
}
