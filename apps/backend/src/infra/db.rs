use std::str::FromStr;
use std::time::Duration;

use migration::MigrationCommand;
use sea_orm::{DatabaseConnection, SqlxPostgresConnector, SqlxSqliteConnector};
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{info, trace};

use crate::config::db::{db_url, sqlite_file_path, DbKind, RuntimeEnv};
use crate::error::AppError;

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

fn engine(kind: DbKind) -> &'static str {
    match kind {
        DbKind::Postgres => "postgresql",
        DbKind::SqliteFile | DbKind::SqliteMemory => "sqlite",
    }
}

/// Opens a pool for the given backend. Does not run migrations.
///
/// In-memory sqlite lives and dies with its single connection, so that pool
/// is pinned at exactly one connection that never idles out.
pub async fn connect_db(kind: DbKind, env: RuntimeEnv) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind, env)?;

    match kind {
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            if kind == DbKind::SqliteFile {
                if let Some(dir) = sqlite_file_path(env).parent() {
                    std::fs::create_dir_all(dir).map_err(|e| {
                        AppError::config(format!("failed to create sqlite directory: {e}"))
                    })?;
                }
            }

            let connect_opts = SqliteConnectOptions::from_str(&url)
                .map_err(|e| AppError::config(format!("invalid SQLite connection options: {e}")))?
                .create_if_missing(true)
                .foreign_keys(true)
                .busy_timeout(Duration::from_millis(SQLITE_BUSY_TIMEOUT_MS));

            let (min, max) = match kind {
                DbKind::SqliteMemory => (1, 1),
                _ => (1, 8),
            };

            let mut options = SqlitePoolOptions::new()
                .min_connections(min)
                .max_connections(max)
                .acquire_timeout(ACQUIRE_TIMEOUT);
            if kind == DbKind::SqliteMemory {
                options = options.idle_timeout(None).max_lifetime(None);
            }

            let pool = options
                .connect_with(connect_opts)
                .await
                .map_err(|e| AppError::config(format!("failed to create SQLite pool: {e}")))?;

            trace!(engine = engine(kind), min, max, "pool=create");
            Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
        }
        DbKind::Postgres => {
            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(16)
                .acquire_timeout(ACQUIRE_TIMEOUT)
                .idle_timeout(Duration::from_secs(30))
                .after_connect(|conn, _meta| {
                    Box::pin(async move {
                        sqlx::query("SET timezone = 'UTC';")
                            .execute(&mut *conn)
                            .await?;
                        Ok::<_, sqlx::Error>(())
                    })
                })
                .connect(&url)
                .await
                .map_err(|e| AppError::config(format!("failed to connect to Postgres: {e}")))?;

            trace!(engine = engine(kind), "pool=create");
            Ok(SqlxPostgresConnector::from_sqlx_postgres_pool(pool))
        }
    }
}

/// Connects and brings the schema up to date.
pub async fn bootstrap_db(kind: DbKind, env: RuntimeEnv) -> Result<DatabaseConnection, AppError> {
    info!(
        env = ?env,
        db_kind = ?kind,
        engine = engine(kind),
        pid = std::process::id(),
        "bootstrap=start"
    );

    let conn = connect_db(kind, env).await?;
    migration::migrate(&conn, MigrationCommand::Up)
        .await
        .map_err(|e| AppError::config(format!("migration failed: {e}")))?;

    info!("bootstrap=ready");
    Ok(conn)
}
