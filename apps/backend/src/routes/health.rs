use actix_web::{web, HttpResponse};
use migration::get_latest_migration_version;
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

pub async fn root() -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().body("Quiz backend is running"))
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    app_version: &'static str,
    #[serde(flatten)]
    db: DbProbe,
    time: String,
}

#[derive(Debug, Serialize)]
struct DbProbe {
    db: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    migrations: String,
}

impl DbProbe {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            db: "error",
            db_error: Some(error.into()),
            migrations: "unknown".to_string(),
        }
    }

    async fn run(conn: &DatabaseConnection) -> Self {
        let ping = Statement::from_string(
            conn.get_database_backend(),
            "SELECT 1 AS health_check".to_string(),
        );
        if let Err(e) = conn.query_one(ping).await {
            return Self::failed(format!("DB query failed: {e}"));
        }

        let migrations = match get_latest_migration_version(conn).await {
            Ok(Some(version)) => version,
            Ok(None) => "no_migrations".to_string(),
            Err(_) => "unknown".to_string(),
        };
        Self {
            db: "ok",
            db_error: None,
            migrations,
        }
    }
}

/// Always 200 so a load balancer sees the process; `db` tells whether it can
/// serve the quiz.
async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let db = match require_db(&app_state) {
        Ok(conn) => DbProbe::run(conn).await,
        Err(e) => DbProbe::failed(e.to_string()),
    };

    Ok(HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        app_version: env!("CARGO_PKG_VERSION"),
        db,
        time: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string()),
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(root))
        .route("/health", web::get().to(health));
}
