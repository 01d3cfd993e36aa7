use actix_web::{web, App, HttpServer};
use quiz_backend::config::app::Config;
use quiz_backend::config::db::RuntimeEnv;
use quiz_backend::infra::state::build_state;
use quiz_backend::middleware::{
    cors_middleware, RequestTrace, StructuredLogger, TraceSpan,
};
use quiz_backend::routes;
use quiz_backend::state::security_config::SecurityConfig;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    info!(host = %config.host, port = config.port, db_kind = ?config.db_kind, "Starting quiz backend");

    let security_config = SecurityConfig::new(config.jwt_secret.as_bytes());

    let app_state = match build_state()
        .with_env(config.runtime_env)
        .with_db(config.db_kind)
        .with_security(security_config)
        .with_session_ttl(config.session_ttl)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            eprintln!("❌ Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    info!("Database connected and migrated");

    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
