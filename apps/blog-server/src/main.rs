//! # Blogicum API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use blogicum_core::SystemClock;
use blogicum_core::ports::{PasswordService, TokenService};
use blogicum_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;

use config::AppConfig;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Blogicum API Server on {}:{}",
        config.host,
        config.port
    );

    let state = web::Data::new(AppState::new(config.database.as_ref(), Arc::new(SystemClock)).await);

    let token_service: Arc<dyn TokenService> =
        Arc::new(JwtTokenService::new(JwtConfig::from_env()));
    let token_service = web::Data::new(token_service);

    let password_service: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
    let password_service = web::Data::new(password_service);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(RequestIdMiddleware)
            .app_data(state.clone())
            .app_data(token_service.clone())
            .app_data(password_service.clone())
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
