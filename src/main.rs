//! Amparo backend entrypoint.
//!
//! Loads configuration, connects to Postgres, wires the adapters into
//! the HTTP router and starts the daily reminder job.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amparo::adapters::email::SmtpMailer;
use amparo::adapters::http::{api_router, AppState};
use amparo::adapters::jobs::ReminderJob;
use amparo::adapters::postgres::{
    PostgresAccountRepository, PostgresAppointmentRepository, PostgresIdentityStore,
    PostgresResetTokenRepository,
};
use amparo::application::handlers::SendDueRemindersHandler;
use amparo::config::AppConfig;
use amparo::domain::provisioning::WebhookVerifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    info!(
        environment = ?config.server.environment,
        "Starting Amparo backend v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Database
    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    // Adapters
    let accounts = Arc::new(PostgresAccountRepository::new(pool.clone()));
    let identities = Arc::new(PostgresIdentityStore::new(pool.clone()));
    let reset_tokens = Arc::new(PostgresResetTokenRepository::new(pool.clone()));
    let appointments = Arc::new(PostgresAppointmentRepository::new(pool.clone()));
    let mailer = Arc::new(SmtpMailer::new(&config.email)?);

    let webhook_verifier = Arc::new(WebhookVerifier::new(
        config.webhooks.mercadopago_secret.expose_secret(),
        config.webhooks.hotmart_token.expose_secret(),
    ));

    let state = AppState {
        accounts,
        identities,
        reset_tokens,
        appointments: appointments.clone(),
        mailer: mailer.clone(),
        webhook_verifier,
        public_base_url: config.server.public_base_url.clone(),
    };

    // Background jobs
    let reminder_handler = Arc::new(SendDueRemindersHandler::new(appointments, mailer));
    ReminderJob::new(reminder_handler).start();

    // HTTP server
    let mut app = api_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )));

    let origins = config.server.cors_origins_list();
    if !origins.is_empty() {
        let mut parsed = Vec::with_capacity(origins.len());
        for origin in &origins {
            match origin.parse::<HeaderValue>() {
                Ok(value) => parsed.push(value),
                Err(_) => warn!(origin, "ignoring invalid CORS origin"),
            }
        }
        app = app.layer(
            CorsLayer::new()
                .allow_origin(parsed)
                .allow_methods([Method::GET, Method::POST, Method::PATCH])
                .allow_headers(tower_http::cors::Any),
        );
    }

    let addr = config.server.socket_addr()?;
    info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.clone().into());

    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
