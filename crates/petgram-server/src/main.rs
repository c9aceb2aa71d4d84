mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use petgram_api::AppState;
use petgram_api::mailer::SmtpMailer;

use crate::config::Config;

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "petgram=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::load()?;

    if config.jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&config.jwt_secret.as_str()) {
        eprintln!("FATAL: PETGRAM_JWT_SECRET is unset or still a placeholder.");
        eprintln!("       Every issued session and email token is signed with it.");
        eprintln!("       Set it in your .env file and restart.");
        std::process::exit(1);
    }

    tokio::fs::create_dir_all(&config.uploads_dir).await?;

    let db = Arc::new(petgram_db::Database::open(&config.db_path)?);

    let mailer = SmtpMailer::new(
        &config.smtp.host,
        config.smtp.port,
        &config.smtp.username,
        &config.smtp.password,
        &config.smtp.from,
    )?;

    let state = AppState {
        db,
        mailer: Arc::new(mailer),
        jwt_secret: config.jwt_secret.clone(),
        api_url: config.api_url.clone(),
        uploads_dir: config.uploads_dir.clone(),
    };

    let cors = match &config.app_url {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE]),
        None => CorsLayer::permissive(),
    };

    let app = petgram_api::router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Petgram server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
