//! # castingd
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`casting.toml` and environment variables)
//! - Initialize logging
//! - Open the `SQLite` pool and run migrations
//! - Construct repositories, the token verifier and the services
//! - Build the axum router and serve it until SIGINT or SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod config;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use casting_adapter_auth_jwt::JwtVerifier;
use casting_adapter_http_axum::state::AppState;
use casting_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteActorRepository, SqliteMovieRepository,
};
use casting_app::services::{ActorService, Authorizer, MovieService};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("initializing database")?;
    let pool = db.pool().clone();

    // Repositories
    let actor_repo = SqliteActorRepository::new(pool.clone());
    let movie_repo = SqliteMovieRepository::new(pool);

    // Authorization
    let jwt_config = config.jwt_config().context("reading token key")?;
    let verifier = JwtVerifier::new(&jwt_config).context("building token verifier")?;

    // HTTP
    let state = AppState::new(
        Authorizer::new(verifier),
        ActorService::new(actor_repo),
        MovieService::new(movie_repo),
    );
    let app = casting_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "castingd listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    tracing::info!("castingd stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
