//! # plan-acciond
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations and the password hasher
//! - Bootstrap the first administrator when configured
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer, no domain logic belongs here.

mod config;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use plan_accion_adapter_http_axum::{AppState, SessionSettings, router};
use plan_accion_adapter_password_argon2::Argon2PasswordHasher;
use plan_accion_adapter_storage_sqlite_sqlx::{Config as StorageConfig, SqliteRepositories};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter).context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Database
    let db = StorageConfig {
        database_url: config.database.url.clone(),
        max_connections: config.database.max_connections,
    }
    .build()
    .await
    .context("failed to initialize database")?;

    // Sessions
    let secure = config.session.secure_cookies;
    let session = if let Some(secret) = &config.session.secret {
        SessionSettings::from_secret(secret.as_bytes(), secure)
    } else {
        tracing::warn!("no session secret configured, sessions will not survive a restart");
        SessionSettings::ephemeral(secure)
    };

    // Services
    let state = AppState::new(
        SqliteRepositories::from_database(&db),
        Argon2PasswordHasher,
        session,
    );

    if let Some(admin) = config.admin_credentials() {
        let created = state
            .auth
            .ensure_admin(admin.email, admin.password, admin.name)
            .await
            .context("failed to bootstrap administrator")?;
        if let Some(user) = created {
            tracing::info!(user_id = %user.id, email = %user.email, "administrator bootstrapped");
        }
    }

    // HTTP
    let app = router::build(state);

    let bind_addr = config.bind_addr();
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "plan-acciond listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// Resolve on SIGINT (Ctrl+C) or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received, draining connections");
}
