//! # Tasklist API Server
//!
//! Multi-user to-do service: accounts with email confirmation and password
//! reset, and per-user task groups holding ordered tasks.
//!
//! ## Usage
//!
//! ```bash
//! SECRET_KEY=$(openssl rand -hex 32) cargo run -p tasklist-api
//! ```
//!
//! Without `DATABASE_URL` users live in memory; without SMTP settings emails
//! are logged instead of sent.

use std::sync::Arc;
use tasklist_api::{
    app::{build_router, AppState},
    config::Config,
};
use tasklist_shared::{
    db::{
        pool::{create_pool, DatabaseConfig},
        schema::ensure_schema,
    },
    mail::{recording::RecordingMailer, smtp::SmtpMailer, Mailer},
    store::{memory::MemoryUserStore, postgres::PgUserStore, UserStore},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tasklist_api=debug,tasklist_shared=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Tasklist API Server v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let store: Arc<dyn UserStore> = match &config.database.url {
        Some(url) => {
            let pool = create_pool(DatabaseConfig {
                url: url.clone(),
                max_connections: config.database.max_connections,
                ..DatabaseConfig::default()
            })
            .await?;
            ensure_schema(&pool).await?;
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, users are kept in memory");
            Arc::new(MemoryUserStore::new())
        }
    };

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(settings) => Arc::new(SmtpMailer::new(settings)?),
        None => {
            tracing::warn!("SMTP not configured, emails are logged instead of sent");
            Arc::new(RecordingMailer::new())
        }
    };

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(store, mailer, config));

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
