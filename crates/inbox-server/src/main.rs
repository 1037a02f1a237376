use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use inbox_api::validation::ContactRules;
use inbox_api::{AppState, AppStateInner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "inbox_server=debug,inbox_api=debug,inbox_db=info,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let db_path: PathBuf = std::env::var("INBOX_DB_PATH")
        .unwrap_or_else(|_| "contacts.db".into())
        .into();
    let host = std::env::var("INBOX_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("INBOX_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .context("INBOX_PORT must be a port number")?;
    let rules: ContactRules = std::env::var("INBOX_RULES")
        .unwrap_or_else(|_| "standard".into())
        .parse()?;

    // Init database
    let db = inbox_db::Database::open(&db_path)?;

    let state: AppState = Arc::new(AppStateInner { db, rules });

    let app = inbox_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Inbox server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router (and with it the database handle) is dropped here.
    info!("Server stopped, database closed");
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
