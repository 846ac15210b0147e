//! postboard server entry point.
//!
//! Loads configuration, opens the database, bootstraps the first admin
//! and serves the HTTP API until interrupted. Logs are JSON on stderr.

use anyhow::{Context, Result};
use postboard_core::{AppConfig, BoardDb, auth::admin};
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

mod error;
mod routes;
mod state;
mod sweep;

use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    tracing::info!(db_path = %config.db_path.display(), "opening database");
    let db = BoardDb::open(&config.db_path).await.context("opening database")?;

    if let Some((email, password)) = config.admin_credentials() {
        admin::bootstrap_admin(&db, email, password)
            .await
            .context("creating initial admin")?;
    }

    let bind_addr = config.bind_addr.clone();
    let sweep_interval = config.sweep_interval();
    let state = AppState::new(db, config);

    let sweeper = sweep_interval.map(|period| sweep::spawn(state.board.clone(), period));

    let app = routes::router(state);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    tracing::info!(%bind_addr, "postboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    tracing::info!("postboard stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        tracing::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
