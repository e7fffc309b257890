//! loresheet-server - character sheet API over a directory of actor files
//!
//! Serves the front end from a public directory and exposes the actor
//! records, derived sheets and skill rolls as JSON.

pub mod api;
pub mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use loresheet::store::ActorStore;
use loresheet::tooltips::Tooltips;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};

pub use api::AppState;
pub use config::ServerConfig;

/// The loresheet server instance
pub struct Server {
    config: ServerConfig,
    state: AppState,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Create a server, loading the tooltip table up front.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let path = config.tooltips_path();
        let tooltips = if path.exists() {
            Tooltips::from_path(&path)
                .with_context(|| format!("failed to load tooltips from {}", path.display()))?
        } else {
            warn!("tooltips file {} not found; continuing without", path.display());
            Tooltips::empty()
        };
        info!("loaded {} tooltips", tooltips.len());

        let state = AppState {
            store: Arc::new(ActorStore::new(&config.data_dir)),
            tooltips: Arc::new(tooltips),
        };
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self { config, state, shutdown_tx, shutdown_rx })
    }

    /// Build the router
    pub fn router(&self) -> Router {
        api::router(self.state.clone(), &self.config.public_dir)
    }

    /// Run the server until shutdown or Ctrl-C
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("loresheet listening on http://{}/", local_addr);

        let router = self.router();
        let mut shutdown_rx = self.shutdown_rx.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_rx.changed() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            })
            .await?;

        info!("loresheet shutdown complete");
        Ok(())
    }

    /// Signal the server to shutdown
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }
}
