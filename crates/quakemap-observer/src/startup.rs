//! Map server startup helper for the engine binary.
//!
//! Provides [`spawn_observer`] which binds the listener and launches the
//! server on a background Tokio task, so the feed fetches can run
//! alongside it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use quakemap_observer::startup::spawn_observer;
//! use quakemap_observer::{AppState, ServerConfig};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(composition));
//! let server = spawn_observer(&ServerConfig::default(), state).await?;
//! // The page is now reachable at server.addr.
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the map server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A running map server.
#[derive(Debug)]
pub struct SpawnedServer {
    /// The address actually bound (resolves port `0`).
    pub addr: SocketAddr,
    /// The background serving task.
    pub handle: JoinHandle<()>,
}

/// Bind the map server and serve it on a background Tokio task.
///
/// The listener is bound before the task is spawned so an unusable
/// address or a port already in use is reported here rather than lost
/// inside the task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be parsed or
/// bound.
pub async fn spawn_observer(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<SpawnedServer, StartupError> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::serve(listener, state).await {
            tracing::error!(error = %e, "Map server exited with error");
        }
    });

    tracing::info!(%addr, "Map server spawned on background task");

    Ok(SpawnedServer { addr, handle })
}
