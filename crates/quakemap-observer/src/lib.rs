//! Map server for Quakemap.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Map page** (`GET /`) that draws the base layers, overlays, layer
//!   control, and legend in the browser
//! - **REST endpoints** for the composition and for each overlay's
//!   current contents
//! - **`WebSocket` endpoint** (`/ws/layers`) that announces when an
//!   overlay has been populated, via [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! The composition is fixed at startup. Each overlay lives behind its own
//! lock in [`AppState`] and is written once by the task that fetched its
//! feed. Requests never wait on a feed: a layer whose fetch has not
//! resolved is reported as pending, and a layer whose fetch failed stays
//! pending for the life of the process.

pub mod error;
pub mod handlers;
pub mod page;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{SpawnedServer, StartupError, spawn_observer};
pub use state::AppState;
