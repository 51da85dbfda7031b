//! Quakemap binary.
//!
//! Wires configuration, logging, the map server, and the two feed loaders
//! together. The map page is served as soon as the server is bound; each
//! overlay fills in when its feed arrives.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `quakemap-config.yaml` (or `QUAKEMAP_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build the magnitude palette and warn about malformed colors
//! 4. Compose the map
//! 5. Start the map server
//! 6. Spawn the earthquake and plate boundary loaders
//! 7. Serve until the process is terminated

mod error;
mod loader;

use std::path::PathBuf;
use std::sync::Arc;

use quakemap_core::{QuakemapConfig, compose_map};
use quakemap_feeds::FeedClient;
use quakemap_observer::{AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "QUAKEMAP_CONFIG";

/// Configuration file used when `QUAKEMAP_CONFIG` is unset.
const DEFAULT_CONFIG_PATH: &str = "quakemap-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the server cannot bind,
/// or the server task ends abnormally. Feed failures are logged and do not
/// stop the process.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = std::env::var(CONFIG_PATH_ENV)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = QuakemapConfig::load_or_default(&config_path).map_err(EngineError::from)?;

    // 2. Initialize structured logging. RUST_LOG wins over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("quakemap-engine starting");
    info!(
        path = %config_path.display(),
        earthquakes_url = %config.feeds.earthquakes_url,
        plates_url = %config.feeds.plates_url,
        "Configuration loaded"
    );
    if config.tiles.access_token.is_empty() {
        warn!("tiles.access_token is empty; base layer tiles will not load");
    }

    // 3. Build the magnitude palette.
    let bands = config.style.band_table().map_err(EngineError::from)?;
    for color in bands.invalid_colors() {
        warn!(color, "palette color is not a valid CSS hex color");
    }
    info!(bands = bands.bands().len(), fallback = bands.fallback(), "Palette ready");

    // 4. Compose the map.
    let composition = compose_map(&config, &bands);
    info!(
        base_layers = composition.base_layers.len(),
        overlays = composition.overlays.len(),
        "Map composed"
    );

    // 5. Start the map server.
    let state = Arc::new(AppState::new(composition));
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let server = quakemap_observer::spawn_observer(&server_config, Arc::clone(&state))
        .await
        .map_err(EngineError::from)?;
    info!(addr = %server.addr, "Map server started");

    // 6. Spawn the feed loaders.
    let client = FeedClient::new(&config.feeds.user_agent).map_err(EngineError::from)?;
    let _earthquakes = loader::spawn_earthquake_loader(
        client.clone(),
        config.feeds.earthquakes_url.clone(),
        bands,
        Arc::clone(&state),
    );
    let _plates = loader::spawn_plate_loader(client, config.feeds.plates_url.clone(), state);
    info!("Feed loaders spawned");

    // 7. Serve until terminated.
    server.handle.await.map_err(|e| EngineError::Server {
        message: e.to_string(),
    })?;

    info!("quakemap-engine shutdown complete");
    Ok(())
}
