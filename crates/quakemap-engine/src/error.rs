//! Error types for the Quakemap binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and while loading the feeds.

/// Top-level error for the Quakemap binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` and the loaders can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: quakemap_core::ConfigError,
    },

    /// The magnitude palette is unusable.
    #[error("style error: {source}")]
    Style {
        /// The underlying style error.
        #[from]
        source: quakemap_core::StyleError,
    },

    /// A feed could not be fetched or decoded.
    #[error("feed error: {source}")]
    Feed {
        /// The underlying feed error.
        #[from]
        source: quakemap_feeds::FeedError,
    },

    /// Earthquake markers could not be rendered.
    #[error("render error: {source}")]
    Render {
        /// The underlying render error.
        #[from]
        source: quakemap_core::RenderError,
    },

    /// The map server failed to start.
    #[error("server startup error: {source}")]
    Startup {
        /// The underlying startup error.
        #[from]
        source: quakemap_observer::StartupError,
    },

    /// The map server task ended abnormally.
    #[error("server task error: {message}")]
    Server {
        /// Description of the task failure.
        message: String,
    },
}
