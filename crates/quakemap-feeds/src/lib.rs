//! GeoJSON feed fetching for Quakemap.
//!
//! [`FeedClient`] performs a single GET per feed and decodes the body into
//! a [`FeatureCollection`](quakemap_types::FeatureCollection). The engine
//! runs one fetch per overlay on its own task; neither waits on the other.

pub mod client;
pub mod error;

pub use client::{FeedClient, parse_collection};
pub use error::FeedError;
