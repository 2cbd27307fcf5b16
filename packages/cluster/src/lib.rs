#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zoom-gated clustering of neighborhood labels.
//!
//! When the map is zoomed out far enough, neighborhoods whose centroids
//! sit close together are folded into a single labeled region. The
//! representative of each fold is chosen from the places users have
//! attached to its members, with the fold nearest the map center getting
//! a proximity tie-break.

pub mod config;
pub mod engine;

use thiserror::Error;

pub use config::ClusterConfig;
pub use engine::{ClusterEngine, Viewport, cluster};

/// Errors that can occur while loading clustering configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for [`ClusterConfig`].
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
