#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood boundary and place loading.
//!
//! Parses a `GeoJSON` `FeatureCollection` of neighborhood polygons into
//! [`Region`](nabe_map_neighborhood_models::Region) values, using a
//! [`BoundaryFieldMapping`](nabe_map_neighborhood_models::BoundaryFieldMapping)
//! to find each feature's name and group, and reads the per-neighborhood
//! place lists that drive cluster labeling.

pub mod load;

use thiserror::Error;

pub use load::{load_places, load_regions, parse_feature_collection};

/// Errors that can occur while loading neighborhood data.
#[derive(Debug, Error)]
pub enum NeighborhoodError {
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// Data conversion or normalization error.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}
