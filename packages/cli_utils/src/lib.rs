#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the nabe map toolchain.
//!
//! Provides [`init_logger`] and the argument groups every subcommand
//! that reads a boundary file shares.

use std::path::PathBuf;

use clap::Args;
use nabe_map_neighborhood_models::{BoundaryFieldMapping, LatLng};

/// Initializes `pretty_env_logger` from `RUST_LOG`.
///
/// Defaults to `info` when `RUST_LOG` is unset. Calling it more than once
/// (e.g. from tests) is harmless.
pub fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.try_init().ok(); // Ignore error if logger was already set
}

/// Boundary file plus the properties that hold each feature's name and
/// group.
#[derive(Debug, Clone, Args)]
pub struct BoundaryArgs {
    /// Path to a `GeoJSON` `FeatureCollection` of neighborhood polygons
    pub boundaries: PathBuf,
    /// Feature property holding the neighborhood name
    #[arg(long, default_value = "name")]
    pub name_field: String,
    /// Feature property holding the group (e.g. borough)
    #[arg(long, default_value = "group")]
    pub group_field: String,
}

impl BoundaryArgs {
    /// The field mapping described by these arguments.
    #[must_use]
    pub fn field_mapping(&self) -> BoundaryFieldMapping {
        BoundaryFieldMapping {
            name: self.name_field.clone(),
            group: self.group_field.clone(),
        }
    }
}

/// A coordinate given as `--lat` / `--lng`.
#[derive(Debug, Clone, Copy, Args)]
pub struct PointArgs {
    /// Latitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,
    /// Longitude in decimal degrees
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

impl PointArgs {
    /// The coordinate as a [`LatLng`].
    #[must_use]
    pub const fn lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}
