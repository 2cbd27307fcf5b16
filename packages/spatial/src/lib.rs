#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geometry over neighborhood boundaries.
//!
//! Everything here is pure and deterministic: converting rings into
//! drawable `LatLng` sequences, picking the dominant polygon of a
//! multi-polygon and computing its area-weighted centroid, and resolving
//! a coordinate to the region that contains it. [`RegionIndex`] adds an
//! R-tree prefilter on top of the linear lookup without changing its
//! first-match semantics.

pub mod coords;
pub mod index;
pub mod locate;
pub mod polygon;

pub use coords::{drawable_rings, ring_to_lat_lng};
pub use index::RegionIndex;
pub use locate::{contains_point, region_for};
pub use polygon::{centroid, largest_polygon, region_centroid, ring_area};
