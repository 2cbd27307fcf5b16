#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighborhood boundary, place, and color types.
//!
//! These are the plain data records exchanged between the boundary
//! loader, the geometry/clustering core, and whatever renders the map.
//! Coordinates inside boundary rings follow `GeoJSON` axis order
//! (`[longitude, latitude]`); everything handed to a renderer uses
//! [`LatLng`].

pub mod places;

use serde::{Deserialize, Serialize};

pub use places::{Place, PlacesByRegion};

/// A single boundary vertex as `[x, y]` = `[longitude, latitude]`.
pub type Position = [f64; 2];

/// An ordered sequence of vertices. The closing vertex may or may not
/// repeat the first one.
pub type Ring = Vec<Position>;

/// A polygon as a list of rings, outer ring first, holes after.
pub type Polygon = Vec<Ring>;

/// A multi-polygon boundary: `[polygon][ring][point]`.
pub type Geometry = Vec<Polygon>;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl LatLng {
    /// Creates a point from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Planar Euclidean distance in degree space (not great-circle).
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        (self.latitude - other.latitude).hypot(self.longitude - other.longitude)
    }
}

/// An RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formats the color as `#rrggbb`.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Metadata attached to a region synthesized by clustering.
///
/// Either both fields are present (the region stands for a group) or the
/// whole struct is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterInfo {
    /// Name of the representative region before relabeling.
    pub original_name: String,
    /// Names of every region folded into the cluster, in discovery order.
    pub member_names: Vec<String>,
}

/// Which feature properties hold a boundary's name and group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryFieldMapping {
    /// Property containing the unique neighborhood name.
    pub name: String,
    /// Property containing the grouping label (e.g. `"borough"`).
    pub group: String,
}

impl Default for BoundaryFieldMapping {
    fn default() -> Self {
        Self {
            name: "name".to_string(),
            group: "group".to_string(),
        }
    }
}

/// A named neighborhood boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Unique display name.
    pub name: String,
    /// Grouping label, e.g. the borough.
    pub group: String,
    /// Boundary polygons. Always at least one for well-formed input.
    pub geometry: Geometry,
    /// Any extra feature properties carried through untouched.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
    /// Present only on regions produced by clustering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterInfo>,
}

impl Region {
    /// Creates an un-clustered region with no extra properties.
    #[must_use]
    pub fn new(name: impl Into<String>, group: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            geometry,
            properties: serde_json::Map::new(),
            cluster: None,
        }
    }

    /// The region's name before any cluster relabeling.
    #[must_use]
    pub fn original_name(&self) -> &str {
        self.cluster
            .as_ref()
            .map_or(self.name.as_str(), |c| c.original_name.as_str())
    }

    /// Member names if this region stands for a cluster.
    #[must_use]
    pub fn member_names(&self) -> Option<&[String]> {
        self.cluster.as_ref().map(|c| c.member_names.as_slice())
    }

    /// Whether this region was synthesized by clustering.
    #[must_use]
    pub const fn is_cluster(&self) -> bool {
        self.cluster.is_some()
    }

    /// Outer rings of every polygon, in order.
    pub fn outer_rings(&self) -> impl Iterator<Item = &Ring> {
        self.geometry.iter().filter_map(|polygon| polygon.first())
    }
}
