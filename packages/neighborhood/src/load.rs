//! Normalizes `GeoJSON` features into [`Region`] values.
//!
//! Uses a [`BoundaryFieldMapping`] to pick the name and group out of each
//! feature's properties; every other property is carried through
//! untouched. Ring coordinates are kept exactly as given, closed or not.

use std::collections::BTreeSet;
use std::path::Path;

use geojson::{Feature, GeoJson, Value};
use nabe_map_neighborhood_models::{
    BoundaryFieldMapping, Geometry, PlacesByRegion, Polygon, Region, Ring,
};

use crate::NeighborhoodError;

/// Parses a `FeatureCollection` (or a single `Feature`) into regions.
///
/// Skips features with a missing name or group, a null or non-polygonal
/// geometry, or empty rings. Later features reusing an earlier name are
/// dropped.
///
/// # Errors
///
/// Returns [`NeighborhoodError`] if the document is not `GeoJSON` or is a
/// bare geometry.
pub fn parse_feature_collection(
    json: &str,
    fields: &BoundaryFieldMapping,
) -> Result<Vec<Region>, NeighborhoodError> {
    let features = match json.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            return Err(NeighborhoodError::Conversion {
                message: "Expected a FeatureCollection, found a bare geometry".to_string(),
            });
        }
    };

    let total = features.len();
    let mut seen = BTreeSet::new();
    let mut regions = Vec::with_capacity(total);

    for (idx, feature) in features.into_iter().enumerate() {
        let Some(region) = normalize_feature(feature, fields) else {
            log::warn!("Skipping feature {idx}: missing name, group, or polygon geometry");
            continue;
        };
        if !seen.insert(region.name.clone()) {
            log::warn!("Skipping feature {idx}: duplicate name {}", region.name);
            continue;
        }
        regions.push(region);
    }

    log::info!("Loaded {} regions from {total} features", regions.len());

    Ok(regions)
}

/// Reads and parses a boundary file.
///
/// # Errors
///
/// Returns [`NeighborhoodError`] if the file cannot be read or parsed.
pub fn load_regions(
    path: &Path,
    fields: &BoundaryFieldMapping,
) -> Result<Vec<Region>, NeighborhoodError> {
    let contents = std::fs::read_to_string(path)?;
    parse_feature_collection(&contents, fields)
}

/// Reads a JSON object of region name to place list.
///
/// # Errors
///
/// Returns [`NeighborhoodError`] if the file cannot be read or parsed.
pub fn load_places(path: &Path) -> Result<PlacesByRegion, NeighborhoodError> {
    let contents = std::fs::read_to_string(path)?;
    let places: PlacesByRegion = serde_json::from_str(&contents)?;
    log::info!("Loaded places for {} regions", places.len());
    Ok(places)
}

fn normalize_feature(feature: Feature, fields: &BoundaryFieldMapping) -> Option<Region> {
    let mut properties = feature.properties.unwrap_or_default();

    let name = take_string(&mut properties, &fields.name)?;
    let group = take_string(&mut properties, &fields.group)?;

    let geometry: Geometry = match feature.geometry?.value {
        Value::Polygon(rings) => vec![convert_polygon(&rings)?],
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .map(|polygon| convert_polygon(polygon))
            .collect::<Option<_>>()?,
        _ => return None,
    };

    if geometry.is_empty() {
        return None;
    }

    Some(Region {
        name,
        group,
        geometry,
        properties,
        cluster: None,
    })
}

/// Removes a non-empty string property, trimmed.
fn take_string(
    properties: &mut serde_json::Map<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    let value = properties.remove(key)?;
    let trimmed = value.as_str().map(str::trim).filter(|s| !s.is_empty())?;
    Some(trimmed.to_string())
}

fn convert_polygon(rings: &[Vec<Vec<f64>>]) -> Option<Polygon> {
    if rings.is_empty() {
        return None;
    }
    rings.iter().map(|ring| convert_ring(ring)).collect()
}

fn convert_ring(ring: &[Vec<f64>]) -> Option<Ring> {
    if ring.is_empty() {
        return None;
    }
    ring.iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Some([*x, *y]),
            _ => None,
        })
        .collect()
}
