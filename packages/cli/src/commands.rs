//! Subcommand implementations.
//!
//! Each command renders its result as plain text lines so `main` only has
//! to print them.

use std::path::Path;
use std::sync::Arc;

use nabe_map_cluster::{ClusterConfig, ClusterEngine, Viewport};
use nabe_map_color::{ColorAssigner, JsonFileStore};
use nabe_map_neighborhood_models::{LatLng, PlacesByRegion, Region};
use nabe_map_spatial::{RegionIndex, region_centroid};

fn format_centroid(region: &Region) -> String {
    region_centroid(region).map_or_else(
        || "-".to_string(),
        |c| format!("{:.5},{:.5}", c.latitude, c.longitude),
    )
}

/// One line per region: name, group, centroid, and color.
#[must_use]
pub fn describe_regions(regions: &[Region], assigner: &ColorAssigner) -> Vec<String> {
    regions
        .iter()
        .map(|region| {
            format!(
                "{}\t{}\t{}\t{}",
                region.name,
                region.group,
                format_centroid(region),
                assigner.color_for(&region.name).to_hex()
            )
        })
        .collect()
}

/// The region containing `point`, or a not-found message.
#[must_use]
pub fn locate(index: &RegionIndex, point: LatLng) -> String {
    index.locate(point).map_or_else(
        || format!("No neighborhood contains {},{}", point.latitude, point.longitude),
        |region| format!("{}\t{}", region.name, region.group),
    )
}

/// Labels to draw for a viewport, with cluster members where folded.
#[must_use]
pub fn cluster_labels(
    regions: &[Region],
    config: ClusterConfig,
    viewport: &Viewport,
    places: Option<&PlacesByRegion>,
) -> Vec<String> {
    let engine = ClusterEngine::new(config);
    engine
        .regions_for_view(regions, viewport, places)
        .iter()
        .map(|region| match region.member_names() {
            Some(members) => format!(
                "{}\t{}\t[{}]",
                region.name,
                format_centroid(region),
                members.join(", ")
            ),
            None => format!("{}\t{}", region.name, format_centroid(region)),
        })
        .collect()
}

/// Assigns colors to every region, persisting them to `cache_path`.
///
/// Waits for the cache to hydrate before the first lookup and for every
/// write to settle before returning.
pub async fn assign_colors(regions: &[Region], cache_path: &Path) -> Vec<String> {
    let store = Arc::new(JsonFileStore::new(cache_path));
    let assigner = ColorAssigner::spawn(store);
    assigner.wait_ready().await;

    let before = assigner.len();
    let lines = regions
        .iter()
        .map(|region| format!("{}\t{}", region.name, assigner.color_for(&region.name).to_hex()))
        .collect();
    assigner.flush().await;

    log::info!(
        "{} colors cached ({} new) in {}",
        assigner.len(),
        assigner.len() - before,
        cache_path.display()
    );

    lines
}
