//! Greedy single-pass clustering.
//!
//! Regions are visited in input order. Each unvisited region seeds a
//! group and pulls in every later unvisited region whose centroid lies
//! within the distance threshold. Groups are emitted in discovery order;
//! singletons pass through untouched and larger groups collapse into a
//! relabeled copy of their representative.

use nabe_map_neighborhood_models::{ClusterInfo, LatLng, PlacesByRegion, Region};
use nabe_map_spatial::region_centroid;

use crate::config::ClusterConfig;

/// What the map is currently showing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Map center.
    pub center: LatLng,
    /// Visible latitude span in degrees.
    pub latitude_span: f64,
}

struct Member<'a> {
    region: &'a Region,
    centroid: Option<LatLng>,
}

impl Member<'_> {
    fn distance_to(&self, point: &LatLng) -> f64 {
        self.centroid
            .map_or(f64::INFINITY, |c| c.planar_distance(point))
    }

    fn place_count(&self, places: Option<&PlacesByRegion>) -> usize {
        places.map_or(0, |p| p.count(self.region.original_name()))
    }
}

struct Group<'a> {
    members: Vec<Member<'a>>,
    center_distance: f64,
}

/// Folds nearby regions together.
///
/// `distance_threshold` is compared (strictly) against the planar
/// distance between centroids in degree space. `places` drives the choice
/// of representative; `None` behaves as if no region had places.
#[must_use]
pub fn cluster(
    regions: &[Region],
    distance_threshold: f64,
    map_center: LatLng,
    places: Option<&PlacesByRegion>,
) -> Vec<Region> {
    let groups = discover_groups(regions, distance_threshold, map_center);
    let central = central_group(&groups);

    log::debug!(
        "Clustered {} regions into {} groups (threshold {distance_threshold})",
        regions.len(),
        groups.len()
    );

    groups
        .iter()
        .enumerate()
        .map(|(idx, group)| {
            if let [only] = group.members.as_slice() {
                return only.region.clone();
            }
            let representative = if central == Some(idx) {
                pick_central(&group.members, &map_center, places)
            } else {
                pick_peripheral(&group.members, places)
            };
            synthesize(group, representative)
        })
        .collect()
}

fn discover_groups(regions: &[Region], threshold: f64, map_center: LatLng) -> Vec<Group<'_>> {
    let centroids: Vec<Option<LatLng>> = regions.iter().map(region_centroid).collect();
    let mut visited = vec![false; regions.len()];
    let mut groups = Vec::new();

    for (i, region) in regions.iter().enumerate() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let seed = centroids[i];
        if seed.is_none() {
            log::warn!("Region {} has no usable outer ring; not clustering it", region.name);
        }

        let mut members = vec![Member {
            region,
            centroid: seed,
        }];

        if let Some(seed) = seed {
            for j in (i + 1)..regions.len() {
                if visited[j] {
                    continue;
                }
                let Some(other) = centroids[j] else {
                    continue;
                };
                if seed.planar_distance(&other) < threshold {
                    visited[j] = true;
                    members.push(Member {
                        region: &regions[j],
                        centroid: Some(other),
                    });
                }
            }
        }

        let center_distance = seed.map_or(f64::INFINITY, |c| c.planar_distance(&map_center));
        groups.push(Group {
            members,
            center_distance,
        });
    }

    groups
}

/// Index of the group closest to the map center; ties keep the first.
fn central_group(groups: &[Group<'_>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, group) in groups.iter().enumerate() {
        match best {
            Some((_, distance)) if group.center_distance >= distance => {}
            _ => best = Some((idx, group.center_distance)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Most places wins, ties go to the member closest to the map center.
/// Without any places, the closest member wins outright.
fn pick_central(members: &[Member<'_>], center: &LatLng, places: Option<&PlacesByRegion>) -> usize {
    let mut best: Option<(usize, usize, f64)> = None;
    for (idx, member) in members.iter().enumerate() {
        let count = member.place_count(places);
        if count == 0 {
            continue;
        }
        let distance = member.distance_to(center);
        let better = match best {
            None => true,
            Some((_, best_count, best_distance)) => {
                count > best_count || (count == best_count && distance < best_distance)
            }
        };
        if better {
            best = Some((idx, count, distance));
        }
    }

    if let Some((idx, _, _)) = best {
        return idx;
    }

    let mut closest = (0, f64::INFINITY);
    for (idx, member) in members.iter().enumerate() {
        let distance = member.distance_to(center);
        if distance < closest.1 {
            closest = (idx, distance);
        }
    }
    closest.0
}

/// Most places wins with ties going to the earliest member; without any
/// places the first member wins.
fn pick_peripheral(members: &[Member<'_>], places: Option<&PlacesByRegion>) -> usize {
    let mut best = (0, 0);
    for (idx, member) in members.iter().enumerate() {
        let count = member.place_count(places);
        if count > best.1 {
            best = (idx, count);
        }
    }
    best.0
}

fn synthesize(group: &Group<'_>, representative: usize) -> Region {
    let rep = group.members[representative].region;
    let rep_name = rep.original_name();

    let name = if let [a, b] = group.members.as_slice() {
        let other = if representative == 0 { b } else { a };
        format!("{rep_name} & {}", other.region.original_name())
    } else {
        format!("{rep_name} (+{})", group.members.len() - 1)
    };

    let mut region = rep.clone();
    region.cluster = Some(ClusterInfo {
        original_name: rep_name.to_string(),
        member_names: group
            .members
            .iter()
            .map(|m| m.region.original_name().to_string())
            .collect(),
    });
    region.name = name;
    region
}

/// Clustering with the zoom gate and distance derived from configuration.
#[derive(Debug, Clone, Default)]
pub struct ClusterEngine {
    config: ClusterConfig,
}

impl ClusterEngine {
    /// Creates an engine with the given thresholds.
    #[must_use]
    pub const fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// The thresholds in use.
    #[must_use]
    pub const fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Whether the given latitude span is zoomed out enough to cluster.
    #[must_use]
    pub fn should_cluster(&self, latitude_span: f64) -> bool {
        self.config.should_cluster(latitude_span)
    }

    /// Clusters with an explicit distance threshold.
    #[must_use]
    pub fn cluster(
        &self,
        regions: &[Region],
        distance_threshold: f64,
        map_center: LatLng,
        places: Option<&PlacesByRegion>,
    ) -> Vec<Region> {
        cluster(regions, distance_threshold, map_center, places)
    }

    /// The regions to label for a viewport.
    ///
    /// Below the zoom threshold the input comes back unchanged with any
    /// cluster metadata removed; above it the regions are clustered with a
    /// distance proportional to the latitude span.
    #[must_use]
    pub fn regions_for_view(
        &self,
        regions: &[Region],
        viewport: &Viewport,
        places: Option<&PlacesByRegion>,
    ) -> Vec<Region> {
        if !self.should_cluster(viewport.latitude_span) {
            return regions
                .iter()
                .cloned()
                .map(|mut region| {
                    region.cluster = None;
                    region
                })
                .collect();
        }

        let distance = self.config.cluster_distance(viewport.latitude_span);
        cluster(regions, distance, viewport.center, places)
    }
}
