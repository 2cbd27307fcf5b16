//! R-tree accelerated region lookup.
//!
//! Builds one entry per outer ring, keyed by the ring's bounding box, so
//! that a lookup only runs the crossing-number test against rings whose
//! envelope covers the point. Among matches, the region with the lowest
//! input index wins, which keeps results identical to
//! [`region_for`](crate::locate::region_for).

use geo::{BoundingRect, LineString};
use nabe_map_neighborhood_models::{LatLng, Position, Region};
use rstar::{AABB, RTree, RTreeObject};

use crate::locate::contains_point;

/// An outer ring stored in the R-tree.
struct RingEntry {
    region: usize,
    polygon: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for RingEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Owned region list plus a spatial index over its outer rings.
pub struct RegionIndex {
    regions: Vec<Region>,
    tree: RTree<RingEntry>,
}

impl RegionIndex {
    /// Indexes the given regions. Input order is kept for tie-breaking.
    #[must_use]
    pub fn new(regions: Vec<Region>) -> Self {
        let mut entries = Vec::new();

        for (region_idx, region) in regions.iter().enumerate() {
            for (polygon_idx, polygon) in region.geometry.iter().enumerate() {
                let Some(ring) = polygon.first() else {
                    continue;
                };
                let Some(envelope) = compute_envelope(ring) else {
                    log::warn!(
                        "Skipping empty ring {polygon_idx} of region {}",
                        region.name
                    );
                    continue;
                };
                entries.push(RingEntry {
                    region: region_idx,
                    polygon: polygon_idx,
                    envelope,
                });
            }
        }

        log::debug!(
            "Indexed {} outer rings across {} regions",
            entries.len(),
            regions.len()
        );

        Self {
            regions,
            tree: RTree::bulk_load(entries),
        }
    }

    /// The indexed regions in their original order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Resolves a point to the first region (in input order) containing it.
    #[must_use]
    pub fn locate(&self, point: LatLng) -> Option<&Region> {
        let query = AABB::from_point([point.longitude, point.latitude]);

        self.tree
            .locate_in_envelope_intersecting(&query)
            .filter(|entry| {
                let ring = &self.regions[entry.region].geometry[entry.polygon][0];
                contains_point(point, ring)
            })
            .map(|entry| entry.region)
            .min()
            .map(|idx| &self.regions[idx])
    }
}

/// Bounding box of a ring, `None` for an empty ring.
fn compute_envelope(ring: &[Position]) -> Option<AABB<[f64; 2]>> {
    let line: LineString<f64> = ring.iter().map(|&[x, y]| (x, y)).collect();
    line.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
