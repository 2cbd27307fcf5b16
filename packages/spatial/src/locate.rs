//! Point-in-polygon tests and coordinate-to-region resolution.

use nabe_map_neighborhood_models::{LatLng, Position, Region};

/// Crossing-number test of a point against a ring.
///
/// Points exactly on an edge may land on either side depending on the
/// edge's orientation.
#[must_use]
pub fn contains_point(point: LatLng, ring: &[Position]) -> bool {
    let (x, y) = (point.longitude, point.latitude);
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether any outer ring of the region contains the point.
#[must_use]
pub fn region_contains(region: &Region, point: LatLng) -> bool {
    region.outer_rings().any(|ring| contains_point(point, ring))
}

/// The first region, in input order, whose boundary contains the point.
///
/// Overlapping boundaries resolve to whichever region comes first.
#[must_use]
pub fn region_for(point: LatLng, regions: &[Region]) -> Option<&Region> {
    regions.iter().find(|region| region_contains(region, point))
}
