//! Ring conversion from `GeoJSON` axis order to renderer points.

use nabe_map_neighborhood_models::{LatLng, Position, Region};

/// Re-expresses a `[lng, lat]` ring as [`LatLng`] points.
///
/// Order and closure are preserved exactly; nothing is deduplicated.
#[must_use]
pub fn ring_to_lat_lng(ring: &[Position]) -> Vec<LatLng> {
    ring.iter().map(|&[lng, lat]| LatLng::new(lat, lng)).collect()
}

/// Every ring of every polygon of a region, ready to draw.
#[must_use]
pub fn drawable_rings(region: &Region) -> Vec<Vec<LatLng>> {
    region
        .geometry
        .iter()
        .flatten()
        .map(|ring| ring_to_lat_lng(ring))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swaps_axes_and_keeps_order() {
        let ring = [[-73.9, 40.7], [-73.8, 40.8], [-73.7, 40.6]];
        let points = ring_to_lat_lng(&ring);
        assert_eq!(
            points,
            vec![
                LatLng::new(40.7, -73.9),
                LatLng::new(40.8, -73.8),
                LatLng::new(40.6, -73.7),
            ]
        );
    }

    #[test]
    fn keeps_closing_point() {
        let ring = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]];
        let points = ring_to_lat_lng(&ring);
        assert_eq!(points.len(), 4);
        assert_eq!(points.first(), points.last());
    }

    #[test]
    fn empty_ring_is_empty() {
        assert!(ring_to_lat_lng(&[]).is_empty());
    }

    #[test]
    fn flattens_all_rings_of_all_polygons() {
        let region = Region::new(
            "Red Hook",
            "Brooklyn",
            vec![
                vec![
                    vec![[0.0, 0.0], [4.0, 0.0], [0.0, 4.0]],
                    vec![[1.0, 1.0], [2.0, 1.0], [1.0, 2.0]],
                ],
                vec![vec![[10.0, 10.0], [11.0, 10.0], [10.0, 11.0]]],
            ],
        );
        let rings = drawable_rings(&region);
        assert_eq!(rings.len(), 3);
        assert_eq!(rings[2][0], LatLng::new(10.0, 10.0));
    }
}
