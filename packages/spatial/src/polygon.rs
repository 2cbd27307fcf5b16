//! Dominant-polygon selection and area-weighted centroids.
//!
//! Rings may arrive closed (last vertex repeats the first) or open. Both
//! forms produce identical results because the closing vertex is dropped
//! before any sum is taken.

use nabe_map_neighborhood_models::{LatLng, Polygon, Position, Region};

/// Below this absolute signed area a ring is treated as degenerate.
const DEGENERATE_AREA: f64 = 1e-10;

/// Drops a trailing vertex that exactly repeats the first one.
fn open_ring(ring: &[Position]) -> &[Position] {
    match ring {
        [first, .., last] if first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// Cross products `x_i * y_{i+1} - x_{i+1} * y_i` around an open ring.
///
/// Vertices are taken relative to the first one, which leaves area and
/// centroid unchanged but keeps the products small for rings far from
/// `(0, 0)`.
fn cross_terms(ring: &[Position]) -> impl Iterator<Item = (Position, Position, f64)> + '_ {
    let n = ring.len();
    let origin = ring.first().copied().unwrap_or_default();
    let shift = move |p: Position| [p[0] - origin[0], p[1] - origin[1]];
    (0..n).map(move |i| {
        let a = shift(ring[i]);
        let b = shift(ring[(i + 1) % n]);
        (a, b, a[0].mul_add(b[1], -(b[0] * a[1])))
    })
}

/// Unsigned shoelace area of a ring, in squared degrees.
#[must_use]
pub fn ring_area(ring: &[Position]) -> f64 {
    let ring = open_ring(ring);
    cross_terms(ring).map(|(_, _, cross)| cross).sum::<f64>().abs() / 2.0
}

fn outer_ring_area(polygon: &Polygon) -> f64 {
    polygon.first().map_or(0.0, |ring| ring_area(ring))
}

/// Picks the polygon whose outer ring has the greatest area.
///
/// A single polygon is returned as-is without measuring it. Ties keep
/// the first polygon seen. Returns `None` only for an empty geometry.
#[must_use]
pub fn largest_polygon(geometry: &[Polygon]) -> Option<&Polygon> {
    if let [only] = geometry {
        return Some(only);
    }

    let mut best: Option<(&Polygon, f64)> = None;
    for polygon in geometry {
        let area = outer_ring_area(polygon);
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((polygon, area)),
        }
    }
    best.map(|(polygon, _)| polygon)
}

/// Area-weighted centroid of a polygon's outer ring.
///
/// Zero-area rings (collinear or repeated points) fall back to the plain
/// mean of their vertices. Returns `None` when the polygon has no outer
/// ring or the ring has no vertices.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(polygon: &Polygon) -> Option<LatLng> {
    let ring = open_ring(polygon.first()?);
    if ring.is_empty() {
        return None;
    }

    let mut twice_area = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (a, b, cross) in cross_terms(ring) {
        twice_area += cross;
        cx += (a[0] + b[0]) * cross;
        cy += (a[1] + b[1]) * cross;
    }
    let area = twice_area / 2.0;

    if area.abs() < DEGENERATE_AREA {
        let n = ring.len() as f64;
        let (sum_x, sum_y) = ring
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
        return Some(LatLng::new(sum_y / n, sum_x / n));
    }

    let [ox, oy] = ring[0];
    Some(LatLng::new(oy + cy / (6.0 * area), ox + cx / (6.0 * area)))
}

/// Centroid of a region's dominant polygon.
#[must_use]
pub fn region_centroid(region: &Region) -> Option<LatLng> {
    largest_polygon(&region.geometry).and_then(centroid)
}
