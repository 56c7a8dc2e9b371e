//! Footprint and polygon geometry helpers.
//!
//! All geometry is planar, in project meters. Asset footprints are oriented
//! rectangles built from a center position, dimensions, and a rotation about
//! the center. Polygon set operations (union, intersection, difference) come
//! from the `geo` crate; the inward offset used for setbacks is a mitered
//! edge-strip subtraction, exact for right-angle corners.

use geo::{coord, Area, BooleanOps, BoundingRect, Coord, LineString, MultiPolygon, Polygon};

/// Area below which a boolean-op result is considered empty.
///
/// Filters out slivers produced by floating-point clipping.
pub const AREA_EPS: f64 = 1e-9;

/// Builds an oriented rectangle centered on `(cx, cy)`.
///
/// `width` runs along the local x axis and `length` along the local y axis
/// before the counter-clockwise rotation (degrees) is applied about the
/// center.
pub fn oriented_rect(cx: f64, cy: f64, width: f64, length: f64, rotation_deg: f64) -> Polygon {
    expanded_rect(cx, cy, width, length, rotation_deg, 0.0)
}

/// Builds an oriented rectangle expanded by `buffer` on every side.
///
/// A mitered (square-corner) buffer: each half-dimension grows by `buffer`
/// before rotation. Exact for the rectangular footprints this engine uses;
/// round-join buffering is deliberately out of scope.
pub fn expanded_rect(
    cx: f64,
    cy: f64,
    width: f64,
    length: f64,
    rotation_deg: f64,
    buffer: f64,
) -> Polygon {
    let hw = width / 2.0 + buffer;
    let hl = length / 2.0 + buffer;
    let rot = rotation_deg.to_radians();
    let (sin_r, cos_r) = rot.sin_cos();

    const SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let corners: Vec<Coord> = SIGNS
        .iter()
        .map(|&(sx, sy)| {
            let lx = sx * hw;
            let ly = sy * hl;
            coord! {
                x: cx + lx * cos_r - ly * sin_r,
                y: cy + lx * sin_r + ly * cos_r,
            }
        })
        .collect();

    Polygon::new(LineString::from(corners), vec![])
}

/// Returns a polygon with no area (the canonical "empty" result).
pub fn empty_polygon() -> Polygon {
    Polygon::new(LineString::new(vec![]), vec![])
}

/// True when the polygon has no meaningful area.
pub fn polygon_is_empty(poly: &Polygon) -> bool {
    poly.exterior().0.len() < 4 || poly.unsigned_area() < AREA_EPS
}

/// Wraps a single polygon as a multi-polygon for boolean operations.
pub fn to_multi(poly: &Polygon) -> MultiPolygon {
    MultiPolygon::new(vec![poly.clone()])
}

/// Unions a slice of polygons into one multi-polygon.
///
/// Returns an empty multi-polygon for an empty slice.
pub fn union_all(polys: &[Polygon]) -> MultiPolygon {
    let mut iter = polys.iter();
    let first = match iter.next() {
        Some(p) => to_multi(p),
        None => MultiPolygon::new(vec![]),
    };
    iter.fold(first, |acc, p| acc.union(&to_multi(p)))
}

/// Area of the overlap between two polygons.
pub fn overlap_area(a: &Polygon, b: &Polygon) -> f64 {
    if polygon_is_empty(a) || polygon_is_empty(b) {
        return 0.0;
    }
    to_multi(a).intersection(&to_multi(b)).unsigned_area()
}

/// True polygon intersection test with positive overlap area.
///
/// Polygons that merely touch along an edge or at a corner do not overlap.
pub fn polygons_overlap(a: &Polygon, b: &Polygon) -> bool {
    overlap_area(a, b) > AREA_EPS
}

/// Diagonal length of the polygon's axis-aligned bounding box.
///
/// Used as the normalizer for the solution diversity metric.
pub fn bbox_diagonal(poly: &Polygon) -> f64 {
    match poly.bounding_rect() {
        Some(rect) => {
            let dx = rect.max().x - rect.min().x;
            let dy = rect.max().y - rect.min().y;
            (dx * dx + dy * dy).sqrt()
        }
        None => 0.0,
    }
}

/// Shrinks a polygon inward by `distance` with mitered corners.
///
/// Subtracts, for every exterior edge, a strip of width `2·distance`
/// centered on the edge and extended `distance` beyond both endpoints.
/// Exact for convex polygons with right-angle corners (the common parcel
/// case); a mitered approximation elsewhere. Returns an empty multi-polygon
/// when the offset collapses the boundary.
pub fn offset_inward(poly: &Polygon, distance: f64) -> MultiPolygon {
    if distance <= 0.0 || polygon_is_empty(poly) {
        return to_multi(poly);
    }

    let mut result = to_multi(poly);
    for line in poly.exterior().lines() {
        let strip = match edge_strip(line.start, line.end, distance) {
            Some(s) => s,
            None => continue, // degenerate zero-length edge
        };
        result = result.difference(&to_multi(&strip));
        if result.unsigned_area() < AREA_EPS {
            return MultiPolygon::new(vec![]);
        }
    }
    result
}

/// Rectangle of width `2d` centered on the segment `a → b`, extended `d`
/// lengthwise beyond both endpoints so adjacent strips cover the corners.
fn edge_strip(a: Coord, b: Coord, d: f64) -> Option<Polygon> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len < f64::EPSILON {
        return None;
    }
    let ux = dx / len;
    let uy = dy / len;
    // Inward/outward normal does not matter: the strip is symmetric.
    let nx = -uy;
    let ny = ux;

    let ax = a.x - ux * d;
    let ay = a.y - uy * d;
    let bx = b.x + ux * d;
    let by = b.y + uy * d;

    Some(Polygon::new(
        LineString::from(vec![
            coord! { x: ax + nx * d, y: ay + ny * d },
            coord! { x: bx + nx * d, y: by + ny * d },
            coord! { x: bx - nx * d, y: by - ny * d },
            coord! { x: ax - nx * d, y: ay - ny * d },
        ]),
        vec![],
    ))
}

/// Builds an axis-aligned rectangular polygon from corner coordinates.
///
/// Convenience for tests and boundary construction.
pub fn rect_polygon(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Polygon {
    Polygon::new(
        LineString::from(vec![
            coord! { x: min_x, y: min_y },
            coord! { x: max_x, y: min_y },
            coord! { x: max_x, y: max_y },
            coord! { x: min_x, y: max_y },
        ]),
        vec![],
    )
}
