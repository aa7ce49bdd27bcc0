//! Antimeridian and pole normalization.
//!
//! Geographic rings may cross the ±180° seam (consecutive longitude deltas
//! over 180°) or encircle a pole (unwrapped longitudes winding a full
//! 360°). Both are re-expressed as simple bounded polygons: seam-crossing
//! rings are unwrapped onto a continuous longitude line, clipped to
//! successive 360°-wide strips, and each piece shifted back into
//! [-180, 180]; pole rings are first closed along the seam up to the pole
//! latitude. Projected reference systems do not wrap, so for them this
//! stage returns its input unchanged.

use geom_common::{CrsCode, MultiPolygon, Point, Polygon, Ring};

/// Normalize a geometry for the given reference system.
///
/// No-op (input returned unchanged) when the CRS does not wrap, and
/// idempotent: already-normalized output passes through untouched.
pub fn normalize(geometry: MultiPolygon, crs: CrsCode) -> MultiPolygon {
    if !crs.wraps() {
        return geometry;
    }

    let mut out = Vec::new();
    for polygon in geometry.0 {
        if polygon_is_normalized(&polygon) {
            out.push(polygon);
            continue;
        }
        out.extend(split_polygon(polygon));
    }
    MultiPolygon(out)
}

/// Whether every ring stays inside [-180, 180] without seam jumps.
fn polygon_is_normalized(polygon: &Polygon) -> bool {
    std::iter::once(&polygon.exterior)
        .chain(polygon.holes.iter())
        .all(|ring| ring_is_normalized(ring))
}

fn ring_is_normalized(ring: &Ring) -> bool {
    let pts = ring.points();
    pts.iter().all(|p| (-180.0..=180.0).contains(&p.x))
        && pts.windows(2).all(|w| (w[1].x - w[0].x).abs() <= 180.0)
}

/// Split one polygon into per-strip pieces, re-attaching hole pieces to
/// the exterior piece that contains them.
fn split_polygon(polygon: Polygon) -> Vec<Polygon> {
    let exterior_pieces = split_ring(&polygon.exterior);
    let mut out: Vec<Polygon> = exterior_pieces.into_iter().map(Polygon::new).collect();

    for hole in &polygon.holes {
        for mut piece in split_ring(hole) {
            let rep = piece.vertex_centroid();
            if let Some(parent) = out.iter_mut().find(|p| p.exterior.contains_point(&rep)) {
                if piece.is_ccw() {
                    piece.reverse();
                }
                parent.holes.push(piece);
            }
            // A hole piece outside every exterior piece cancels nothing;
            // it is dropped
        }
    }

    out
}

/// Unwrap, pole-close if needed, clip to 360°-wide strips, and shift each
/// piece back into [-180, 180].
fn split_ring(ring: &Ring) -> Vec<Ring> {
    let unwrapped = unwrap_ring(ring);
    if unwrapped.len() < 3 {
        return Vec::new();
    }

    let closed = close_ring(unwrapped);

    let (mut lmin, mut lmax) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in &closed {
        lmin = lmin.min(p.x);
        lmax = lmax.max(p.x);
    }

    // Zero-width pieces from a ring exactly touching a strip edge are
    // discarded by the area check below
    let strip_of = |lon: f64| ((lon + 180.0) / 360.0).floor() as i64;
    let k_min = strip_of(lmin);
    let k_max = strip_of(lmax).max(k_min);

    let mut pieces = Vec::new();
    for k in k_min..=k_max {
        let left = -180.0 + 360.0 * k as f64;
        let right = left + 360.0;

        let clipped = clip_half_plane(&closed, |p| p.x >= left, left);
        let clipped = clip_half_plane(&clipped, |p| p.x <= right, right);
        if clipped.len() < 3 {
            continue;
        }

        let shift = -360.0 * k as f64;
        let shifted: Vec<Point> = clipped
            .into_iter()
            .map(|p| Point::new(p.x + shift, p.y))
            .collect();

        let piece = Ring::new(shifted);
        if piece.vertex_count() >= 3 && piece.area() > 1e-12 {
            pieces.push(piece);
        }
    }

    pieces
}

/// Adjust each longitude by a multiple of 360° so consecutive deltas stay
/// within ±180°, returning the open vertex list.
fn unwrap_ring(ring: &Ring) -> Vec<Point> {
    let n = ring.vertex_count();
    let pts = &ring.points()[..n];
    let mut out: Vec<Point> = Vec::with_capacity(n + 4);
    if pts.is_empty() {
        return out;
    }

    out.push(pts[0]);
    let mut prev_lon = pts[0].x;
    for p in &pts[1..] {
        let mut lon = p.x;
        while lon - prev_lon > 180.0 {
            lon -= 360.0;
        }
        while lon - prev_lon < -180.0 {
            lon += 360.0;
        }
        prev_lon = lon;
        out.push(Point::new(lon, p.y));
    }
    out
}

/// Close an unwrapped ring. A winding of ±360° means the ring encircles a
/// pole; such rings are closed along the seam up to the pole latitude so
/// they bound a finite region.
fn close_ring(mut pts: Vec<Point>) -> Vec<Point> {
    let first = pts[0];
    let last = *pts.last().unwrap();

    // Longitude drift of the implicit closing edge
    let mut closure_lon = first.x;
    while closure_lon - last.x > 180.0 {
        closure_lon -= 360.0;
    }
    while closure_lon - last.x < -180.0 {
        closure_lon += 360.0;
    }
    let winding = ((closure_lon - first.x) / 360.0).round() as i64;

    if winding == 0 {
        pts.push(first);
        return pts;
    }

    // Pole ring: pick the enclosed pole from the mean latitude
    let mean_lat: f64 = pts.iter().map(|p| p.y).sum::<f64>() / pts.len() as f64;
    let pole_lat = if mean_lat >= 0.0 { 90.0 } else { -90.0 };

    pts.push(Point::new(closure_lon, first.y));
    pts.push(Point::new(closure_lon, pole_lat));
    pts.push(Point::new(first.x, pole_lat));
    pts.push(first);
    pts
}

/// Sutherland-Hodgman clip against one vertical line.
fn clip_half_plane(pts: &[Point], inside: impl Fn(&Point) -> bool, line_x: f64) -> Vec<Point> {
    if pts.is_empty() {
        return Vec::new();
    }

    let intersect = |a: &Point, b: &Point| -> Point {
        let t = (line_x - a.x) / (b.x - a.x);
        Point::new(line_x, a.y + t * (b.y - a.y))
    };

    let mut out = Vec::with_capacity(pts.len() + 4);
    for w in pts.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        match (inside(a), inside(b)) {
            (true, true) => out.push(*b),
            (true, false) => out.push(intersect(a, b)),
            (false, true) => {
                out.push(intersect(a, b));
                out.push(*b);
            }
            (false, false) => {}
        }
    }
    if let Some(&first) = out.first() {
        if out.last() != Some(&first) {
            out.push(first);
        }
    }
    out
}
