//! Fragment stitching and ring validity.
//!
//! Takes the unordered set of directed fragments for one level and chains
//! them into closed rings by matching shared endpoints within a tolerance
//! derived from grid cell size. The endpoint index is an adjacency map
//! keyed by quantized coordinates (tolerance buckets), so matching never
//! degenerates into an open-ended graph search.

use std::collections::HashMap;

use geom_common::{GeomError, GeomResult, MultiPolygon, Point, Polygon, Ring};

use crate::march::Fragment;

/// Quantized coordinate key for endpoint bucketing.
fn bucket(p: &Point, tol: f64) -> (i64, i64) {
    ((p.x / tol).round() as i64, (p.y / tol).round() as i64)
}

/// Stitch fragments into valid polygons.
///
/// `level_key` only labels the `UnclosableRing` error payload.
pub(crate) fn assemble(
    fragments: Vec<Fragment>,
    tolerance: f64,
    level_key: f64,
) -> GeomResult<MultiPolygon> {
    let fragments: Vec<Fragment> = fragments
        .into_iter()
        .filter(|f| f.start.distance(&f.end) > tolerance * 0.5)
        .collect();

    if fragments.is_empty() {
        return Ok(MultiPolygon::default());
    }

    // start-point bucket -> fragment indices
    let mut by_start: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (idx, f) in fragments.iter().enumerate() {
        by_start.entry(bucket(&f.start, tolerance)).or_default().push(idx);
    }

    let find_next = |p: &Point, used: &[bool]| -> Option<usize> {
        let (bx, by) = bucket(p, tolerance);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(candidates) = by_start.get(&(bx + dx, by + dy)) {
                    for &idx in candidates {
                        if !used[idx] && fragments[idx].start.distance(p) <= tolerance {
                            return Some(idx);
                        }
                    }
                }
            }
        }
        None
    };

    let mut used = vec![false; fragments.len()];
    let mut rings: Vec<Ring> = Vec::new();

    for start_idx in 0..fragments.len() {
        if used[start_idx] {
            continue;
        }
        used[start_idx] = true;

        let origin = fragments[start_idx].start;
        let mut points = vec![origin, fragments[start_idx].end];

        loop {
            let tail = *points.last().unwrap();
            if tail.distance(&origin) <= tolerance && points.len() > 2 {
                break;
            }
            match find_next(&tail, &used) {
                Some(next) => {
                    used[next] = true;
                    points.push(fragments[next].end);
                }
                None => {
                    return Err(GeomError::UnclosableRing {
                        level: level_key,
                        x: tail.x,
                        y: tail.y,
                    });
                }
            }
        }

        dedupe(&mut points, tolerance);
        for ring in split_self_touches(points, tolerance) {
            if ring.vertex_count() >= 3 && ring.area() > tolerance * tolerance {
                rings.push(ring);
            }
        }
    }

    Ok(build_polygons(rings))
}

/// Remove consecutive near-duplicate points (and a near-duplicate closure).
fn dedupe(points: &mut Vec<Point>, tol: f64) {
    points.dedup_by(|b, a| a.distance(b) <= tol * 0.5);
    if points.len() > 1 {
        let first = points[0];
        if points.last().unwrap().distance(&first) <= tol * 0.5 {
            points.pop();
        }
    }
}

/// Split a closed point loop at self-touching vertices.
///
/// A vertex revisited at a non-adjacent position pinches the loop into two
/// rings; each piece is split recursively.
fn split_self_touches(points: Vec<Point>, tol: f64) -> Vec<Ring> {
    let mut queue = vec![points];
    let mut out = Vec::new();

    while let Some(pts) = queue.pop() {
        let mut seen: HashMap<(i64, i64), usize> = HashMap::new();
        let mut touch: Option<(usize, usize)> = None;

        for (k, p) in pts.iter().enumerate() {
            let key = bucket(p, tol);
            if let Some(&m) = seen.get(&key) {
                if k - m >= 2 && !(m == 0 && k == pts.len() - 1) {
                    touch = Some((m, k));
                    break;
                }
            }
            seen.insert(key, k);
        }

        match touch {
            Some((m, k)) => {
                let inner: Vec<Point> = pts[m..k].to_vec();
                let mut outer: Vec<Point> = pts[..m].to_vec();
                outer.extend_from_slice(&pts[k..]);
                if inner.len() >= 3 {
                    queue.push(inner);
                }
                if outer.len() >= 3 {
                    queue.push(outer);
                }
            }
            None => out.push(Ring::new(pts)),
        }
    }

    out
}

/// A point safely interior to the ring, for containment classification.
fn interior_point(ring: &Ring) -> Point {
    let centroid = ring.vertex_centroid();
    if ring.contains_point(&centroid) {
        return centroid;
    }
    // Concave ring whose centroid fell outside: probe midpoints between
    // the centroid and each vertex
    for v in ring.points() {
        let probe = Point::new((centroid.x + v.x) / 2.0, (centroid.y + v.y) / 2.0);
        if ring.contains_point(&probe) {
            return probe;
        }
    }
    ring.points()[0]
}

/// Resolve ring nesting and enforce the winding convention: exteriors
/// counter-clockwise, holes clockwise, holes attached to the smallest
/// containing exterior.
fn build_polygons(mut rings: Vec<Ring>) -> MultiPolygon {
    if rings.is_empty() {
        return MultiPolygon::default();
    }

    let reps: Vec<Point> = rings.iter().map(interior_point).collect();
    let depths: Vec<usize> = reps
        .iter()
        .enumerate()
        .map(|(idx, rep)| {
            rings
                .iter()
                .enumerate()
                .filter(|(other, r)| *other != idx && r.contains_point(rep))
                .count()
        })
        .collect();

    for (ring, &depth) in rings.iter_mut().zip(&depths) {
        let want_ccw = depth % 2 == 0;
        if ring.is_ccw() != want_ccw {
            ring.reverse();
        }
    }

    let mut polygons: Vec<(usize, Polygon)> = Vec::new();
    for (idx, ring) in rings.iter().enumerate() {
        if depths[idx] % 2 == 0 {
            polygons.push((idx, Polygon::new(ring.clone())));
        }
    }

    for (idx, ring) in rings.iter().enumerate() {
        if depths[idx] % 2 == 0 {
            continue;
        }
        let rep = reps[idx];
        // Smallest exterior containing the hole is its immediate parent
        let parent = polygons
            .iter_mut()
            .filter(|(pidx, _)| rings[*pidx].contains_point(&rep))
            .min_by(|(a, _), (b, _)| {
                rings[*a]
                    .area()
                    .partial_cmp(&rings[*b].area())
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        match parent {
            Some((_, poly)) => poly.holes.push(ring.clone()),
            // Orphan hole: surface it as its own polygon rather than drop it
            None => {
                let mut r = ring.clone();
                r.reverse();
                polygons.push((idx, Polygon::new(r)));
            }
        }
    }

    MultiPolygon(polygons.into_iter().map(|(_, p)| p).collect())
}
