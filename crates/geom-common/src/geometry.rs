//! Planar geometry types returned by the extraction pipeline.
//!
//! A [`Ring`] is a closed ordered point sequence (first point equals last).
//! Outer boundaries wind counter-clockwise, holes clockwise, matching the
//! standard planar-geometry validity convention so consumers using even-odd
//! or winding-number fill rules get correct results.

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, Point};

/// A closed ordered sequence of points bounding a polygon or hole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Build a ring from a point sequence, closing it if necessary.
    ///
    /// The input must describe at least a triangle (3 distinct points).
    pub fn new(mut points: Vec<Point>) -> Self {
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        Self { points }
    }

    /// The closed point sequence (first point equals last).
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of distinct vertices (the closing point is not counted twice).
    pub fn vertex_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Check the first-equals-last closure invariant.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Signed area via the shoelace formula.
    ///
    /// Positive for counter-clockwise winding, negative for clockwise.
    pub fn signed_area(&self) -> f64 {
        let pts = &self.points;
        if pts.len() < 4 {
            return 0.0;
        }
        let mut sum = 0.0;
        for w in pts.windows(2) {
            sum += (w[1].x - w[0].x) * (w[1].y + w[0].y);
        }
        -sum / 2.0
    }

    /// Absolute enclosed area.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Whether the ring winds counter-clockwise.
    pub fn is_ccw(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding direction in place.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    /// Bounding box of the ring.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::of_points(&self.points).unwrap_or_else(BoundingBox::empty)
    }

    /// Point-in-ring test by ray casting.
    ///
    /// Points exactly on the boundary may report either side.
    pub fn contains_point(&self, p: &Point) -> bool {
        let pts = &self.points;
        let mut inside = false;
        for w in pts.windows(2) {
            let (a, b) = (w[0], w[1]);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// An interior-ish representative point (first vertex midpoint fallback).
    ///
    /// Used for containment-depth classification during assembly; the
    /// centroid of the vertices is adequate for the convex-ish rings
    /// marching squares produces, and callers fall back to a vertex when
    /// the centroid lands outside.
    pub fn vertex_centroid(&self) -> Point {
        let n = self.vertex_count().max(1);
        let (sx, sy) = self.points[..n]
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Point::new(sx / n as f64, sy / n as f64)
    }

    /// Consume the ring, returning its points.
    pub fn into_points(self) -> Vec<Point> {
        self.points
    }
}

/// One outer ring plus zero or more hole rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Create a polygon from an exterior ring with no holes.
    pub fn new(exterior: Ring) -> Self {
        Self {
            exterior,
            holes: Vec::new(),
        }
    }

    /// Net area (exterior minus holes).
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(Ring::area).sum();
        (self.exterior.area() - holes).max(0.0)
    }

    /// Whether a point is inside the exterior and outside every hole.
    pub fn contains_point(&self, p: &Point) -> bool {
        self.exterior.contains_point(p) && !self.holes.iter().any(|h| h.contains_point(p))
    }
}

/// The externally returned artifact: zero or more polygons.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    /// Total net area over all member polygons.
    pub fn area(&self) -> f64 {
        self.0.iter().map(Polygon::area).sum()
    }

    /// Whether there are no polygons.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over every ring (exteriors and holes).
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.0
            .iter()
            .flat_map(|p| std::iter::once(&p.exterior).chain(p.holes.iter()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square_ccw() -> Ring {
        Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn test_ring_closes_on_construction() {
        let ring = unit_square_ccw();
        assert!(ring.is_closed());
        assert_eq!(ring.vertex_count(), 4);
    }

    #[test]
    fn test_signed_area_winding() {
        let ccw = unit_square_ccw();
        assert!((ccw.signed_area() - 1.0).abs() < 1e-12);
        assert!(ccw.is_ccw());

        let mut cw = ccw.clone();
        cw.reverse();
        assert!((cw.signed_area() + 1.0).abs() < 1e-12);
        assert!(!cw.is_ccw());
    }

    #[test]
    fn test_contains_point() {
        let ring = unit_square_ccw();
        assert!(ring.contains_point(&Point::new(0.5, 0.5)));
        assert!(!ring.contains_point(&Point::new(1.5, 0.5)));
        assert!(!ring.contains_point(&Point::new(0.5, -0.5)));
    }

    #[test]
    fn test_polygon_with_hole_area() {
        let outer = unit_square_ccw();
        let mut hole = Ring::new(vec![
            Point::new(0.25, 0.25),
            Point::new(0.75, 0.25),
            Point::new(0.75, 0.75),
            Point::new(0.25, 0.75),
        ]);
        hole.reverse(); // holes wind clockwise

        let poly = Polygon {
            exterior: outer,
            holes: vec![hole],
        };
        assert!((poly.area() - 0.75).abs() < 1e-12);
        assert!(poly.contains_point(&Point::new(0.1, 0.1)));
        assert!(!poly.contains_point(&Point::new(0.5, 0.5)));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mp = MultiPolygon(vec![Polygon::new(unit_square_ccw())]);
        let json = serde_json::to_string(&mp).unwrap();
        let back: MultiPolygon = serde_json::from_str(&json).unwrap();
        assert_eq!(mp, back);
    }
}
