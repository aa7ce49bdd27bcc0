//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::Point;

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326), coordinates are in degrees.
/// For projected CRS (EPSG:3857, etc.), coordinates are in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// An empty bounding box that expands from nothing.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Grow the box to include a point.
    pub fn expand_to(&mut self, p: &Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Bounding box of a point sequence, or `None` for an empty slice.
    pub fn of_points(points: &[Point]) -> Option<BoundingBox> {
        if points.is_empty() {
            return None;
        }
        let mut bbox = BoundingBox::empty();
        for p in points {
            bbox.expand_to(p);
        }
        Some(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains_point(5.0, 5.0));
        assert!(bbox.contains_point(0.0, 10.0));
        assert!(!bbox.contains_point(-0.1, 5.0));
        assert!(!bbox.contains_point(5.0, 10.1));
    }

    #[test]
    fn test_expand_to() {
        let mut bbox = BoundingBox::empty();
        bbox.expand_to(&Point::new(1.0, 2.0));
        bbox.expand_to(&Point::new(-3.0, 5.0));

        assert_eq!(bbox.min_x, -3.0);
        assert_eq!(bbox.max_x, 1.0);
        assert_eq!(bbox.min_y, 2.0);
        assert_eq!(bbox.max_y, 5.0);
    }

    #[test]
    fn test_of_points() {
        assert!(BoundingBox::of_points(&[]).is_none());
        let bbox = BoundingBox::of_points(&[Point::new(0.0, 0.0), Point::new(2.0, 3.0)]).unwrap();
        assert_eq!(bbox.width(), 2.0);
        assert_eq!(bbox.height(), 3.0);
    }
}
