//! Common types shared across the grid-geom workspace.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod geometry;
pub mod level;
pub mod point;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{GeomError, GeomResult};
pub use geometry::{MultiPolygon, Polygon, Ring};
pub use level::Level;
pub use point::Point;
