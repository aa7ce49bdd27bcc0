//! Grid-to-geometry extraction.
//!
//! Turns scalar grids into valid polygon geometry:
//! - Marching-squares region extraction for thresholds and bands
//! - Fragment stitching into closed, correctly wound rings
//! - Reprojection of results into a target reference system
//! - Antimeridian and pole normalization for geographic output
//! - Field statistics and regression utilities

pub mod grid;
pub mod normalize;
pub mod pipeline;
pub mod stats;

mod assemble;
mod march;

pub use grid::{Grid, GridCoords};
pub use normalize::normalize;
pub use pipeline::{extract, LevelGeometry};
