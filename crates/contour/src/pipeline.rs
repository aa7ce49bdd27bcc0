//! End-to-end extraction pipeline.
//!
//! For each requested level the stages run in order: marching-squares
//! fragment extraction, ring assembly, coordinate transformation into the
//! target reference system, and antimeridian/pole normalization when the
//! target wraps. Levels are independent and run in parallel.

use geom_common::{CrsCode, GeomError, GeomResult, Level, MultiPolygon, Point, Polygon, Ring};
use projection::transform_points;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::assemble::assemble;
use crate::grid::Grid;
use crate::march::extract_fragments;
use crate::normalize::normalize;

/// Endpoint-matching tolerance as a fraction of the mean cell diagonal.
const TOLERANCE_FACTOR: f64 = 1e-6;

/// The geometry extracted for one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelGeometry {
    pub level: Level,
    pub geometry: MultiPolygon,
}

/// Extract region geometry for every level of a grid.
///
/// Coordinates in the result are expressed in `target`; the grid's own
/// coordinates are interpreted in `source`. A level whose region is empty
/// yields an empty geometry; if every level comes back empty the call
/// fails with [`GeomError::EmptyLevelSet`], the one non-fatal error in
/// the taxonomy, so callers can distinguish "nothing here" from a level
/// list that simply missed the data range.
pub fn extract(
    grid: &Grid,
    levels: &[Level],
    source: CrsCode,
    target: CrsCode,
) -> GeomResult<Vec<LevelGeometry>> {
    let tolerance = TOLERANCE_FACTOR * grid.mean_cell_diagonal();
    let (data_min, data_max) = grid.value_range().unwrap_or((f64::NAN, f64::NAN));

    tracing::debug!(
        nx = grid.nx(),
        ny = grid.ny(),
        num_levels = levels.len(),
        data_min = data_min,
        data_max = data_max,
        tolerance = tolerance,
        "extract input"
    );

    let per_level: Vec<LevelGeometry> = levels
        .par_iter()
        .map(|level| {
            let fragments = extract_fragments(grid, level);
            let geometry = assemble(fragments, tolerance, level.key())?;
            Ok(LevelGeometry {
                level: *level,
                geometry,
            })
        })
        .collect::<GeomResult<_>>()?;

    if per_level.iter().all(|lg| lg.geometry.is_empty()) {
        return Err(GeomError::EmptyLevelSet);
    }

    tracing::debug!(
        num_polygons = per_level.iter().map(|lg| lg.geometry.0.len()).sum::<usize>(),
        total_rings = per_level.iter().map(|lg| lg.geometry.rings().count()).sum::<usize>(),
        "assembled rings"
    );

    let mut out = Vec::with_capacity(per_level.len());
    for lg in per_level {
        let projected = transform_geometry(lg.geometry, source, target)?;
        let geometry = normalize(projected, target);
        out.push(LevelGeometry {
            level: lg.level,
            geometry,
        });
    }

    Ok(out)
}

/// Reproject every ring of a geometry, keeping polygon structure.
///
/// The whole geometry transforms or none of it does; a single point
/// outside the target projection's domain fails the level.
fn transform_geometry(
    geometry: MultiPolygon,
    source: CrsCode,
    target: CrsCode,
) -> GeomResult<MultiPolygon> {
    if source == target {
        return Ok(geometry);
    }

    let mut polygons = Vec::with_capacity(geometry.0.len());
    for polygon in geometry.0 {
        let exterior = transform_ring(&polygon.exterior, source, target)?;
        let mut holes = Vec::with_capacity(polygon.holes.len());
        for hole in &polygon.holes {
            holes.push(transform_ring(hole, source, target)?);
        }
        polygons.push(Polygon { exterior, holes });
    }
    Ok(MultiPolygon(polygons))
}

fn transform_ring(ring: &Ring, source: CrsCode, target: CrsCode) -> GeomResult<Ring> {
    let points: Vec<Point> = transform_points(source, target, ring.points())?;
    Ok(Ring::new(points))
}
