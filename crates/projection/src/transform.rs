//! The transform contract and vectorized point transformation.

use geom_common::{CrsCode, GeomResult, Point};

use crate::{Geographic, PolarStereographic, WebMercator};

/// A map projection between geographic and planar coordinates.
///
/// Implementations are immutable once constructed and safely shared
/// read-only across threads. Both directions are deterministic and
/// side-effect-free.
pub trait Projection: Send + Sync + std::fmt::Debug {
    /// Project geographic (lon, lat) degrees to planar (x, y).
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> GeomResult<(f64, f64)>;

    /// Unproject planar (x, y) back to geographic (lon, lat) degrees.
    fn inverse(&self, x: f64, y: f64) -> GeomResult<(f64, f64)>;
}

/// Resolve a CRS code to its transform definition.
pub fn resolve(code: CrsCode) -> Box<dyn Projection> {
    match code {
        CrsCode::Epsg4326 => Box::new(Geographic),
        CrsCode::Epsg3857 => Box::new(WebMercator),
        CrsCode::Epsg3413 => Box::new(PolarStereographic::north()),
        CrsCode::Epsg3031 => Box::new(PolarStereographic::south()),
    }
}

/// Resolve a CRS identifier string to its transform definition.
///
/// Fails with `InvalidReferenceSystem` for unknown identifiers.
pub fn resolve_str(s: &str) -> GeomResult<Box<dyn Projection>> {
    Ok(resolve(CrsCode::parse(s)?))
}

/// Transform a batch of points from a source to a target reference system.
///
/// Order-preserving and batch-atomic: every point goes through the same
/// pair of transform definitions, resolved once for the whole batch. Any
/// point outside the transform domain fails the whole call.
pub fn transform_points(src: CrsCode, dst: CrsCode, points: &[Point]) -> GeomResult<Vec<Point>> {
    if src == dst {
        return Ok(points.to_vec());
    }

    let src_proj = resolve(src);
    let dst_proj = resolve(dst);

    let mut out = Vec::with_capacity(points.len());
    for p in points {
        let (lon, lat) = src_proj.inverse(p.x, p.y)?;
        let (x, y) = dst_proj.forward(lon, lat)?;
        out.push(Point::new(x, y));
    }
    Ok(out)
}
