//! Geographic (plate carrée) "projection": lon/lat degrees pass through.

use geom_common::{GeomError, GeomResult};

use crate::normalize_lon;
use crate::transform::Projection;

/// WGS84 geographic coordinates (EPSG:4326).
///
/// Forward and inverse are the identity apart from longitude normalization
/// into [-180, 180) and latitude domain checking.
#[derive(Debug, Clone, Copy, Default)]
pub struct Geographic;

impl Geographic {
    fn check_lat(lon: f64, lat: f64) -> GeomResult<()> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeomError::transform_domain(lon, lat, "non-finite coordinate"));
        }
        if lat.abs() > 90.0 {
            return Err(GeomError::transform_domain(
                lon,
                lat,
                "latitude exceeds 90 degrees",
            ));
        }
        Ok(())
    }
}

impl Projection for Geographic {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> GeomResult<(f64, f64)> {
        Self::check_lat(lon_deg, lat_deg)?;
        Ok((normalize_lon(lon_deg), lat_deg))
    }

    fn inverse(&self, x: f64, y: f64) -> GeomResult<(f64, f64)> {
        Self::check_lat(x, y)?;
        Ok((normalize_lon(x), y))
    }
}
