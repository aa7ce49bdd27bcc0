//! Spherical Web Mercator projection (EPSG:3857).

use std::f64::consts::PI;

use geom_common::{GeomError, GeomResult};

use crate::transform::Projection;
use crate::{normalize_lon, WGS84_RADIUS};

/// Latitude beyond which Web Mercator is undefined for practical purposes.
///
/// This is the latitude at which the projected Y equals the projected
/// half-circumference, giving the square world extent.
pub const MAX_LATITUDE: f64 = 85.051128779806604;

/// Web Mercator (EPSG:3857), spherical formulas on the WGS84 radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

impl Projection for WebMercator {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> GeomResult<(f64, f64)> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return Err(GeomError::transform_domain(
                lon_deg,
                lat_deg,
                "non-finite coordinate",
            ));
        }
        if lat_deg.abs() > MAX_LATITUDE {
            return Err(GeomError::transform_domain(
                lon_deg,
                lat_deg,
                "latitude outside Web Mercator domain",
            ));
        }

        let lon = normalize_lon(lon_deg).to_radians();
        let lat = lat_deg.to_radians();

        let x = WGS84_RADIUS * lon;
        let y = WGS84_RADIUS * (PI / 4.0 + lat / 2.0).tan().ln();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> GeomResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeomError::transform_domain(x, y, "non-finite coordinate"));
        }

        let lon = (x / WGS84_RADIUS).to_degrees();
        let lat = (2.0 * (y / WGS84_RADIUS).exp().atan() - PI / 2.0).to_degrees();
        Ok((normalize_lon(lon), lat))
    }
}
