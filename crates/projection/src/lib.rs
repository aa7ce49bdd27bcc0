//! Coordinate reference system transformations.
//!
//! Implements map projections from scratch without external dependencies.
//! Each projection is an immutable value implementing [`Projection`], safely
//! shared read-only across concurrent extractions.

pub mod geographic;
pub mod lambert;
pub mod mercator;
pub mod polar;
pub mod transform;

pub use geographic::Geographic;
pub use lambert::LambertConformal;
pub use mercator::WebMercator;
pub use polar::PolarStereographic;
pub use transform::{resolve, resolve_str, transform_points, Projection};

/// Mean Earth radius in meters (spherical model, as used for NWP grids).
pub const EARTH_RADIUS: f64 = 6371229.0;

/// WGS84 equatorial radius in meters (Web Mercator sphere).
pub const WGS84_RADIUS: f64 = 6378137.0;

/// Wrap a longitude in degrees into [-180, 180).
pub fn normalize_lon(lon_deg: f64) -> f64 {
    let mut lon = (lon_deg + 180.0) % 360.0;
    if lon < 0.0 {
        lon += 360.0;
    }
    lon - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon() {
        assert!((normalize_lon(190.0) + 170.0).abs() < 1e-12);
        assert!((normalize_lon(-190.0) - 170.0).abs() < 1e-12);
        assert!((normalize_lon(360.0) - 0.0).abs() < 1e-12);
        assert!((normalize_lon(45.0) - 45.0).abs() < 1e-12);
        assert!((normalize_lon(180.0) + 180.0).abs() < 1e-12);
    }
}
