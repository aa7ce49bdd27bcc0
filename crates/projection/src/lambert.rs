//! Lambert Conformal Conic projection.
//!
//! Commonly used for regional weather model grids. It maps a cone tangent
//! or secant to the Earth's surface onto a flat plane.
//!
//! The projection parameters are:
//! - Reference latitude (lat0): the latitude of the projection origin
//! - Reference longitude (lon0): the central meridian
//! - Standard parallel(s): latin1 and latin2 (equal for a tangent cone)

use std::f64::consts::PI;

use geom_common::{GeomError, GeomResult};

use crate::transform::Projection;
use crate::{normalize_lon, EARTH_RADIUS};

/// Lambert Conformal Conic projection on a sphere.
///
/// Forward maps (lon, lat) degrees to (x, y) meters relative to the
/// projection origin at (lon0, lat0); inverse maps back.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    lon0: f64,
    /// First standard parallel in radians
    latin1: f64,
    /// Second standard parallel in radians
    latin2: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the reference latitude
    rho0: f64,
}

impl LambertConformal {
    /// Create a new Lambert Conformal projection.
    ///
    /// # Arguments
    /// * `lon0_deg` - Central meridian (degrees)
    /// * `lat0_deg` - Reference latitude of the origin (degrees)
    /// * `latin1_deg` - First standard parallel (degrees)
    /// * `latin2_deg` - Second standard parallel (degrees)
    pub fn new(lon0_deg: f64, lat0_deg: f64, latin1_deg: f64, latin2_deg: f64) -> Self {
        let lat0 = lat0_deg.to_radians();
        let lon0 = lon0_deg.to_radians();
        let latin1 = latin1_deg.to_radians();
        let latin2 = latin2_deg.to_radians();

        // Compute cone constant n
        let n = if (latin1 - latin2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            latin1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (latin1.cos() / latin2.cos()).ln();
            let tan_ratio =
                ((PI / 4.0 + latin2 / 2.0).tan() / (PI / 4.0 + latin1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        // Compute F constant
        let f = (latin1.cos() * (PI / 4.0 + latin1 / 2.0).tan().powf(n)) / n;

        // Rho at the reference latitude
        let rho0 = EARTH_RADIUS * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            latin1,
            latin2,
            n,
            f,
            rho0,
        }
    }

    /// HRRR CONUS projection parameters (3km Lambert Conformal).
    pub fn hrrr() -> Self {
        Self::new(-97.5, 38.5, 38.5, 38.5)
    }

    /// The standard parallels in degrees.
    pub fn standard_parallels(&self) -> (f64, f64) {
        (self.latin1.to_degrees(), self.latin2.to_degrees())
    }

    /// Normalize a longitude difference to [-π, π].
    fn normalize_dlon(mut dlon: f64) -> f64 {
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }
        dlon
    }
}

impl Projection for LambertConformal {
    fn forward(&self, lon_deg: f64, lat_deg: f64) -> GeomResult<(f64, f64)> {
        if !lon_deg.is_finite() || !lat_deg.is_finite() {
            return Err(GeomError::transform_domain(
                lon_deg,
                lat_deg,
                "non-finite coordinate",
            ));
        }
        if lat_deg.abs() > 90.0 {
            return Err(GeomError::transform_domain(
                lon_deg,
                lat_deg,
                "latitude exceeds 90 degrees",
            ));
        }

        let lat = lat_deg.to_radians();
        let lon = normalize_lon(lon_deg).to_radians();
        let dlon = Self::normalize_dlon(lon - self.lon0);

        // Rho for this latitude; the antipodal pole sends it to infinity
        let rho = EARTH_RADIUS * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        if !rho.is_finite() {
            return Err(GeomError::transform_domain(
                lon_deg,
                lat_deg,
                "latitude outside Lambert Conformal domain",
            ));
        }

        let theta = self.n * dlon;
        let x = rho * theta.sin();
        let y = self.rho0 - rho * theta.cos();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> GeomResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeomError::transform_domain(x, y, "non-finite coordinate"));
        }

        let rho = (x * x + (self.rho0 - y) * (self.rho0 - y)).sqrt();
        let rho = if self.n < 0.0 { -rho } else { rho };
        let theta = (x / (self.rho0 - y)).atan();

        let lat = if rho.abs() < f64::EPSILON {
            // On the projection pole itself
            if self.n > 0.0 {
                PI / 2.0
            } else {
                -PI / 2.0
            }
        } else {
            2.0 * ((EARTH_RADIUS * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0
        };
        let lon = self.lon0 + theta / self.n;

        Ok((normalize_lon(lon.to_degrees()), lat.to_degrees()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        let proj = LambertConformal::hrrr();
        let (x, y) = proj.forward(-97.5, 38.5).unwrap();
        assert!(x.abs() < 1e-6, "x should be ~0 at the origin, got {}", x);
        assert!(y.abs() < 1e-6, "y should be ~0 at the origin, got {}", y);
    }

    #[test]
    fn test_roundtrip() {
        let proj = LambertConformal::hrrr();
        for &(lon, lat) in &[(-94.5, 39.0), (-122.7, 21.1), (-70.0, 45.0)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert!((lon - lon2).abs() < 1e-9, "lon roundtrip: {} vs {}", lon, lon2);
            assert!((lat - lat2).abs() < 1e-9, "lat roundtrip: {} vs {}", lat, lat2);
        }
    }

    #[test]
    fn test_secant_cone_roundtrip() {
        let proj = LambertConformal::new(-96.0, 40.0, 33.0, 45.0);
        let (x, y) = proj.forward(-90.0, 35.0).unwrap();
        let (lon, lat) = proj.inverse(x, y).unwrap();
        assert!((lon + 90.0).abs() < 1e-9);
        assert!((lat - 35.0).abs() < 1e-9);
    }

    #[test]
    fn test_east_of_meridian_positive_x() {
        let proj = LambertConformal::hrrr();
        let (x, _) = proj.forward(-90.0, 38.5).unwrap();
        assert!(x > 0.0);
        let (x, _) = proj.forward(-105.0, 38.5).unwrap();
        assert!(x < 0.0);
    }

    #[test]
    fn test_antipodal_pole_rejected() {
        let proj = LambertConformal::hrrr();
        assert!(proj.forward(-97.5, -90.0).is_err());
    }
}
