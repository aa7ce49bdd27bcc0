//! Polar stereographic projections (EPSG:3413 north, EPSG:3031 south).

use std::f64::consts::PI;

use geom_common::{GeomError, GeomResult};

use crate::transform::Projection;
use crate::{normalize_lon, EARTH_RADIUS};

/// Which pole the projection plane touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pole {
    North,
    South,
}

/// Spherical polar stereographic projection.
///
/// The plane is tangent at the pole with true scale at `lat_ts`; the
/// central meridian `lon0` points down the negative Y axis (north) or
/// positive Y axis (south), matching the EPSG conventions.
#[derive(Debug, Clone, Copy)]
pub struct PolarStereographic {
    pole: Pole,
    /// Central meridian in degrees.
    lon0: f64,
    /// Scale factor derived from the true-scale latitude.
    k0: f64,
}

impl PolarStereographic {
    /// Create a projection with an explicit central meridian and
    /// true-scale latitude (degrees, positive in the projection hemisphere).
    pub fn new(pole: Pole, lon0_deg: f64, lat_ts_deg: f64) -> Self {
        let lat_ts = lat_ts_deg.abs().to_radians();
        // Scale so that distances are true at lat_ts rather than the pole
        let k0 = (1.0 + lat_ts.sin()) / 2.0;
        Self {
            pole,
            lon0: lon0_deg,
            k0,
        }
    }

    /// NSIDC Sea Ice Polar Stereographic North (EPSG:3413 parameters).
    pub fn north() -> Self {
        Self::new(Pole::North, -45.0, 70.0)
    }

    /// Antarctic Polar Stereographic (EPSG:3031 parameters).
    pub fn south() -> Self {
        Self::new(Pole::South, 0.0, 71.0)
    }

    /// Colatitude factor: distance from the projection pole on the plane.
    fn rho(&self, lat_rad: f64) -> f64 {
        let colat_half = match self.pole {
            Pole::North => PI / 4.0 - lat_rad / 2.0,
            Pole::South => PI / 4.0 + lat_rad / 2.0,
        };
        2.0 * EARTH_RADIUS * self.k0 * colat_half.tan()
    }
}

impl Projection for PolarStereographic {
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
        // The opposite pole projects to infinity
        let opposite = match self.pole {
            Pole::North => lat_deg <= -89.999,
            Pole::South => lat_deg >= 89.999,
        };
        if opposite {
            return Err(GeomError::transform_domain(
                lon_deg,
                lat_deg,
                "latitude at the antipodal pole is outside the projection domain",
            ));
        }

        let lat = lat_deg.to_radians();
        let dlon = (normalize_lon(lon_deg) - self.lon0).to_radians();
        let rho = self.rho(lat);

        let (x, y) = match self.pole {
            Pole::North => (rho * dlon.sin(), -rho * dlon.cos()),
            Pole::South => (rho * dlon.sin(), rho * dlon.cos()),
        };
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> GeomResult<(f64, f64)> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeomError::transform_domain(x, y, "non-finite coordinate"));
        }

        let rho = (x * x + y * y).sqrt();
        let colat_half = (rho / (2.0 * EARTH_RADIUS * self.k0)).atan();

        let (lat, dlon) = match self.pole {
            Pole::North => {
                let lat = PI / 2.0 - 2.0 * colat_half;
                (lat, x.atan2(-y))
            }
            Pole::South => {
                let lat = 2.0 * colat_half - PI / 2.0;
                (lat, x.atan2(y))
            }
        };

        let lon = normalize_lon(self.lon0 + dlon.to_degrees());
        Ok((lon, lat.to_degrees()))
    }
}
