//! Threshold levels defining regions of interest.

use serde::{Deserialize, Serialize};

use crate::{GeomError, GeomResult};

/// A scalar threshold or pair of thresholds defining a region of interest.
///
/// All bounds are lower-closed: a value exactly equal to the lower bound is
/// inside the region, a value exactly equal to the upper bound is outside.
/// Adjacent bands therefore partition the value range exactly, with no gap
/// or overlap at the shared threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Level {
    /// Region where `value >= threshold`.
    Threshold(f64),
    /// Region where `lo <= value < hi`.
    Band { lo: f64, hi: f64 },
}

impl Level {
    /// Create a band level, validating the bounds.
    pub fn band(lo: f64, hi: f64) -> GeomResult<Self> {
        if !lo.is_finite() || !hi.is_finite() {
            return Err(GeomError::malformed_grid(format!(
                "level bounds must be finite, got [{}, {})",
                lo, hi
            )));
        }
        if lo >= hi {
            return Err(GeomError::malformed_grid(format!(
                "level lower bound {} must be below upper bound {}",
                lo, hi
            )));
        }
        Ok(Level::Band { lo, hi })
    }

    /// Lower bound of the region.
    pub fn lo(&self) -> f64 {
        match self {
            Level::Threshold(t) => *t,
            Level::Band { lo, .. } => *lo,
        }
    }

    /// Upper bound of the region (`+inf` for a plain threshold).
    pub fn hi(&self) -> f64 {
        match self {
            Level::Threshold(_) => f64::INFINITY,
            Level::Band { hi, .. } => *hi,
        }
    }

    /// Whether a value lies inside the region.
    ///
    /// NaN is never inside.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lo() && value < self.hi()
    }

    /// A representative value used for labelling/logging.
    pub fn key(&self) -> f64 {
        self.lo()
    }
}
