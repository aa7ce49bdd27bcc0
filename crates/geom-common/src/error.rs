//! Error types for the grid-geom workspace.

use thiserror::Error;

/// Result type alias using GeomError.
pub type GeomResult<T> = Result<T, GeomError>;

/// Primary error type for grid-to-geometry operations.
///
/// The failure kinds form a closed set; every variant except
/// `EmptyLevelSet` indicates malformed input or an unrepresentable
/// geometric configuration and propagates directly to the caller.
#[derive(Debug, Error)]
pub enum GeomError {
    /// The reference-system identifier could not be resolved.
    #[error("invalid reference system: {0}")]
    InvalidReferenceSystem(String),

    /// Input coordinates fall outside the mathematical domain of the transform.
    #[error("coordinate ({x}, {y}) outside transform domain: {message}")]
    TransformDomain { x: f64, y: f64, message: String },

    /// Coordinate array shape is inconsistent with the declared grid type.
    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    /// A partially built ring could not be closed within tolerance after
    /// all fragments were consumed.
    #[error("ring at level {level} could not be closed near ({x}, {y})")]
    UnclosableRing { level: f64, x: f64, y: f64 },

    /// No cell in the grid satisfies any requested level.
    ///
    /// Informational: callers may treat this as empty output.
    #[error("no grid cell satisfies any requested level")]
    EmptyLevelSet,
}

impl GeomError {
    /// Create a TransformDomain error.
    pub fn transform_domain(x: f64, y: f64, message: impl Into<String>) -> Self {
        Self::TransformDomain {
            x,
            y,
            message: message.into(),
        }
    }

    /// Create a MalformedGrid error.
    pub fn malformed_grid(msg: impl Into<String>) -> Self {
        Self::MalformedGrid(msg.into())
    }

    /// Whether this error is fatal to the call.
    ///
    /// `EmptyLevelSet` is the one non-fatal condition: it represents
    /// "no matching region" rather than a crash.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, GeomError::EmptyLevelSet)
    }
}
