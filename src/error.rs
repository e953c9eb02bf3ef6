use thiserror::Error;

/// Top-level error type for the hemline curve kernel.
#[derive(Debug, Error)]
pub enum HemlineError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations on curves.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The curve is at or below the minimum cuttable length.
    #[error("curve of length {length} is too short to cut (minimum {min})")]
    CurveTooShort { length: f64, min: f64 },

    /// A requested cut length lies outside the valid interval.
    #[error("cut length {requested} is outside [{min}, {max}]")]
    SegmentLengthOutOfRange { requested: f64, min: f64, max: f64 },

    /// Fewer control points than the curve kind requires, or an
    /// otherwise unusable input (zero-length line, empty point list).
    #[error("degenerate curve: {0}")]
    Degenerate(String),
}

/// Errors related to operations built on top of curve geometry.
#[derive(Debug, Error)]
pub enum OperationError {
    /// A point handed to a sub-range extraction does not lie on the curve.
    #[error("point ({x}, {y}) does not lie on the curve within tolerance")]
    PointNotOnCurve { x: f64, y: f64 },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for results using [`HemlineError`].
pub type Result<T> = std::result::Result<T, HemlineError>;
