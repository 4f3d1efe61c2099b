use thiserror::Error;

use crate::math::Coord;

/// Top-level error type for the wall toolpath core.
#[derive(Debug, Error)]
pub enum WallpathError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Beading(#[from] BeadingError),

    #[error(transparent)]
    Offset(#[from] OffsetError),
}

/// Errors related to strategy or engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{parameter} must be positive, got {value}")]
    NotPositive { parameter: &'static str, value: Coord },
}

/// Errors related to a computed beading.
#[derive(Debug, Error)]
pub enum BeadingError {
    #[error("bead widths ({widths}) plus left over ({left_over}) do not sum to thickness {thickness}")]
    SumMismatch {
        widths: Coord,
        left_over: Coord,
        thickness: Coord,
    },

    #[error("{widths} bead widths but {locations} toolpath locations")]
    LengthMismatch { widths: usize, locations: usize },
}

/// Errors related to polygon offsetting.
#[derive(Debug, Error)]
pub enum OffsetError {
    #[error("non-finite coordinate ({x}, {y})")]
    NonFiniteCoordinate { x: f64, y: f64 },
}

/// Convenience type alias for results using [`WallpathError`].
pub type Result<T> = std::result::Result<T, WallpathError>;
