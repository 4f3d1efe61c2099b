pub mod polygon_2d;

/// Scaled integer coordinate (1 unit = [`SCALING_FACTOR`] mm).
pub type Coord = i64;

/// Integer 2D point on the scaled grid.
pub type Point64 = nalgebra::Point2<Coord>;

/// Floating-point 2D point.
pub type PointD = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// An ordered list of grid points. Closedness is implied by context.
pub type Path64 = Vec<Point64>;

/// A set of paths.
pub type Paths64 = Vec<Path64>;

/// Millimetres per scaled unit.
pub const SCALING_FACTOR: f64 = 1e-6;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Converts millimetres to scaled coordinates, rounding to the nearest unit.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn scaled(mm: f64) -> Coord {
    (mm / SCALING_FACTOR).round() as Coord
}

/// Converts scaled coordinates back to millimetres.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn unscaled(value: Coord) -> f64 {
    value as f64 * SCALING_FACTOR
}

/// Rounds a floating-point position onto the integer grid.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_point(x: f64, y: f64) -> Point64 {
    Point64::new(x.round() as Coord, y.round() as Coord)
}

/// Widens a grid point to floating point.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_point_d(pt: &Point64) -> PointD {
    PointD::new(pt.x as f64, pt.y as f64)
}
