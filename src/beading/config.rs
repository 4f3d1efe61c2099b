use crate::error::{ConfigError, Result};
use crate::math::{scaled, Coord};

/// Immutable configuration shared by every beading strategy in a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct BeadingConfig {
    /// Nominal width of a single bead, in scaled units.
    pub optimal_width: Coord,
    /// Fraction of `optimal_width` the remainder must reach before an odd
    /// bead count splits its middle bead.
    pub wall_split_middle_threshold: f64,
    /// Fraction of `optimal_width` the remainder must reach before an even
    /// bead count gains a middle bead.
    pub wall_add_middle_threshold: f64,
    /// Length over which a bead-count transition is spread.
    pub default_transition_length: Coord,
    /// Angle (radians) below which corners get transitions.
    pub transitioning_angle: f64,
    /// How many beads around the middle share the slack. Values below 2 all
    /// behave like 2.
    pub distribution_radius: i32,
    /// Wrap the strategy so the outer wall contour is marked.
    pub outer_wall_contour: bool,
}

impl Default for BeadingConfig {
    fn default() -> Self {
        Self {
            optimal_width: scaled(0.42),
            wall_split_middle_threshold: 0.5,
            wall_add_middle_threshold: 0.6,
            default_transition_length: scaled(0.42),
            transitioning_angle: 10.0_f64.to_radians(),
            distribution_radius: 1,
            outer_wall_contour: false,
        }
    }
}

impl BeadingConfig {
    /// Creates a configuration with the given widths and thresholds and
    /// default transition settings.
    #[must_use]
    pub fn new(
        optimal_width: Coord,
        wall_split_middle_threshold: f64,
        wall_add_middle_threshold: f64,
        distribution_radius: i32,
    ) -> Self {
        Self {
            optimal_width,
            wall_split_middle_threshold,
            wall_add_middle_threshold,
            distribution_radius,
            ..Self::default()
        }
    }

    /// Checks the fields a strategy divides by.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotPositive` if `optimal_width <= 0`.
    pub fn validate(&self) -> Result<()> {
        if self.optimal_width <= 0 {
            return Err(ConfigError::NotPositive {
                parameter: "optimal_width",
                value: self.optimal_width,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = BeadingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.optimal_width, 420_000);
    }

    #[test]
    fn zero_width_rejected() {
        let config = BeadingConfig::new(0, 0.5, 0.6, 2);
        assert!(config.validate().is_err());
        let config = BeadingConfig::new(-5, 0.5, 0.6, 2);
        assert!(config.validate().is_err());
    }
}
