mod config;
mod distributed;
mod outer_wall_contour;

pub use config::BeadingConfig;
pub use distributed::DistributedBeadingStrategy;
pub use outer_wall_contour::OuterWallContourStrategy;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{BeadingError, Result};
use crate::math::{scaled, Coord};

/// Width reported for the sentinel beads that mark the outer wall contour.
///
/// Real bead widths are never negative, so the marker cannot collide with one.
pub const FIRST_WALL_CONTOUR_MARKED_WIDTH: Coord = -1;

/// Shared handle to a strategy. Decorators hold one of these to their parent.
pub type BeadingStrategyPtr = Arc<dyn BeadingStrategy>;

/// Bead widths and centerline offsets filling one local thickness.
///
/// Index 0 is the first bead on the caller's reference side; locations are
/// measured from the same zero as the thickness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Beading {
    pub total_thickness: Coord,
    pub bead_widths: Vec<Coord>,
    pub toolpath_locations: Vec<Coord>,
    pub left_over: Coord,
}

impl Beading {
    /// A beading with no beads: the whole thickness is left over.
    #[must_use]
    pub fn empty(thickness: Coord) -> Self {
        Self {
            total_thickness: thickness,
            bead_widths: Vec::new(),
            toolpath_locations: Vec::new(),
            left_over: thickness,
        }
    }

    /// Builds a beading from widths, placing each bead half its own width
    /// plus half its predecessor's width after the previous one.
    #[must_use]
    pub fn from_widths(thickness: Coord, bead_widths: Vec<Coord>, left_over: Coord) -> Self {
        let mut toolpath_locations: Vec<Coord> = Vec::with_capacity(bead_widths.len());
        for (idx, &width) in bead_widths.iter().enumerate() {
            let location = if idx == 0 {
                width / 2
            } else {
                toolpath_locations[idx - 1] + (bead_widths[idx - 1] + width) / 2
            };
            toolpath_locations.push(location);
        }
        Self {
            total_thickness: thickness,
            bead_widths,
            toolpath_locations,
            left_over,
        }
    }

    /// Number of entries, contour markers included.
    #[must_use]
    pub fn bead_count(&self) -> usize {
        self.bead_widths.len()
    }

    /// Whether entry `idx` is an outer wall contour marker.
    #[must_use]
    pub fn is_contour_marker(&self, idx: usize) -> bool {
        self.bead_widths.get(idx) == Some(&FIRST_WALL_CONTOUR_MARKED_WIDTH)
    }

    /// Sum of the real bead widths, contour markers excluded.
    #[must_use]
    pub fn real_width_sum(&self) -> Coord {
        self.bead_widths
            .iter()
            .filter(|&&w| w != FIRST_WALL_CONTOUR_MARKED_WIDTH)
            .sum()
    }

    /// Verifies that widths and locations pair up and that real widths plus
    /// the left over add up to the thickness exactly.
    ///
    /// # Errors
    ///
    /// Returns `BeadingError::LengthMismatch` or `BeadingError::SumMismatch`.
    pub fn check_sum(&self) -> Result<()> {
        if self.bead_widths.len() != self.toolpath_locations.len() {
            return Err(BeadingError::LengthMismatch {
                widths: self.bead_widths.len(),
                locations: self.toolpath_locations.len(),
            }
            .into());
        }
        let widths = self.real_width_sum();
        if widths + self.left_over != self.total_thickness {
            return Err(BeadingError::SumMismatch {
                widths,
                left_over: self.left_over,
                thickness: self.total_thickness,
            }
            .into());
        }
        Ok(())
    }
}

/// Decides how many beads fill a thickness and how wide each one is.
///
/// Implementations are immutable after construction; every query is a pure
/// function of its arguments and the [`BeadingConfig`].
pub trait BeadingStrategy: fmt::Debug + Send + Sync {
    /// Configuration this strategy was built with.
    fn config(&self) -> &BeadingConfig;

    /// Human-readable name, including any wrapped strategies.
    fn name(&self) -> String;

    /// Distributes `thickness` over `bead_count` beads.
    fn compute(&self, thickness: Coord, bead_count: usize) -> Beading;

    /// Bead count that best fills `thickness`.
    fn optimal_bead_count(&self, thickness: Coord) -> usize;

    fn optimal_width(&self) -> Coord {
        self.config().optimal_width
    }

    fn split_middle_threshold(&self) -> f64 {
        self.config().wall_split_middle_threshold
    }

    fn add_middle_threshold(&self) -> f64 {
        self.config().wall_add_middle_threshold
    }

    fn transitioning_angle(&self) -> f64 {
        self.config().transitioning_angle
    }

    /// Thickness at which `bead_count` beads all have their optimal width.
    #[allow(clippy::cast_possible_wrap)]
    fn optimal_thickness(&self, bead_count: usize) -> Coord {
        self.optimal_width() * bead_count as Coord
    }

    /// Thickness at which `lower_bead_count` becomes `lower_bead_count + 1`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn transition_thickness(&self, lower_bead_count: usize) -> Coord {
        let lower_ideal_width = self.optimal_thickness(lower_bead_count);
        let upper_ideal_width = self.optimal_thickness(lower_bead_count + 1);
        let threshold = if lower_bead_count % 2 == 1 {
            self.split_middle_threshold()
        } else {
            self.add_middle_threshold()
        };
        (lower_ideal_width as f64 + (upper_ideal_width - lower_ideal_width) as f64 * threshold)
            as Coord
    }

    /// Length of the transition from `lower_bead_count` to one more bead.
    fn transitioning_length(&self, lower_bead_count: usize) -> Coord {
        if lower_bead_count == 0 {
            return scaled(0.01);
        }
        self.config().default_transition_length
    }

    /// Where the transition is anchored, as a fraction of the transition
    /// length measured from the higher bead count side.
    #[allow(clippy::cast_precision_loss)]
    fn transition_anchor_pos(&self, lower_bead_count: usize) -> f64 {
        let lower_optimum = self.optimal_thickness(lower_bead_count);
        let transition_point = self.transition_thickness(lower_bead_count);
        let upper_optimum = self.optimal_thickness(lower_bead_count + 1);
        1.0 - (transition_point - lower_optimum) as f64 / (upper_optimum - lower_optimum) as f64
    }

    /// Extra thicknesses between bead counts where behaviour changes
    /// non-linearly. None by default.
    fn nonlinear_thicknesses(&self, _lower_bead_count: usize) -> Vec<Coord> {
        Vec::new()
    }
}

/// Builds the strategy chain described by `config`.
///
/// # Errors
///
/// Returns an error if `config` fails validation.
pub fn make_strategy(config: &BeadingConfig) -> Result<BeadingStrategyPtr> {
    let mut strategy: BeadingStrategyPtr = Arc::new(DistributedBeadingStrategy::new(config.clone())?);
    if config.outer_wall_contour {
        strategy = Arc::new(OuterWallContourStrategy::new(strategy));
    }
    debug!(name = %strategy.name(), "assembled beading strategy");
    Ok(strategy)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn from_widths_follows_recurrence() {
        let beading = Beading::from_widths(1200, vec![400, 300, 500], 0);
        assert_eq!(beading.toolpath_locations, vec![200, 550, 950]);
        assert!(beading.check_sum().is_ok());
    }

    #[test]
    fn empty_beading_leaves_everything_over() {
        let beading = Beading::empty(77);
        assert_eq!(beading.bead_count(), 0);
        assert_eq!(beading.left_over, 77);
        assert!(beading.check_sum().is_ok());
    }

    #[test]
    fn check_sum_reports_mismatch() {
        let beading = Beading::from_widths(1000, vec![400, 400], 0);
        assert!(beading.check_sum().is_err());

        let mut beading = Beading::from_widths(800, vec![400, 400], 0);
        beading.toolpath_locations.pop();
        assert!(beading.check_sum().is_err());
    }

    #[test]
    fn markers_excluded_from_sum() {
        let beading = Beading {
            total_thickness: 1000,
            bead_widths: vec![500, FIRST_WALL_CONTOUR_MARKED_WIDTH, FIRST_WALL_CONTOUR_MARKED_WIDTH, 500],
            toolpath_locations: vec![250, 500, 500, 750],
            left_over: 0,
        };
        assert!(beading.is_contour_marker(1));
        assert!(!beading.is_contour_marker(0));
        assert!(!beading.is_contour_marker(9));
        assert_eq!(beading.real_width_sum(), 1000);
        assert!(beading.check_sum().is_ok());
    }

    #[test]
    fn base_transition_geometry() {
        let strategy = make_strategy(&BeadingConfig::new(400, 0.5, 0.6, 2)).unwrap();
        assert_eq!(strategy.optimal_thickness(3), 1200);
        // Even lower count uses the add threshold, odd the split threshold.
        assert_eq!(strategy.transition_thickness(2), 800 + 240);
        assert_eq!(strategy.transition_thickness(1), 400 + 200);
        assert_eq!(strategy.transitioning_length(0), scaled(0.01));
        assert_eq!(strategy.transitioning_length(3), scaled(0.42));
        assert_relative_eq!(strategy.transition_anchor_pos(2), 0.4, epsilon = 1e-9);
        assert!(strategy.nonlinear_thicknesses(2).is_empty());
    }

    #[test]
    fn factory_wraps_when_requested() {
        let plain = make_strategy(&BeadingConfig::default()).unwrap();
        assert_eq!(plain.name(), "DistributedBeadingStrategy");

        let config = BeadingConfig {
            outer_wall_contour: true,
            ..BeadingConfig::default()
        };
        let wrapped = make_strategy(&config).unwrap();
        assert_eq!(wrapped.name(), "OuterWallContourStrategy+DistributedBeadingStrategy");
    }

    #[test]
    fn factory_rejects_invalid_config() {
        assert!(make_strategy(&BeadingConfig::new(0, 0.5, 0.6, 2)).is_err());
    }
}
