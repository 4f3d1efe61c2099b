use tracing::{debug, trace};

use super::{Beading, BeadingConfig, BeadingStrategy};
use crate::error::Result;
use crate::math::Coord;

/// Per-bead share of the slack, summing to one.
enum BeadWeights {
    /// Every bead can take its share without going negative.
    Distributed(Vec<f32>),
    /// No bead can absorb the excess; widths are taken straight from the
    /// thickness instead of from the optimal width.
    Saturated(Vec<f32>),
}

/// Spreads the difference between the thickness and the sum of optimal
/// widths over the beads, weighting the middle beads most.
///
/// Weights follow an inverted parabola centred on the middle bead that
/// reaches zero `distribution_radius - 1` beads away from it.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributedBeadingStrategy {
    config: BeadingConfig,
    one_over_distribution_radius_squared: f32,
}

impl DistributedBeadingStrategy {
    /// Creates a new strategy. A `distribution_radius` below 2 is treated
    /// as 2.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(config: BeadingConfig) -> Result<Self> {
        config.validate()?;
        let denominator = if config.distribution_radius >= 2 {
            (config.distribution_radius - 1) as f32
        } else {
            1.0
        };
        let one_over_distribution_radius_squared = 1.0 / denominator * 1.0 / denominator;
        debug!(
            optimal_width = config.optimal_width,
            distribution_radius = config.distribution_radius,
            "created distributed beading strategy"
        );
        Ok(Self {
            config,
            one_over_distribution_radius_squared,
        })
    }

    #[allow(clippy::cast_precision_loss)]
    fn normalized_weights(&self, to_be_divided: Coord, bead_count: usize) -> BeadWeights {
        let middle = (bead_count - 1) as f32 / 2.0;
        let mut weights: Vec<f32> = (0..bead_count)
            .map(|bead_idx| {
                let dev_from_middle = bead_idx as f32 - middle;
                (1.0 - self.one_over_distribution_radius_squared * dev_from_middle * dev_from_middle)
                    .max(0.0)
            })
            .collect();

        let total_weight: f32 = weights.iter().sum();
        for weight in &mut weights {
            *weight /= total_weight;
        }

        // Surplus never makes a bead negative.
        if to_be_divided >= 0 {
            return BeadWeights::Distributed(weights);
        }

        // Largest weight a bead can carry before its width would go negative.
        let max_allowed_weight =
            -(self.config.optimal_width as f32) / to_be_divided as f32 / total_weight;
        let mut max_adjustment = 0.0_f32;
        let mut adjustment_cnt = 0_usize;
        for &weight in &weights {
            if weight > max_allowed_weight {
                max_adjustment = max_adjustment.max(weight - max_allowed_weight);
                adjustment_cnt += 1;
            }
        }

        if adjustment_cnt == 0 {
            return BeadWeights::Distributed(weights);
        }

        let increaseable_weight_cnt = weights.len() - adjustment_cnt;
        if increaseable_weight_cnt == 0 {
            return BeadWeights::Saturated(weights);
        }

        // Beads over the limit are dropped; the rest share the excess.
        let share = max_adjustment / increaseable_weight_cnt as f32;
        BeadWeights::Distributed(
            weights
                .into_iter()
                .filter(|&weight| weight <= max_allowed_weight)
                .map(|weight| (weight + share).max(0.0))
                .collect(),
        )
    }

    /// Optimal width plus each bead's share of `to_be_divided`; the last bead
    /// takes whatever remains. `None` if that remainder is negative.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn distribute(&self, thickness: Coord, to_be_divided: Coord, weights: &[f32]) -> Option<Vec<Coord>> {
        let last = weights.len() - 1;
        let mut widths = Vec::with_capacity(weights.len());
        let mut accumulated_width: Coord = 0;
        for (bead_idx, &weight) in weights.iter().enumerate() {
            let width = if bead_idx == last {
                thickness - accumulated_width
            } else {
                let splitup_left_over_weight = (to_be_divided as f32 * weight) as Coord;
                (self.config.optimal_width + splitup_left_over_weight).max(0)
            };
            widths.push(width);
            accumulated_width += width;
        }
        if widths[last] < 0 {
            return None;
        }
        Some(widths)
    }

    /// Each bead gets its weighted fraction of the whole thickness.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn distribute_proportionally(thickness: Coord, weights: &[f32]) -> Vec<Coord> {
        let last = weights.len() - 1;
        let mut widths = Vec::with_capacity(weights.len());
        let mut accumulated_width: Coord = 0;
        for (bead_idx, &weight) in weights.iter().enumerate() {
            let remaining = thickness - accumulated_width;
            let width = if bead_idx == last {
                remaining
            } else {
                ((thickness as f64 * f64::from(weight)).floor() as Coord).clamp(0, remaining.max(0))
            };
            widths.push(width);
            accumulated_width += width;
        }
        widths
    }
}

impl BeadingStrategy for DistributedBeadingStrategy {
    fn config(&self) -> &BeadingConfig {
        &self.config
    }

    fn name(&self) -> String {
        "DistributedBeadingStrategy".to_owned()
    }

    #[allow(clippy::cast_possible_wrap)]
    fn compute(&self, thickness: Coord, bead_count: usize) -> Beading {
        let beading = match bead_count {
            0 => Beading::empty(thickness),
            1 => Beading {
                total_thickness: thickness,
                bead_widths: vec![thickness],
                toolpath_locations: vec![thickness / 2],
                left_over: 0,
            },
            2 => {
                let outer_width = thickness / 2;
                Beading {
                    total_thickness: thickness,
                    bead_widths: vec![outer_width, outer_width],
                    toolpath_locations: vec![outer_width / 2, thickness - outer_width / 2],
                    left_over: thickness - 2 * outer_width,
                }
            }
            _ => {
                let to_be_divided = thickness - bead_count as Coord * self.config.optimal_width;
                // The weight count may be lower than `bead_count` when a bead
                // was dropped to keep the others non-negative.
                let widths = match self.normalized_weights(to_be_divided, bead_count) {
                    BeadWeights::Distributed(weights) => self
                        .distribute(thickness, to_be_divided, &weights)
                        .unwrap_or_else(|| {
                            trace!(thickness, bead_count, "last bead would be negative");
                            Self::distribute_proportionally(thickness, &weights)
                        }),
                    BeadWeights::Saturated(weights) => {
                        trace!(thickness, bead_count, "bead weights saturated");
                        Self::distribute_proportionally(thickness, &weights)
                    }
                };
                Beading::from_widths(thickness, widths, 0)
            }
        };
        debug_assert!(beading.check_sum().is_ok(), "beading does not sum to thickness");
        beading
    }

    #[allow(clippy::cast_precision_loss, clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn optimal_bead_count(&self, thickness: Coord) -> usize {
        let optimal_width = self.config.optimal_width;
        // How many lines fit for sure, and the space left after them.
        let naive_count = thickness / optimal_width;
        let remainder = thickness - naive_count * optimal_width;
        let threshold = if naive_count % 2 == 1 {
            self.config.wall_split_middle_threshold
        } else {
            self.config.wall_add_middle_threshold
        };
        let minimum_line_width = optimal_width as f64 * threshold;
        let count = naive_count + Coord::from(remainder as f64 >= minimum_line_width);
        count.max(0) as usize
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn strategy(optimal_width: Coord, distribution_radius: i32) -> DistributedBeadingStrategy {
        DistributedBeadingStrategy::new(BeadingConfig::new(
            optimal_width,
            0.5,
            0.6,
            distribution_radius,
        ))
        .unwrap()
    }

    #[test]
    fn two_bead_wall_from_thousand() {
        let s = strategy(420, 2);
        assert_eq!(s.optimal_bead_count(1000), 2);

        let beading = s.compute(1000, 2);
        assert_eq!(beading.bead_widths, vec![500, 500]);
        assert_eq!(beading.toolpath_locations, vec![250, 750]);
        assert_eq!(beading.left_over, 0);
        assert_eq!(beading.total_thickness, 1000);
    }

    #[test]
    fn two_beads_odd_thickness_keeps_remainder() {
        let beading = strategy(420, 2).compute(1001, 2);
        assert_eq!(beading.bead_widths, vec![500, 500]);
        assert_eq!(beading.toolpath_locations, vec![250, 751]);
        assert_eq!(beading.left_over, 1);
        assert!(beading.check_sum().is_ok());
    }

    #[test]
    fn single_bead_takes_whole_thickness() {
        let beading = strategy(420, 2).compute(333, 1);
        assert_eq!(beading.bead_widths, vec![333]);
        assert_eq!(beading.toolpath_locations, vec![166]);
        assert_eq!(beading.left_over, 0);
    }

    #[test]
    fn zero_beads_leave_everything_over() {
        let beading = strategy(420, 2).compute(150, 0);
        assert!(beading.bead_widths.is_empty());
        assert!(beading.toolpath_locations.is_empty());
        assert_eq!(beading.left_over, 150);
    }

    #[test]
    fn optimal_bead_count_thresholds() {
        let s = strategy(420, 2);
        assert_eq!(s.optimal_bead_count(0), 0);
        // Even naive count (0) uses the add threshold: 252.
        assert_eq!(s.optimal_bead_count(251), 0);
        assert_eq!(s.optimal_bead_count(252), 1);
        // Odd naive count (1) uses the split threshold: 210.
        assert_eq!(s.optimal_bead_count(420 + 209), 1);
        assert_eq!(s.optimal_bead_count(420 + 210), 2);
        assert_eq!(s.optimal_bead_count(1260), 3);
    }

    #[test]
    fn exact_fit_keeps_optimal_widths() {
        let beading = strategy(400, 3).compute(1200, 3);
        assert_eq!(beading.bead_widths, vec![400, 400, 400]);
        assert_eq!(beading.toolpath_locations, vec![200, 600, 1000]);
    }

    #[test]
    fn surplus_goes_to_middle_bead() {
        // Radius below 2: only the middle bead has weight.
        let beading = strategy(400, 1).compute(1500, 3);
        assert_eq!(beading.bead_widths, vec![400, 700, 400]);
        assert_eq!(beading.toolpath_locations, vec![200, 750, 1300]);
    }

    #[test]
    fn surplus_spread_over_radius() {
        let beading = strategy(400, 3).compute(1500, 3);
        // Weights 0.75, 1, 0.75 normalized over 2.5.
        assert_eq!(beading.bead_widths, vec![490, 520, 490]);
        assert!(beading.check_sum().is_ok());
    }

    #[test]
    fn deficit_drops_overloaded_bead() {
        // Middle bead would need to shrink past zero; it is removed and the
        // outer beads share the thickness.
        let beading = strategy(420, 1).compute(0, 3);
        assert_eq!(beading.bead_count(), 2);
        assert!(beading.bead_widths.iter().all(|&w| w >= 0));
        assert!(beading.check_sum().is_ok());
    }

    #[test]
    fn radius_one_and_two_are_equivalent() {
        let a = strategy(420, 1);
        let b = strategy(420, 2);
        for thickness in [900, 1300, 1700, 2500] {
            for bead_count in 3..6 {
                assert_eq!(a.compute(thickness, bead_count), b.compute(thickness, bead_count));
            }
        }
    }

    #[test]
    fn identical_config_identical_results() {
        let a = strategy(420, 3);
        let b = strategy(420, 3);
        for thickness in (0..5000).step_by(37) {
            let count = a.optimal_bead_count(thickness);
            assert_eq!(count, b.optimal_bead_count(thickness));
            assert_eq!(a.compute(thickness, count), b.compute(thickness, count));
        }
    }

    proptest! {
        #[test]
        fn widths_sum_to_thickness(thickness in 0_i64..20_000_000, bead_count in 0_usize..40, radius in 0_i32..6) {
            let beading = strategy(420_000, radius).compute(thickness, bead_count);
            let sum: Coord = beading.bead_widths.iter().sum();
            prop_assert_eq!(sum + beading.left_over, thickness);
            prop_assert_eq!(beading.bead_widths.len(), beading.toolpath_locations.len());
            prop_assert!(beading.bead_widths.iter().all(|&w| w >= 0));
        }

        #[test]
        fn locations_follow_recurrence(thickness in 1_000_i64..20_000_000, radius in 0_i32..6) {
            let s = strategy(420_000, radius);
            let beading = s.compute(thickness, s.optimal_bead_count(thickness));
            if let (Some(&first_location), Some(&first_width)) =
                (beading.toolpath_locations.first(), beading.bead_widths.first())
            {
                prop_assert_eq!(first_location, first_width / 2);
            }
            for i in 1..beading.bead_count() {
                let w = &beading.bead_widths;
                let l = &beading.toolpath_locations;
                if beading.bead_count() != 2 {
                    prop_assert_eq!(l[i], l[i - 1] + (w[i - 1] + w[i]) / 2);
                }
                prop_assert!(l[i] > l[i - 1]);
            }
        }

        #[test]
        fn bead_count_is_monotonic(thickness in 0_i64..20_000_000) {
            let s = strategy(420_000, 2);
            prop_assert!(s.optimal_bead_count(thickness) <= s.optimal_bead_count(thickness + 1));
        }
    }
}
