use super::{Beading, BeadingConfig, BeadingStrategy, BeadingStrategyPtr, FIRST_WALL_CONTOUR_MARKED_WIDTH};
use crate::math::Coord;

/// Wraps a strategy and reserves two extra entries that mark where the
/// original outer contour lies.
///
/// Bead counts of 2 or more gain two markers; everything about transition
/// geometry is left to the parent.
#[derive(Debug)]
pub struct OuterWallContourStrategy {
    config: BeadingConfig,
    parent: BeadingStrategyPtr,
}

impl OuterWallContourStrategy {
    /// Wraps `parent`. The parent stays shared and is never mutated.
    #[must_use]
    pub fn new(parent: BeadingStrategyPtr) -> Self {
        Self {
            config: parent.config().clone(),
            parent,
        }
    }

    /// The wrapped strategy.
    #[must_use]
    pub fn parent(&self) -> &BeadingStrategyPtr {
        &self.parent
    }
}

impl BeadingStrategy for OuterWallContourStrategy {
    fn config(&self) -> &BeadingConfig {
        &self.config
    }

    fn name(&self) -> String {
        format!("OuterWallContourStrategy+{}", self.parent.name())
    }

    fn compute(&self, thickness: Coord, bead_count: usize) -> Beading {
        if bead_count <= 1 {
            return self.parent.compute(thickness, bead_count);
        }

        debug_assert!(bead_count >= 3, "a marked beading needs at least 3 entries");
        let mut ret = self.parent.compute(thickness, bead_count.saturating_sub(2));
        if ret.toolpath_locations.len() <= 1 {
            return ret;
        }

        let first_edge = ret.toolpath_locations[0] + ret.bead_widths[0] / 2;
        ret.toolpath_locations.insert(1, first_edge);
        ret.bead_widths.insert(1, FIRST_WALL_CONTOUR_MARKED_WIDTH);

        let last = ret.toolpath_locations.len() - 1;
        let last_edge = ret.toolpath_locations[last] - ret.bead_widths[last] / 2;
        ret.toolpath_locations.insert(last, last_edge);
        ret.bead_widths.insert(last, FIRST_WALL_CONTOUR_MARKED_WIDTH);
        ret
    }

    fn optimal_bead_count(&self, thickness: Coord) -> usize {
        let parent_bead_count = self.parent.optimal_bead_count(thickness);
        if parent_bead_count <= 1 {
            return parent_bead_count;
        }
        parent_bead_count + 2
    }

    fn optimal_thickness(&self, bead_count: usize) -> Coord {
        if bead_count <= 1 {
            return self.parent.optimal_thickness(bead_count);
        }
        self.parent.optimal_thickness(bead_count - 2) + 2
    }

    fn transition_thickness(&self, lower_bead_count: usize) -> Coord {
        match lower_bead_count {
            0 | 1 => self.parent.transition_thickness(lower_bead_count),
            2 | 3 => self.parent.transition_thickness(1),
            _ => self.parent.transition_thickness(lower_bead_count - 2),
        }
    }

    fn transitioning_length(&self, lower_bead_count: usize) -> Coord {
        self.parent.transitioning_length(lower_bead_count)
    }

    fn transition_anchor_pos(&self, lower_bead_count: usize) -> f64 {
        self.parent.transition_anchor_pos(lower_bead_count)
    }

    fn nonlinear_thicknesses(&self, lower_bead_count: usize) -> Vec<Coord> {
        self.parent.nonlinear_thicknesses(lower_bead_count)
    }
}
