mod context;
mod end_cap;
mod group;
mod join;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use self::group::OffsetGroup;
use crate::error::{OffsetError, Result};
use crate::math::polygon_2d::strip_collinear;
use crate::math::{round_point, Path64, Paths64, Point64, PointD};

/// Offsets smaller than this return the input unchanged; also the base of
/// the automatic arc tolerance.
pub const DEFAULT_ARC_TOLERANCE: f64 = 0.25;

/// How convex corners are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    /// Bevel cut `|delta|` from the vertex.
    #[default]
    Square,
    /// Circular arc of radius `|delta|`.
    Round,
    /// Sharp corner, squared once it would exceed the miter limit.
    Miter,
}

/// How path ends are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndType {
    /// Closed path, one side offset.
    #[default]
    Polygon,
    /// Open path closed end to end, both sides offset.
    Joined,
    /// Open path, both sides offset, ends cut flat.
    Butt,
    /// Open path, both sides offset, ends extended by `|delta|`.
    Square,
    /// Open path, both sides offset, ends capped with half circles.
    Round,
}

/// Unions offset output to remove overlaps. Supplied by the caller; the
/// engine has no boolean operations of its own.
pub trait PathMerger: fmt::Debug + Send + Sync {
    /// Returns the union of `paths`. `negative` is set when outer
    /// boundaries wind clockwise.
    fn union(&self, paths: Paths64, negative: bool) -> Paths64;
}

/// Engine settings, fixed between `execute` calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetOptions {
    /// Largest miter length as a multiple of `|delta|`.
    pub miter_limit: f64,
    /// Largest deviation of a round join from the true arc. `0` picks one
    /// from the offset distance.
    pub arc_tolerance: f64,
    /// Keep vertices lying on a straight edge.
    pub preserve_collinear: bool,
    /// Reverse the orientation of every output path.
    pub reverse_solution: bool,
    /// Merge all groups together instead of each group on its own.
    pub merge_groups: bool,
}

impl Default for OffsetOptions {
    fn default() -> Self {
        Self {
            miter_limit: 2.0,
            arc_tolerance: 0.0,
            preserve_collinear: false,
            reverse_solution: false,
            merge_groups: true,
        }
    }
}

/// Grows or shrinks closed polygons and outlines open paths on the integer
/// grid.
///
/// Paths are collected into groups, each with its own join and end style,
/// then [`PathOffset2D::execute`] offsets all groups by the same distance.
///
/// # Sign Convention
///
/// - Positive delta: outward (away from the interior of closed polygons)
/// - Negative delta: inward
/// - Open paths are always outlined on both sides by `|delta|`
#[derive(Debug, Clone, Default)]
pub struct PathOffset2D {
    options: OffsetOptions,
    groups: Vec<OffsetGroup>,
    merger: Option<Arc<dyn PathMerger>>,
}

impl PathOffset2D {
    /// Creates an engine with the given options and no paths.
    #[must_use]
    pub fn new(options: OffsetOptions) -> Self {
        Self {
            options,
            groups: Vec::new(),
            merger: None,
        }
    }

    /// Attaches the collaborator used to union the output.
    #[must_use]
    pub fn with_merger(mut self, merger: Arc<dyn PathMerger>) -> Self {
        self.merger = Some(merger);
        self
    }

    /// Adds a single path as its own group.
    pub fn add_path(&mut self, path: &[Point64], join_type: JoinType, end_type: EndType) {
        self.add_paths(&[path.to_vec()], join_type, end_type);
    }

    /// Adds `paths` as one group. Empty input adds nothing.
    pub fn add_paths(&mut self, paths: &[Path64], join_type: JoinType, end_type: EndType) {
        if paths.is_empty() {
            return;
        }
        self.groups
            .push(OffsetGroup::new(paths.to_vec(), join_type, end_type));
    }

    /// Adds a floating-point path, rounded onto the grid.
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::NonFiniteCoordinate` if any coordinate is NaN or
    /// infinite; nothing is added in that case.
    pub fn add_path_f64(&mut self, path: &[PointD], join_type: JoinType, end_type: EndType) -> Result<()> {
        self.add_paths_f64(&[path.to_vec()], join_type, end_type)
    }

    /// Adds floating-point paths as one group, rounded onto the grid.
    ///
    /// # Errors
    ///
    /// Returns `OffsetError::NonFiniteCoordinate` if any coordinate is NaN or
    /// infinite; nothing is added in that case.
    pub fn add_paths_f64(&mut self, paths: &[Vec<PointD>], join_type: JoinType, end_type: EndType) -> Result<()> {
        let mut converted = Vec::with_capacity(paths.len());
        for path in paths {
            let mut out = Vec::with_capacity(path.len());
            for pt in path {
                if !pt.x.is_finite() || !pt.y.is_finite() {
                    return Err(OffsetError::NonFiniteCoordinate { x: pt.x, y: pt.y }.into());
                }
                out.push(round_point(pt.x, pt.y));
            }
            converted.push(out);
        }
        self.add_paths(&converted, join_type, end_type);
        Ok(())
    }

    /// Drops every group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }

    /// Number of groups added so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Offsets every group by `delta` and returns the combined output.
    ///
    /// Degenerate paths (fewer than two distinct points) and zero-area
    /// polygon groups contribute nothing.
    #[must_use]
    pub fn execute(&self, delta: f64) -> Paths64 {
        if delta.abs() < DEFAULT_ARC_TOLERANCE {
            return self
                .groups
                .iter()
                .flat_map(|group| group.paths_in.iter().cloned())
                .collect();
        }

        let mut solution = Vec::new();
        let mut first_reversed = None;
        for group in &self.groups {
            let output = group.offset(&self.options, delta);
            if first_reversed.is_none() {
                first_reversed = Some(output.is_reversed);
            }
            match &self.merger {
                Some(merger) if !self.options.merge_groups => {
                    solution.extend(merger.union(output.paths, output.is_reversed));
                }
                _ => solution.extend(output.paths),
            }
        }

        if self.options.merge_groups {
            if let (Some(merger), Some(negative)) = (&self.merger, first_reversed) {
                solution = merger.union(solution, negative);
            }
        }

        if !self.options.preserve_collinear {
            solution = solution
                .iter()
                .map(|path| strip_collinear(path))
                .filter(|path| !path.is_empty())
                .collect();
        }
        if self.options.reverse_solution {
            for path in &mut solution {
                path.reverse();
            }
        }

        debug!(delta, groups = self.groups.len(), paths = solution.len(), "offset executed");
        solution
    }

    #[must_use]
    pub fn options(&self) -> &OffsetOptions {
        &self.options
    }

    #[must_use]
    pub fn miter_limit(&self) -> f64 {
        self.options.miter_limit
    }

    pub fn set_miter_limit(&mut self, miter_limit: f64) {
        self.options.miter_limit = miter_limit;
    }

    #[must_use]
    pub fn arc_tolerance(&self) -> f64 {
        self.options.arc_tolerance
    }

    pub fn set_arc_tolerance(&mut self, arc_tolerance: f64) {
        self.options.arc_tolerance = arc_tolerance;
    }

    #[must_use]
    pub fn preserve_collinear(&self) -> bool {
        self.options.preserve_collinear
    }

    pub fn set_preserve_collinear(&mut self, preserve_collinear: bool) {
        self.options.preserve_collinear = preserve_collinear;
    }

    #[must_use]
    pub fn reverse_solution(&self) -> bool {
        self.options.reverse_solution
    }

    pub fn set_reverse_solution(&mut self, reverse_solution: bool) {
        self.options.reverse_solution = reverse_solution;
    }

    #[must_use]
    pub fn merge_groups(&self) -> bool {
        self.options.merge_groups
    }

    pub fn set_merge_groups(&mut self, merge_groups: bool) {
        self.options.merge_groups = merge_groups;
    }
}
