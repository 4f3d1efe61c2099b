use tracing::{debug, trace};

use super::context::OffsetContext;
use super::end_cap::{offset_open_joined, offset_open_path, offset_polygon};
use super::join::build_normals;
use super::{EndType, JoinType, OffsetOptions};
use crate::math::polygon_2d::{lowest_path_index, signed_area_2d, strip_duplicates};
use crate::math::Paths64;

/// Paths sharing one join style and one end style.
#[derive(Debug, Clone)]
pub(super) struct OffsetGroup {
    pub paths_in: Paths64,
    pub join_type: JoinType,
    pub end_type: EndType,
}

/// Raw output of one group.
#[derive(Debug, Default)]
pub(super) struct GroupOutput {
    pub paths: Paths64,
    /// Outer boundaries wind clockwise.
    pub is_reversed: bool,
}

impl OffsetGroup {
    pub fn new(paths_in: Paths64, join_type: JoinType, end_type: EndType) -> Self {
        Self {
            paths_in,
            join_type,
            end_type,
        }
    }

    /// Offsets every path of the group by `delta`.
    pub fn offset(&self, options: &OffsetOptions, delta: f64) -> GroupOutput {
        let mut delta = if self.end_type == EndType::Polygon {
            delta
        } else {
            delta.abs()
        };

        // The path holding the lowest vertex is an outer boundary, so its
        // winding decides which way is outward for the whole group.
        let is_reversed = if self.end_type == EndType::Polygon {
            let Some(idx) = lowest_path_index(&self.paths_in) else {
                return GroupOutput::default();
            };
            let area = signed_area_2d(&self.paths_in[idx]);
            if area.abs() < f64::EPSILON {
                debug!(paths = self.paths_in.len(), "polygon group has no area, skipping");
                return GroupOutput::default();
            }
            area < 0.0
        } else {
            false
        };
        if is_reversed {
            delta = -delta;
        }

        let ctx = OffsetContext::new(options, self.join_type, self.end_type, delta);
        let is_closed = matches!(self.end_type, EndType::Polygon | EndType::Joined);

        let mut paths = Vec::with_capacity(self.paths_in.len());
        for path_in in &self.paths_in {
            let path = strip_duplicates(path_in, is_closed);
            if path.len() < 2 {
                trace!(points = path.len(), "degenerate path skipped");
                continue;
            }
            let norms = build_normals(&path);
            match self.end_type {
                EndType::Polygon => paths.push(offset_polygon(&ctx, &path, &norms)),
                EndType::Joined => paths.extend(offset_open_joined(&ctx, &path, &norms)),
                EndType::Butt | EndType::Square | EndType::Round => {
                    paths.push(offset_open_path(&ctx, self.end_type, &path, norms));
                }
            }
        }

        debug!(
            join_type = ?self.join_type,
            end_type = ?self.end_type,
            delta,
            paths_in = self.paths_in.len(),
            paths_out = paths.len(),
            "offset group"
        );
        GroupOutput { paths, is_reversed }
    }
}
