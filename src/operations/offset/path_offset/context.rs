use std::f64::consts::PI;

use super::{EndType, JoinType, OffsetOptions, DEFAULT_ARC_TOLERANCE};

/// Scalars derived once per group offset and threaded through the join and
/// end-cap builders. Never outlives a single `execute` call.
#[derive(Debug, Clone, Copy)]
pub(super) struct OffsetContext {
    /// Signed distance for the group, already flipped for reversed polygons.
    pub delta: f64,
    pub abs_delta: f64,
    pub join_type: JoinType,
    /// Miter when the normals' cosine exceeds this, square otherwise.
    pub miter_cos_threshold: f64,
    /// Round-join tessellation density.
    pub steps_per_rad: f64,
}

impl OffsetContext {
    pub fn new(options: &OffsetOptions, join_type: JoinType, end_type: EndType, delta: f64) -> Self {
        let abs_delta = delta.abs();

        let temp_lim = if options.miter_limit <= 1.0 {
            2.0
        } else {
            2.0 / (options.miter_limit * options.miter_limit)
        };

        let steps_per_rad = if join_type == JoinType::Round || end_type == EndType::Round {
            let arc_tolerance = if options.arc_tolerance > 0.01 {
                options.arc_tolerance
            } else {
                (2.0 + abs_delta).log10() * DEFAULT_ARC_TOLERANCE
            };
            let steps_per_360 = (PI / (1.0 - arc_tolerance / abs_delta).clamp(-1.0, 1.0).acos())
                .min(abs_delta * PI);
            steps_per_360 / (2.0 * PI)
        } else {
            0.0
        };

        Self {
            delta,
            abs_delta,
            join_type,
            miter_cos_threshold: temp_lim - 1.0,
            steps_per_rad,
        }
    }
}
