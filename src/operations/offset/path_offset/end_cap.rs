use std::f64::consts::PI;

use super::context::OffsetContext;
use super::join::{build_normals, do_round, do_square, offset_point, perpendicular};
use super::EndType;
use crate::math::{Path64, Point64, Vector2};

/// Offsets one side of a closed path.
pub(super) fn offset_polygon(ctx: &OffsetContext, path: &[Point64], norms: &[Vector2]) -> Path64 {
    let mut out = Vec::with_capacity(path.len() * 2);
    let mut k = path.len() - 1;
    for j in 0..path.len() {
        offset_point(ctx, path, norms, j, &mut k, &mut out);
    }
    out
}

/// Treats an open path as closed and offsets both sides, giving an outer
/// and an inner ring.
pub(super) fn offset_open_joined(ctx: &OffsetContext, path: &[Point64], norms: &[Vector2]) -> [Path64; 2] {
    let outer = offset_polygon(ctx, path, norms);
    let reversed: Path64 = path.iter().rev().copied().collect();
    let reversed_norms = build_normals(&reversed);
    let inner = offset_polygon(ctx, &reversed, &reversed_norms);
    [outer, inner]
}

/// Offsets both sides of an open path into a single closed outline, capping
/// each end according to `end_type`.
pub(super) fn offset_open_path(
    ctx: &OffsetContext,
    end_type: EndType,
    path: &[Point64],
    mut norms: Vec<Vector2>,
) -> Path64 {
    let mut out = Vec::with_capacity(path.len() * 2 + 4);
    let high = path.len() - 1;

    cap(ctx, end_type, path, &norms, 0, &mut out);

    let mut k = 0;
    for i in 1..high {
        offset_point(ctx, path, &norms, i, &mut k, &mut out);
    }

    // Walk back along the other side with every normal flipped.
    for i in (1..=high).rev() {
        norms[i] = -norms[i - 1];
    }
    norms[0] = norms[high];

    cap(ctx, end_type, path, &norms, high, &mut out);

    let mut k = high;
    for i in (1..=high).rev() {
        offset_point(ctx, path, &norms, i, &mut k, &mut out);
    }
    out
}

fn cap(ctx: &OffsetContext, end_type: EndType, path: &[Point64], norms: &[Vector2], j: usize, out: &mut Path64) {
    match end_type {
        EndType::Butt => {
            out.push(perpendicular(&path[j], &norms[j], -ctx.delta));
            out.push(perpendicular(&path[j], &norms[j], ctx.delta));
        }
        EndType::Round => do_round(ctx, path, norms, j, j, PI, out),
        EndType::Square | EndType::Polygon | EndType::Joined => do_square(ctx, path, norms, j, j, out),
    }
}
