use std::f64::consts::PI;

use super::context::OffsetContext;
use super::JoinType;
use crate::math::polygon_2d::{edge_unit_normal, line_line_intersect_2d, reflect_point, turn_sine};
use crate::math::{round_point, to_point_d, Path64, Point64, PointD, Vector2};

/// Turns with a sine below this (and a positive cosine) count as straight.
const ALMOST_ZERO_SINE: f64 = 0.001;

/// Builds one unit normal per edge; the last entry belongs to the closing
/// edge back to the first point.
pub(super) fn build_normals(path: &[Point64]) -> Vec<Vector2> {
    let n = path.len();
    (0..n)
        .map(|i| edge_unit_normal(&path[i], &path[(i + 1) % n]))
        .collect()
}

/// `pt` moved `delta` along `norm`.
pub(super) fn perpendicular(pt: &Point64, norm: &Vector2, delta: f64) -> Point64 {
    let p = to_point_d(pt) + norm * delta;
    round_point(p.x, p.y)
}

fn perpendicular_d(pt: &Point64, norm: &Vector2, delta: f64) -> PointD {
    to_point_d(pt) + norm * delta
}

fn avg_unit_vector(a: &Vector2, b: &Vector2) -> Vector2 {
    let sum = a + b;
    let len = sum.norm();
    if len < 0.001 {
        return Vector2::zeros();
    }
    sum / len
}

/// Emits the offset geometry for vertex `j`, whose incoming edge normal is
/// `norms[k]`. Leaves `k` pointing at `j` for the next vertex.
pub(super) fn offset_point(
    ctx: &OffsetContext,
    path: &[Point64],
    norms: &[Vector2],
    j: usize,
    k: &mut usize,
    out: &mut Path64,
) {
    if path[j] == path[*k] {
        *k = j;
        return;
    }

    let sin_a = turn_sine(&norms[j], &norms[*k]).clamp(-1.0, 1.0);
    let cos_a = norms[j].dot(&norms[*k]);
    let almost_no_angle = sin_a.abs() < ALMOST_ZERO_SINE && cos_a > 0.0;

    if almost_no_angle || sin_a * ctx.delta < 0.0 {
        // Straight or concave: the two edge offsets overlap.
        let p1 = perpendicular(&path[j], &norms[*k], ctx.delta);
        let p2 = perpendicular(&path[j], &norms[j], ctx.delta);
        out.push(p1);
        if p1 != p2 {
            // The original vertex keeps the overlap loop tidy for clipping.
            if !almost_no_angle {
                out.push(path[j]);
            }
            out.push(p2);
        }
    } else {
        match ctx.join_type {
            JoinType::Round => do_round(ctx, path, norms, j, *k, sin_a.atan2(cos_a), out),
            JoinType::Miter if cos_a > ctx.miter_cos_threshold => {
                do_miter(ctx, path, norms, j, *k, cos_a, out);
            }
            JoinType::Miter | JoinType::Square => do_square(ctx, path, norms, j, *k, out),
        }
    }
    *k = j;
}

/// Bevels the corner at `j` with a cut perpendicular to the corner
/// bisector, `|delta|` away from the vertex. With `j == k` this squares off
/// a path end, extending it by `|delta|`.
pub(super) fn do_square(
    ctx: &OffsetContext,
    path: &[Point64],
    norms: &[Vector2],
    j: usize,
    k: usize,
    out: &mut Path64,
) {
    let vec = if j == k {
        Vector2::new(norms[j].y, -norms[j].x)
    } else {
        avg_unit_vector(
            &Vector2::new(-norms[k].y, norms[k].x),
            &Vector2::new(norms[j].y, -norms[j].x),
        )
    };

    let pt_q = to_point_d(&path[j]) + vec * ctx.abs_delta;
    let pt1 = pt_q + Vector2::new(vec.y, -vec.x) * ctx.delta;
    let pt2 = pt_q + Vector2::new(-vec.y, vec.x) * ctx.delta;
    let pt3 = perpendicular_d(&path[k], &norms[k], ctx.delta);
    let pt4 = if j == k {
        pt3 + vec * ctx.delta
    } else {
        perpendicular_d(&path[j], &norms[k], ctx.delta)
    };

    let Some(pt) = line_line_intersect_2d(&pt1, &pt2, &pt3, &pt4) else {
        // A full reversal has no bisector; fall back to the edge offsets.
        out.push(perpendicular(&path[j], &norms[k], ctx.delta));
        out.push(perpendicular(&path[j], &norms[j], ctx.delta));
        return;
    };
    let reflected = reflect_point(&pt, &pt_q);

    if j == k {
        out.push(round_point(reflected.x, reflected.y));
        out.push(round_point(pt.x, pt.y));
    } else {
        out.push(round_point(pt.x, pt.y));
        out.push(round_point(reflected.x, reflected.y));
    }
}

/// Extends both offset edges to their intersection.
pub(super) fn do_miter(
    ctx: &OffsetContext,
    path: &[Point64],
    norms: &[Vector2],
    j: usize,
    k: usize,
    cos_a: f64,
    out: &mut Path64,
) {
    let q = ctx.delta / (cos_a + 1.0);
    let p = to_point_d(&path[j]) + (norms[k] + norms[j]) * q;
    out.push(round_point(p.x, p.y));
}

/// Sweeps an arc of radius `|delta|` around vertex `j`, from the incoming
/// edge offset through `angle` radians to the outgoing one. With `j == k`
/// this caps a path end with a half circle.
pub(super) fn do_round(
    ctx: &OffsetContext,
    path: &[Point64],
    norms: &[Vector2],
    j: usize,
    k: usize,
    angle: f64,
    out: &mut Path64,
) {
    let pt = to_point_d(&path[j]);
    let mut offset_vec = norms[k] * ctx.delta;
    if j == k {
        offset_vec = -offset_vec;
    }
    out.push(round_point(pt.x + offset_vec.x, pt.y + offset_vec.y));

    // Skip 180° concave spikes; shallow turns connect directly.
    if angle > -PI + 0.01 {
        let steps = arc_steps(ctx.steps_per_rad, angle);
        if steps > 1 {
            #[allow(clippy::cast_precision_loss)]
            let (step_sin, step_cos) = (angle / steps as f64).sin_cos();
            for _ in 1..steps {
                offset_vec = Vector2::new(
                    offset_vec.x * step_cos - step_sin * offset_vec.y,
                    offset_vec.x * step_sin + offset_vec.y * step_cos,
                );
                out.push(round_point(pt.x + offset_vec.x, pt.y + offset_vec.y));
            }
        }
    }
    out.push(perpendicular(&path[j], &norms[j], ctx.delta));
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn arc_steps(steps_per_rad: f64, angle: f64) -> usize {
    (steps_per_rad * angle.abs()).ceil().max(1.0) as usize
}

#[cfg(test)]
mod tests {
    use super::super::{EndType, OffsetOptions};
    use super::*;

    fn ctx(join_type: JoinType, delta: f64) -> OffsetContext {
        OffsetContext::new(&OffsetOptions::default(), join_type, EndType::Polygon, delta)
    }

    fn ccw_square() -> Path64 {
        vec![
            Point64::new(0, 0),
            Point64::new(100, 0),
            Point64::new(100, 100),
            Point64::new(0, 100),
        ]
    }

    #[test]
    fn normals_point_outward_for_ccw() {
        let norms = build_normals(&ccw_square());
        assert_eq!(norms.len(), 4);
        assert!((norms[0].y + 1.0).abs() < 1e-12);
        assert!((norms[1].x - 1.0).abs() < 1e-12);
        assert!((norms[2].y - 1.0).abs() < 1e-12);
        assert!((norms[3].x + 1.0).abs() < 1e-12);
    }

    #[test]
    fn miter_corner_is_exact() {
        let path = ccw_square();
        let norms = build_normals(&path);
        let mut out = Vec::new();
        let mut k = 3;
        offset_point(&ctx(JoinType::Miter, 10.0), &path, &norms, 0, &mut k, &mut out);
        assert_eq!(out, vec![Point64::new(-10, -10)]);
        assert_eq!(k, 0);
    }

    #[test]
    fn square_corner_bevels() {
        let path = ccw_square();
        let norms = build_normals(&path);
        let mut out = Vec::new();
        let mut k = 3;
        offset_point(&ctx(JoinType::Square, 10.0), &path, &norms, 0, &mut k, &mut out);
        assert_eq!(out, vec![Point64::new(-10, -4), Point64::new(-4, -10)]);
    }

    #[test]
    fn round_corner_stays_on_circle() {
        let path = ccw_square();
        let norms = build_normals(&path);
        let mut out = Vec::new();
        let mut k = 3;
        offset_point(&ctx(JoinType::Round, 10.0), &path, &norms, 0, &mut k, &mut out);
        assert!(out.len() > 2);
        assert_eq!(out.first(), Some(&Point64::new(-10, 0)));
        assert_eq!(out.last(), Some(&Point64::new(0, -10)));
        for p in &out {
            let r = to_point_d(p).coords.norm();
            assert!((r - 10.0).abs() < 1.0, "radius {r}");
        }
    }

    #[test]
    fn inset_corner_keeps_vertex() {
        let path = ccw_square();
        let norms = build_normals(&path);
        let mut out = Vec::new();
        let mut k = 3;
        offset_point(&ctx(JoinType::Miter, -10.0), &path, &norms, 0, &mut k, &mut out);
        assert_eq!(
            out,
            vec![Point64::new(10, 0), Point64::new(0, 0), Point64::new(0, 10)]
        );
    }

    #[test]
    fn straight_vertex_emits_one_point() {
        let path = vec![Point64::new(0, 0), Point64::new(50, 0), Point64::new(100, 0)];
        let norms = build_normals(&path);
        let mut out = Vec::new();
        let mut k = 0;
        offset_point(&ctx(JoinType::Miter, 10.0), &path, &norms, 1, &mut k, &mut out);
        assert_eq!(out, vec![Point64::new(50, -10)]);
    }

    #[test]
    fn arc_steps_at_least_one() {
        assert_eq!(arc_steps(0.0, 1.0), 1);
        assert_eq!(arc_steps(2.0, PI), 7);
    }
}
