use super::{Path64, Point64, PointD, Vector2, TOLERANCE};

/// Computes the signed area of a closed path (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn signed_area_2d(path: &[Point64]) -> f64 {
    let n = path.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum: i128 = 0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += i128::from(path[i].x) * i128::from(path[j].y)
            - i128::from(path[j].x) * i128::from(path[i].y);
    }
    sum as f64 * 0.5
}

/// Removes consecutive duplicate points. For closed paths the closing
/// duplicate (last == first) is removed too.
#[must_use]
pub fn strip_duplicates(path: &[Point64], closed: bool) -> Path64 {
    let mut result: Path64 = Vec::with_capacity(path.len());
    for pt in path {
        if result.last() != Some(pt) {
            result.push(*pt);
        }
    }
    if closed {
        while result.len() > 1 && result.first() == result.last() {
            result.pop();
        }
    }
    result
}

/// Removes vertices lying on the line through their neighbours, including
/// 180° spikes. Treats the path as closed.
#[must_use]
pub fn strip_collinear(path: &[Point64]) -> Path64 {
    let mut result = strip_duplicates(path, true);
    let mut i = 0;
    while result.len() >= 3 && i < result.len() {
        let n = result.len();
        let prev = result[(i + n - 1) % n];
        let next = result[(i + 1) % n];
        if is_collinear(&prev, &result[i], &next) {
            result.remove(i);
            // Removing a vertex can make its predecessor collinear.
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
    if result.len() < 3 {
        result.clear();
    }
    result
}

/// Exact collinearity test on grid points.
#[must_use]
pub fn is_collinear(a: &Point64, b: &Point64, c: &Point64) -> bool {
    let abx = i128::from(b.x - a.x);
    let aby = i128::from(b.y - a.y);
    let bcx = i128::from(c.x - b.x);
    let bcy = i128::from(c.y - b.y);
    abx * bcy - aby * bcx == 0
}

/// Returns the index of the path owning the lowest vertex (largest y,
/// then smallest x). That path is always an outer boundary.
#[must_use]
pub fn lowest_path_index(paths: &[Path64]) -> Option<usize> {
    let mut best: Option<(usize, Point64)> = None;
    for (idx, path) in paths.iter().enumerate() {
        for pt in path {
            let better = match best {
                None => true,
                Some((_, lp)) => pt.y > lp.y || (pt.y == lp.y && pt.x < lp.x),
            };
            if better {
                best = Some((idx, *pt));
            }
        }
    }
    best.map(|(idx, _)| idx)
}

/// Unit normal of the edge `a -> b`, pointing to the right of the walking
/// direction (outward for a counter-clockwise polygon). Zero for a
/// zero-length edge.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn edge_unit_normal(a: &Point64, b: &Point64) -> Vector2 {
    if a == b {
        return Vector2::zeros();
    }
    let dx = (b.x - a.x) as f64;
    let dy = (b.y - a.y) as f64;
    let inv_len = 1.0 / dx.hypot(dy);
    Vector2::new(dy * inv_len, -dx * inv_len)
}

/// Sine of the turn at a vertex, from the normals of its outgoing and
/// incoming edges. Positive for a left turn (convex on a CCW path).
#[must_use]
pub fn turn_sine(outgoing: &Vector2, incoming: &Vector2) -> f64 {
    outgoing.y * incoming.x - incoming.y * outgoing.x
}

/// Intersection of the infinite lines `a0-a1` and `b0-b1`, or `None` when
/// they are parallel.
#[must_use]
pub fn line_line_intersect_2d(a0: &PointD, a1: &PointD, b0: &PointD, b1: &PointD) -> Option<PointD> {
    let da = *a1 - *a0;
    let db = *b1 - *b0;
    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() < TOLERANCE {
        return None;
    }
    let d = *b0 - *a0;
    let t = (d.x * db.y - d.y * db.x) / cross;
    Some(*a0 + da * t)
}

/// Reflects `pt` through `pivot`.
#[must_use]
pub fn reflect_point(pt: &PointD, pivot: &PointD) -> PointD {
    PointD::new(pivot.x + (pivot.x - pt.x), pivot.y + (pivot.y - pt.y))
}
