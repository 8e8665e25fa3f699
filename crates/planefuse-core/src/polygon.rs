//! 2D convex polygon primitives.
//!
//! Convex hulls, areas and convex-convex intersection used by the plane hull
//! builder and the plane matcher. Polygons are vertex lists in
//! counter-clockwise order without a repeated closing vertex.

use crate::math::{Real, Vec2};

/// Signed area of the triangle `(a, b, c)` times two; positive when `c` lies
/// left of the directed line `a -> b`.
#[inline]
fn cross(a: Vec2, b: Vec2, c: Vec2) -> Real {
    let ab = b - a;
    let ac = c - a;
    ab.x * ac.y - ab.y * ac.x
}

/// Andrew's monotone chain convex hull (CCW order, deduped).
///
/// Returns `None` when fewer than 3 distinct points remain or when all
/// points are collinear. Complexity: O(N log N).
pub fn convex_hull_2d(points: &[Vec2]) -> Option<Vec<Vec2>> {
    if points.len() < 3 {
        return None;
    }
    let mut pts: Vec<Vec2> = points.to_vec();
    pts.sort_by(|a, b| {
        match a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal) {
            std::cmp::Ordering::Equal => a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal),
            o => o,
        }
    });
    pts.dedup_by(|a, b| (*a - *b).norm() < 1e-12);
    if pts.len() < 3 {
        return None;
    }

    let mut lower: Vec<Vec2> = Vec::with_capacity(pts.len());
    for p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], *p) <= 0.0 {
            lower.pop();
        }
        lower.push(*p);
    }
    let mut upper: Vec<Vec2> = Vec::with_capacity(pts.len());
    for p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], *p) <= 0.0 {
            upper.pop();
        }
        upper.push(*p);
    }
    lower.pop();
    upper.pop();
    let mut hull = lower;
    hull.extend(upper);
    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}

/// Area of a simple polygon via the shoelace formula.
///
/// Returns the absolute area, so vertex orientation does not matter.
pub fn polygon_area(poly: &[Vec2]) -> Real {
    if poly.len() < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..poly.len() {
        let p = poly[i];
        let q = poly[(i + 1) % poly.len()];
        twice += p.x * q.y - q.x * p.y;
    }
    twice.abs() * 0.5
}

/// Intersection of the segment `(a, b)` with the directed line `c -> d`.
fn edge_intersection(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Vec2 {
    let r = b - a;
    let s = d - c;
    let denom = r.x * s.y - r.y * s.x;
    if denom.abs() < 1e-15 {
        // parallel within tolerance; either endpoint is on the clip line
        return b;
    }
    let t = ((c - a).x * s.y - (c - a).y * s.x) / denom;
    a + r * t
}

/// Sutherland-Hodgman clipping of a convex `subject` polygon against a
/// convex CCW `clip` polygon. Returns the (possibly empty) intersection.
pub fn clip_convex(subject: &[Vec2], clip: &[Vec2]) -> Vec<Vec2> {
    let mut output: Vec<Vec2> = subject.to_vec();
    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let c = clip[i];
        let d = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);
        for j in 0..input.len() {
            let cur = input[j];
            let prev = input[(j + input.len() - 1) % input.len()];
            let cur_inside = cross(c, d, cur) >= 0.0;
            let prev_inside = cross(c, d, prev) >= 0.0;
            if cur_inside {
                if !prev_inside {
                    output.push(edge_intersection(prev, cur, c, d));
                }
                output.push(cur);
            } else if prev_inside {
                output.push(edge_intersection(prev, cur, c, d));
            }
        }
    }
    output
}

/// Area of the intersection of two convex CCW polygons.
pub fn intersection_area(a: &[Vec2], b: &[Vec2]) -> Real {
    if a.len() < 3 || b.len() < 3 {
        return 0.0;
    }
    polygon_area(&clip_convex(a, b))
}
