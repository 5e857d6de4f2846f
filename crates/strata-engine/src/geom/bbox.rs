//! Axis-aligned bounds of single segments.
//!
//! Each function returns `(min, max)` corners. Bounds are the union of the
//! endpoints and the curve's interior extrema.

use std::f64::consts::PI;

use crate::coords::Vec2;

use super::curve::{cubic_at, cubic_extrema, quadratic_at, quadratic_extremum};
use super::TAU;

pub fn from_points(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
    let (first, rest) = points.split_first()?;
    Some(rest.iter().fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
}

#[inline]
pub fn from_line(x0: f64, y0: f64, x1: f64, y1: f64) -> (Vec2, Vec2) {
    (
        Vec2::new(x0.min(x1), y0.min(y1)),
        Vec2::new(x0.max(x1), y0.max(y1)),
    )
}

#[allow(clippy::too_many_arguments)]
pub fn from_cubic(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> (Vec2, Vec2) {
    let mut min = Vec2::new(x0.min(x3), y0.min(y3));
    let mut max = Vec2::new(x0.max(x3), y0.max(y3));

    for t in cubic_extrema(x0, x1, x2, x3) {
        let x = cubic_at(x0, x1, x2, x3, t);
        min.x = min.x.min(x);
        max.x = max.x.max(x);
    }
    for t in cubic_extrema(y0, y1, y2, y3) {
        let y = cubic_at(y0, y1, y2, y3, t);
        min.y = min.y.min(y);
        max.y = max.y.max(y);
    }
    (min, max)
}

pub fn from_quadratic(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> (Vec2, Vec2) {
    let tx = quadratic_extremum(x0, x1, x2).clamp(0.0, 1.0);
    let ty = quadratic_extremum(y0, y1, y2).clamp(0.0, 1.0);
    let x = quadratic_at(x0, x1, x2, tx);
    let y = quadratic_at(y0, y1, y2, ty);
    (
        Vec2::new(x0.min(x2).min(x), y0.min(y2).min(y)),
        Vec2::new(x0.max(x2).max(x), y0.max(y2).max(y)),
    )
}

/// Bounds of a circular/elliptical arc (axis-aligned ellipse).
///
/// A sweep of at least 2π, or one that is a whole multiple of 2π within
/// 1e-4, is a full ellipse.
pub fn from_arc(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start: f64,
    end: f64,
    anticlockwise: bool,
) -> (Vec2, Vec2) {
    let diff = (start - end).abs();
    if diff >= TAU || (diff % TAU < 1e-4 && diff > 1e-4) {
        return (
            Vec2::new(cx - rx, cy - ry),
            Vec2::new(cx + rx, cy + ry),
        );
    }

    let at = |a: f64| Vec2::new(a.cos() * rx + cx, a.sin() * ry + cy);
    let p0 = at(start);
    let p1 = at(end);
    let mut min = p0.min(p1);
    let mut max = p0.max(p1);

    // Normalize so that the arc runs clockwise from `start` to `end` with
    // 0 <= start < 2π and start < end <= start + 2π.
    let (mut s, mut e) = if anticlockwise { (end, start) } else { (start, end) };
    s %= TAU;
    if s < 0.0 {
        s += TAU;
    }
    e %= TAU;
    if e < 0.0 {
        e += TAU;
    }
    if s > e {
        e += TAU;
    }

    let mut angle = 0.0;
    while angle < e {
        if angle > s {
            let p = at(angle);
            min = min.min(p);
            max = max.max(p);
        }
        angle += PI / 2.0;
    }
    (min, max)
}
