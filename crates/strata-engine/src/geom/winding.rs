//! Signed winding contributions of single segments.
//!
//! A horizontal ray is cast from `(x, y)` towards +x. Each crossing adds +1
//! when the segment heads up (decreasing y) and -1 when it heads down.
//! Crossings exactly at a segment endpoint count half, so that the two
//! segments sharing the vertex add up to one crossing. Horizontal or
//! degenerate segments contribute zero.
//!
//! `f64::INFINITY` is returned when the point lies exactly on a straight
//! segment; callers treat it as "contained".

use std::f64::consts::PI;

use super::arc::{angle_in_range, normalized_range};
use super::curve::{cubic_at, cubic_extrema, cubic_root_at, quadratic_at, quadratic_extremum, quadratic_root_at};
use super::{normalize_radian, TAU};

pub fn line(x0: f64, y0: f64, x1: f64, y1: f64, x: f64, y: f64) -> f64 {
    if (y > y0 && y > y1) || (y < y0 && y < y1) {
        return 0.0;
    }
    if y1 == y0 {
        return 0.0;
    }
    let t = (y - y0) / (y1 - y0);
    let mut dir = if y1 < y0 { 1.0 } else { -1.0 };
    if t == 1.0 || t == 0.0 {
        dir *= 0.5;
    }
    let x_ = t * (x1 - x0) + x0;
    if x_ == x {
        return f64::INFINITY;
    }
    if x_ > x { dir } else { 0.0 }
}

#[allow(clippy::too_many_arguments)]
pub fn cubic(
    x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64,
    x: f64, y: f64,
) -> f64 {
    if (y > y0 && y > y1 && y > y2 && y > y3) || (y < y0 && y < y1 && y < y2 && y < y3) {
        return 0.0;
    }
    let roots = cubic_root_at(y0, y1, y2, y3, y);
    if roots.is_empty() {
        return 0.0;
    }

    let mut extrema = cubic_extrema(y0, y1, y2, y3);
    if extrema.len() == 2 && extrema[1] < extrema[0] {
        extrema.swap(0, 1);
    }
    let ey: Vec<f64> = extrema.iter().map(|t| cubic_at(y0, y1, y2, y3, *t)).collect();

    let mut w = 0.0;
    for t in roots {
        let unit = if t == 0.0 || t == 1.0 { 0.5 } else { 1.0 };
        let x_ = cubic_at(x0, x1, x2, x3, t);
        if x_ < x {
            continue;
        }
        // Direction of the monotonic piece containing `t`.
        let (from, to) = match extrema.len() {
            2 if t < extrema[0] => (y0, ey[0]),
            2 if t < extrema[1] => (ey[0], ey[1]),
            2 => (ey[1], y3),
            1 if t < extrema[0] => (y0, ey[0]),
            1 => (ey[0], y3),
            _ => (y0, y3),
        };
        w += if to < from { unit } else { -unit };
    }
    w
}

pub fn quadratic(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) -> f64 {
    if (y > y0 && y > y1 && y > y2) || (y < y0 && y < y1 && y < y2) {
        return 0.0;
    }
    let roots = quadratic_root_at(y0, y1, y2, y);
    if roots.is_empty() {
        return 0.0;
    }

    let t_ext = quadratic_extremum(y0, y1, y2);
    if (0.0..=1.0).contains(&t_ext) {
        let y_ = quadratic_at(y0, y1, y2, t_ext);
        let mut w = 0.0;
        for t in roots {
            let unit = if t == 0.0 || t == 1.0 { 0.5 } else { 1.0 };
            let x_ = quadratic_at(x0, x1, x2, t);
            if x_ < x {
                continue;
            }
            let (from, to) = if t < t_ext { (y0, y_) } else { (y_, y2) };
            w += if to < from { unit } else { -unit };
        }
        w
    } else {
        let t = roots[0];
        let unit = if t == 0.0 || t == 1.0 { 0.5 } else { 1.0 };
        let x_ = quadratic_at(x0, x1, x2, t);
        if x_ < x {
            return 0.0;
        }
        if y2 < y0 { unit } else { -unit }
    }
}

/// Winding of a circular arc. Ellipses are handled by the caller scaling x.
///
/// Crossings at the arc's own endpoints count half. A ray that only touches
/// the circle contributes nothing unless the touch point is an endpoint; then
/// the arc leaves (or reaches) it vertically and counts half in that direction.
#[allow(clippy::too_many_arguments)]
pub fn arc(cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool, x: f64, y: f64) -> f64 {
    let y = y - cy;
    if y > r || y < -r {
        return 0.0;
    }
    let diff = (start - end).abs();
    if diff < 1e-4 {
        return 0.0;
    }
    let d2 = r * r - y * y;
    let tangent = d2 <= TANGENT_EPSILON * r * r;
    let tmp = d2.max(0.0).sqrt();
    let roots = [-tmp, tmp];

    let base_dir = if anticlockwise { 1.0 } else { -1.0 };
    if diff >= TAU - 1e-4 {
        if tangent {
            return 0.0;
        }
        return if x >= roots[0] + cx && x <= roots[1] + cx { base_dir } else { 0.0 };
    }

    let start_angle = normalize_radian(start);
    let end_angle = normalize_radian(end);

    if tangent {
        if cx <= x {
            return 0.0;
        }
        // Bottom of the circle (y down) is PI/2, top is 3PI/2.
        let (angle, leaving) = if y > 0.0 { (PI / 2.0, 1.0) } else { (PI * 1.5, -1.0) };
        return if angles_meet(angle, start_angle) {
            0.5 * leaving
        } else if angles_meet(angle, end_angle) {
            -0.5 * leaving
        } else {
            0.0
        };
    }

    let (s, e) = normalized_range(start, end, anticlockwise);
    let mut w = 0.0;
    for x_ in roots {
        if x_ + cx > x {
            let mut angle = y.atan2(x_);
            if angle < 0.0 {
                angle += TAU;
            }
            let at_end = angles_meet(angle, start_angle) || angles_meet(angle, end_angle);
            if at_end || angle_in_range(angle, s, e) {
                let mut dir = base_dir;
                if angle > PI / 2.0 && angle < PI * 1.5 {
                    dir = -dir;
                }
                w += if at_end { 0.5 * dir } else { dir };
            }
        }
    }
    w
}

const TANGENT_EPSILON: f64 = 1e-12;
const ANGLE_EPSILON: f64 = 1e-9;

/// Whether two angles in `[0, TAU)` name the same direction.
#[inline]
fn angles_meet(a: f64, b: f64) -> bool {
    let d = (a - b).abs();
    d < ANGLE_EPSILON || TAU - d < ANGLE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_line_contributes_nothing() {
        assert_eq!(line(0.0, 5.0, 10.0, 5.0, -1.0, 5.0), 0.0);
    }

    #[test]
    fn line_direction_sign() {
        assert_eq!(line(5.0, 10.0, 5.0, 0.0, 0.0, 5.0), 1.0);
        assert_eq!(line(5.0, 0.0, 5.0, 10.0, 0.0, 5.0), -1.0);
        // Crossing to the left of the point does not count.
        assert_eq!(line(5.0, 0.0, 5.0, 10.0, 6.0, 5.0), 0.0);
    }

    #[test]
    fn endpoint_crossings_count_half() {
        assert_eq!(line(5.0, 0.0, 5.0, 10.0, 0.0, 0.0), -0.5);
        assert_eq!(line(5.0, 0.0, 5.0, 10.0, 0.0, 10.0), -0.5);
    }

    #[test]
    fn point_on_line_is_infinite() {
        assert!(line(0.0, 0.0, 10.0, 10.0, 5.0, 5.0).is_infinite());
    }

    #[test]
    fn cubic_arch_crossed_twice_cancels() {
        // Arch from (0,0) up to y=-75 and back; ray at y=-10 from far left.
        let w = cubic(0.0, 0.0, 0.0, -100.0, 100.0, -100.0, 100.0, 0.0, -50.0, -10.0);
        assert_eq!(w, 0.0);
        // From inside the arch only the right leg counts (heading down).
        let w = cubic(0.0, 0.0, 0.0, -100.0, 100.0, -100.0, 100.0, 0.0, 50.0, -10.0);
        assert_eq!(w, -1.0);
    }

    #[test]
    fn monotonic_cubic_direction() {
        let w = cubic(10.0, 0.0, 10.0, 3.0, 10.0, 6.0, 10.0, 10.0, 0.0, 5.0);
        assert_eq!(w, -1.0);
    }

    #[test]
    fn quadratic_arch() {
        let w = quadratic(0.0, 0.0, 50.0, -100.0, 100.0, 0.0, 50.0, -10.0);
        assert_eq!(w, -1.0);
        assert_eq!(quadratic(0.0, 0.0, 50.0, -100.0, 100.0, 0.0, -10.0, -10.0), 0.0);
    }

    #[test]
    fn full_circle_winding() {
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, TAU, false, 0.0, 0.0), -1.0);
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, TAU, true, 0.0, 0.0), 1.0);
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, TAU, false, 20.0, 0.0), 0.0);
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, TAU, false, 0.0, 11.0), 0.0);
    }

    #[test]
    fn half_circle_winding() {
        // Lower half (y down), clockwise from 0 to π: right side heads down.
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, PI, false, 0.0, 5.0), -1.0);
        // Upper half is not crossed by a ray at y = 5.
        assert_eq!(arc(0.0, 0.0, 10.0, PI, TAU - 0.01, false, 0.0, 5.0), 0.0);
    }

    #[test]
    fn tangent_touch_contributes_nothing() {
        // Ray grazes the bottom of the circle inside the arc's sweep.
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, PI, false, -20.0, 10.0), 0.0);
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, TAU, false, 0.0, 10.0), 0.0);
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, TAU, true, -20.0, -10.0), 0.0);
    }

    #[test]
    fn tangent_at_an_endpoint_counts_half() {
        // Starts at the bottom and leaves heading up.
        assert_eq!(arc(0.0, 0.0, 5.0, PI / 2.0, 0.0, true, -5.0, 5.0), 0.5);
        // Ends at the bottom, arriving heading down.
        assert_eq!(arc(0.0, 0.0, 5.0, 0.0, PI / 2.0, false, -5.0, 5.0), -0.5);
    }

    #[test]
    fn endpoint_crossings_on_arcs_count_half() {
        // Lower half circle: leaves (10,0) heading down, reaches (-10,0) heading up.
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, PI, false, 0.0, 0.0), -0.5);
        assert_eq!(arc(0.0, 0.0, 10.0, 0.0, PI, false, -20.0, 0.0), 0.0);
    }
}
