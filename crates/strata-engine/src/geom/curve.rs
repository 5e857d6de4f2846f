//! Bézier curve math.
//!
//! Functions operate on one axis at a time (`p0..p3` are x or y
//! coordinates) except for the projection helpers, which take full points.

use smallvec::SmallVec;

use super::{is_around_zero, is_not_around_zero, EPSILON};

/// Up to three parameter values in `[0, 1]`.
pub type Roots = SmallVec<[f64; 3]>;

/// Up to two parameter values in `[0, 1]`.
pub type Extrema = SmallVec<[f64; 2]>;

#[inline]
fn in_unit(t: f64) -> bool {
    (0.0..=1.0).contains(&t)
}

// ── cubic ─────────────────────────────────────────────────────────────────

#[inline]
pub fn cubic_at(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let ot = 1.0 - t;
    ot * ot * (ot * p0 + 3.0 * t * p1) + t * t * (t * p3 + 3.0 * ot * p2)
}

#[inline]
pub fn cubic_derivative_at(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let ot = 1.0 - t;
    3.0 * (((p1 - p0) * ot + 2.0 * (p2 - p1) * t) * ot + (p3 - p2) * t * t)
}

/// Parameters in `[0, 1]` where the cubic equals `val`.
///
/// Uses Shengjin's discriminant method; falls back to the quadratic /
/// linear formula when the leading coefficients vanish.
pub fn cubic_root_at(p0: f64, p1: f64, p2: f64, p3: f64, val: f64) -> Roots {
    let a = p3 + 3.0 * (p1 - p2) - p0;
    let b = 3.0 * (p2 - p1 * 2.0 + p0);
    let c = 3.0 * (p1 - p0);
    let d = p0 - val;

    let big_a = b * b - 3.0 * a * c;
    let big_b = b * c - 9.0 * a * d;
    let big_c = c * c - 3.0 * b * d;

    let mut roots = Roots::new();

    if is_around_zero(a) {
        for t in quadratic_solve(b, c, d) {
            roots.push(t);
        }
        return roots;
    }

    if is_around_zero(big_a) && is_around_zero(big_b) {
        if is_around_zero(b) {
            roots.push(0.0);
        } else {
            let t1 = -c / b;
            if in_unit(t1) {
                roots.push(t1);
            }
        }
        return roots;
    }

    let disc = big_b * big_b - 4.0 * big_a * big_c;

    if is_around_zero(disc) {
        let k = big_b / big_a;
        let t1 = -b / a + k;
        let t2 = -k / 2.0;
        if in_unit(t1) {
            roots.push(t1);
        }
        if in_unit(t2) {
            roots.push(t2);
        }
    } else if disc > 0.0 {
        let disc_sqrt = disc.sqrt();
        let y1 = big_a * b + 1.5 * a * (-big_b + disc_sqrt);
        let y2 = big_a * b + 1.5 * a * (-big_b - disc_sqrt);
        let t1 = (-b - (y1.cbrt() + y2.cbrt())) / (3.0 * a);
        if in_unit(t1) {
            roots.push(t1);
        }
    } else {
        let t = (2.0 * big_a * b - 3.0 * a * big_b) / (2.0 * (big_a * big_a * big_a).sqrt());
        let theta = t.clamp(-1.0, 1.0).acos() / 3.0;
        let asqrt = big_a.sqrt();
        let tmp = theta.cos();
        let sqrt3 = 3f64.sqrt();

        let t1 = (-b - 2.0 * asqrt * tmp) / (3.0 * a);
        let t2 = (-b + asqrt * (tmp + sqrt3 * theta.sin())) / (3.0 * a);
        let t3 = (-b + asqrt * (tmp - sqrt3 * theta.sin())) / (3.0 * a);
        for t in [t1, t2, t3] {
            if in_unit(t) {
                roots.push(t);
            }
        }
    }
    roots
}

/// Parameters in `(0, 1)` where the cubic's derivative vanishes.
pub fn cubic_extrema(p0: f64, p1: f64, p2: f64, p3: f64) -> Extrema {
    let a = 9.0 * p1 + 3.0 * p3 - 3.0 * p0 - 9.0 * p2;
    let b = 6.0 * p2 - 12.0 * p1 + 6.0 * p0;
    let c = 3.0 * p1 - 3.0 * p0;

    let mut out = Extrema::new();
    if is_around_zero(a) {
        if is_not_around_zero(b) {
            let t1 = -c / b;
            if in_unit(t1) {
                out.push(t1);
            }
        }
        return out;
    }

    let disc = b * b - 4.0 * a * c;
    if is_around_zero(disc) {
        let t1 = -b / (2.0 * a);
        if in_unit(t1) {
            out.push(t1);
        }
    } else if disc > 0.0 {
        let s = disc.sqrt();
        let t1 = (-b + s) / (2.0 * a);
        let t2 = (-b - s) / (2.0 * a);
        if in_unit(t1) {
            out.push(t1);
        }
        if in_unit(t2) {
            out.push(t2);
        }
    }
    out
}

/// De Casteljau split at `t`; returns the two halves' control values.
pub fn cubic_subdivide(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> ([f64; 4], [f64; 4]) {
    let p01 = (p1 - p0) * t + p0;
    let p12 = (p2 - p1) * t + p1;
    let p23 = (p3 - p2) * t + p2;

    let p012 = (p12 - p01) * t + p01;
    let p123 = (p23 - p12) * t + p12;

    let p0123 = (p123 - p012) * t + p012;

    ([p0, p01, p012, p0123], [p0123, p123, p23, p3])
}

/// Approximate closest point on the cubic to `(x, y)`.
///
/// Uniform coarse sampling (20 steps) followed by a bounded bisection
/// (at most 32 iterations, stopping once the interval drops below 1e-4).
/// Returns `(distance, closest_x, closest_y)`.
#[allow(clippy::too_many_arguments)]
pub fn cubic_project_point(
    x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64,
    x: f64, y: f64,
) -> (f64, f64, f64) {
    project_point(
        |t| (cubic_at(x0, x1, x2, x3, t), cubic_at(y0, y1, y2, y3, t)),
        x,
        y,
    )
}

// ── quadratic ─────────────────────────────────────────────────────────────

#[inline]
pub fn quadratic_at(p0: f64, p1: f64, p2: f64, t: f64) -> f64 {
    let ot = 1.0 - t;
    ot * (ot * p0 + 2.0 * t * p1) + t * t * p2
}

#[inline]
pub fn quadratic_derivative_at(p0: f64, p1: f64, p2: f64, t: f64) -> f64 {
    2.0 * ((1.0 - t) * (p1 - p0) + t * (p2 - p1))
}

/// Roots in `[0, 1]` of `a·t² + b·t + c = 0`.
fn quadratic_solve(a: f64, b: f64, c: f64) -> Roots {
    let mut roots = Roots::new();
    if is_around_zero(a) {
        if is_not_around_zero(b) {
            let t1 = -c / b;
            if in_unit(t1) {
                roots.push(t1);
            }
        }
        return roots;
    }
    let disc = b * b - 4.0 * a * c;
    if is_around_zero(disc) {
        let t1 = -b / (2.0 * a);
        if in_unit(t1) {
            roots.push(t1);
        }
    } else if disc > 0.0 {
        let s = disc.sqrt();
        let t1 = (-b + s) / (2.0 * a);
        let t2 = (-b - s) / (2.0 * a);
        if in_unit(t1) {
            roots.push(t1);
        }
        if in_unit(t2) {
            roots.push(t2);
        }
    }
    roots
}

/// Parameters in `[0, 1]` where the quadratic equals `val`.
pub fn quadratic_root_at(p0: f64, p1: f64, p2: f64, val: f64) -> Roots {
    let a = p0 - 2.0 * p1 + p2;
    let b = 2.0 * (p1 - p0);
    let c = p0 - val;
    quadratic_solve(a, b, c)
}

/// Parameter of the single extremum; `0.5` for a degenerate (straight) curve.
#[inline]
pub fn quadratic_extremum(p0: f64, p1: f64, p2: f64) -> f64 {
    let divider = p0 + p2 - 2.0 * p1;
    if divider == 0.0 {
        0.5
    } else {
        (p0 - p1) / divider
    }
}

pub fn quadratic_subdivide(p0: f64, p1: f64, p2: f64, t: f64) -> ([f64; 3], [f64; 3]) {
    let p01 = (p1 - p0) * t + p0;
    let p12 = (p2 - p1) * t + p1;
    let p012 = (p12 - p01) * t + p01;
    ([p0, p01, p012], [p012, p12, p2])
}

/// Quadratic counterpart of [`cubic_project_point`].
pub fn quadratic_project_point(
    x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64,
    x: f64, y: f64,
) -> (f64, f64, f64) {
    project_point(
        |t| (quadratic_at(x0, x1, x2, t), quadratic_at(y0, y1, y2, t)),
        x,
        y,
    )
}

// ── projection ────────────────────────────────────────────────────────────

fn project_point(at: impl Fn(f64) -> (f64, f64), x: f64, y: f64) -> (f64, f64, f64) {
    let d2 = |p: (f64, f64)| (p.0 - x) * (p.0 - x) + (p.1 - y) * (p.1 - y);

    let mut t = 0.0;
    let mut best = f64::INFINITY;
    let mut step = 0.0;
    while step <= 1.0 + EPSILON {
        let s = step.min(1.0);
        let d = d2(at(s));
        if d < best {
            t = s;
            best = d;
        }
        step += 0.05;
    }

    let mut interval = 0.005;
    for _ in 0..32 {
        if interval < super::EPSILON_NUMERIC {
            break;
        }
        let prev = t - interval;
        let next = t + interval;

        let d_prev = if prev >= 0.0 { d2(at(prev)) } else { f64::INFINITY };
        if d_prev < best {
            t = prev;
            best = d_prev;
            continue;
        }
        let d_next = if next <= 1.0 { d2(at(next)) } else { f64::INFINITY };
        if d_next < best {
            t = next;
            best = d_next;
        } else {
            interval *= 0.5;
        }
    }

    let (px, py) = at(t);
    (best.sqrt(), px, py)
}

/// Approximate arc length of a cubic using `steps` chords.
pub fn cubic_length(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, steps: usize) -> f64 {
    let steps = steps.max(1);
    let mut len = 0.0;
    let (mut px, mut py) = (x0, y0);
    for i in 1..=steps {
        let t = i as f64 / steps as f64;
        let nx = cubic_at(x0, x1, x2, x3, t);
        let ny = cubic_at(y0, y1, y2, y3, t);
        len += ((nx - px) * (nx - px) + (ny - py) * (ny - py)).sqrt();
        px = nx;
        py = ny;
    }
    len
}

// ── stroke containment ────────────────────────────────────────────────────

/// True if `(x, y)` lies within `line_width / 2` of the cubic.
#[allow(clippy::too_many_arguments)]
pub fn cubic_contain_stroke(
    x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64,
    line_width: f64, x: f64, y: f64,
) -> bool {
    if line_width <= 0.0 {
        return false;
    }
    let w = line_width;
    if (y > y0 + w && y > y1 + w && y > y2 + w && y > y3 + w)
        || (y < y0 - w && y < y1 - w && y < y2 - w && y < y3 - w)
        || (x > x0 + w && x > x1 + w && x > x2 + w && x > x3 + w)
        || (x < x0 - w && x < x1 - w && x < x2 - w && x < x3 - w)
    {
        return false;
    }
    let (d, _, _) = cubic_project_point(x0, y0, x1, y1, x2, y2, x3, y3, x, y);
    d <= w / 2.0
}

/// True if `(x, y)` lies within `line_width / 2` of the quadratic.
#[allow(clippy::too_many_arguments)]
pub fn quadratic_contain_stroke(
    x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64,
    line_width: f64, x: f64, y: f64,
) -> bool {
    if line_width <= 0.0 {
        return false;
    }
    let w = line_width;
    if (y > y0 + w && y > y1 + w && y > y2 + w)
        || (y < y0 - w && y < y1 - w && y < y2 - w)
        || (x > x0 + w && x > x1 + w && x > x2 + w)
        || (x < x0 - w && x < x1 - w && x < x2 - w)
    {
        return false;
    }
    let (d, _, _) = quadratic_project_point(x0, y0, x1, y1, x2, y2, x, y);
    d <= w / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    // ── evaluation ────────────────────────────────────────────────────────

    #[test]
    fn cubic_endpoints() {
        assert_eq!(cubic_at(1.0, 5.0, -3.0, 7.0, 0.0), 1.0);
        assert!(approx(cubic_at(1.0, 5.0, -3.0, 7.0, 1.0), 7.0));
    }

    #[test]
    fn cubic_derivative_matches_finite_difference() {
        let (p0, p1, p2, p3) = (0.0, 10.0, -4.0, 3.0);
        let t = 0.37;
        let h = 1e-6;
        let fd = (cubic_at(p0, p1, p2, p3, t + h) - cubic_at(p0, p1, p2, p3, t - h)) / (2.0 * h);
        assert!((fd - cubic_derivative_at(p0, p1, p2, p3, t)).abs() < 1e-4);
    }

    #[test]
    fn quadratic_derivative_matches_finite_difference() {
        let t = 0.61;
        let h = 1e-6;
        let fd = (quadratic_at(2.0, -5.0, 9.0, t + h) - quadratic_at(2.0, -5.0, 9.0, t - h)) / (2.0 * h);
        assert!((fd - quadratic_derivative_at(2.0, -5.0, 9.0, t)).abs() < 1e-4);
    }

    // ── roots ─────────────────────────────────────────────────────────────

    #[test]
    fn cubic_roots_hit_the_value() {
        let (p0, p1, p2, p3) = (0.0, 30.0, -20.0, 10.0);
        for val in [-3.0, 0.5, 4.0, 9.0] {
            for t in cubic_root_at(p0, p1, p2, p3, val) {
                assert!(in_unit(t));
                assert!((cubic_at(p0, p1, p2, p3, t) - val).abs() < 1e-6, "val {val} t {t}");
            }
        }
    }

    #[test]
    fn s_curve_has_three_roots() {
        // Crosses 5 three times.
        let roots = cubic_root_at(0.0, 30.0, -20.0, 10.0, 5.0);
        assert_eq!(roots.len(), 3);
    }

    #[test]
    fn linear_cubic_degrades_gracefully() {
        // Control points evenly spaced: a == 0, b == 0.
        let roots = cubic_root_at(0.0, 1.0, 2.0, 3.0, 1.5);
        assert_eq!(roots.len(), 1);
        assert!(approx(roots[0], 0.5));
    }

    #[test]
    fn flat_cubic_produces_no_nan() {
        let roots = cubic_root_at(2.0, 2.0, 2.0, 2.0, 1.0);
        assert!(roots.iter().all(|t| t.is_finite()));
    }

    #[test]
    fn quadratic_roots_hit_the_value() {
        let roots = quadratic_root_at(0.0, 10.0, 0.0, 2.5);
        assert_eq!(roots.len(), 2);
        for t in roots {
            assert!(approx(quadratic_at(0.0, 10.0, 0.0, t), 2.5));
        }
    }

    // ── extrema ───────────────────────────────────────────────────────────

    #[test]
    fn cubic_extrema_are_stationary() {
        let (p0, p1, p2, p3) = (0.0, 30.0, -20.0, 10.0);
        let ext = cubic_extrema(p0, p1, p2, p3);
        assert_eq!(ext.len(), 2);
        for t in ext {
            assert!(cubic_derivative_at(p0, p1, p2, p3, t).abs() < 1e-6);
        }
    }

    #[test]
    fn quadratic_extremum_of_straight_curve_is_midpoint() {
        assert_eq!(quadratic_extremum(0.0, 1.0, 2.0), 0.5);
        assert!(approx(quadratic_extremum(0.0, 10.0, 0.0), 0.5));
        assert!(approx(quadratic_extremum(0.0, 10.0, 4.0), 10.0 / 16.0));
    }

    // ── subdivision ───────────────────────────────────────────────────────

    #[test]
    fn cubic_subdivision_halves_meet_on_curve() {
        let (l, r) = cubic_subdivide(0.0, 3.0, 7.0, 2.0, 0.3);
        let mid = cubic_at(0.0, 3.0, 7.0, 2.0, 0.3);
        assert!(approx(l[3], mid));
        assert!(approx(r[0], mid));
        // Left half at 0.5 equals the original at 0.15.
        assert!(approx(cubic_at(l[0], l[1], l[2], l[3], 0.5), cubic_at(0.0, 3.0, 7.0, 2.0, 0.15)));
    }

    #[test]
    fn quadratic_subdivision_halves_meet_on_curve() {
        let (l, r) = quadratic_subdivide(0.0, 8.0, 2.0, 0.25);
        assert!(approx(l[2], quadratic_at(0.0, 8.0, 2.0, 0.25)));
        assert_eq!(l[2], r[0]);
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn projection_onto_straight_cubic() {
        let (d, px, py) = cubic_project_point(0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0, 12.0, 4.0);
        assert!((d - 4.0).abs() < 1e-2);
        assert!((px - 12.0).abs() < 1e-1);
        assert!(py.abs() < 1e-9);
    }

    #[test]
    fn projection_of_on_curve_point_is_near_zero() {
        let x = quadratic_at(0.0, 50.0, 100.0, 0.42);
        let y = quadratic_at(0.0, 80.0, 0.0, 0.42);
        let (d, _, _) = quadratic_project_point(0.0, 0.0, 50.0, 80.0, 100.0, 0.0, x, y);
        assert!(d < 0.05, "d = {d}");
    }

    #[test]
    fn cubic_stroke_threshold() {
        // Straight horizontal cubic, width 4 => half width 2.
        assert!(cubic_contain_stroke(0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0, 4.0, 15.0, 1.9));
        assert!(!cubic_contain_stroke(0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0, 4.0, 15.0, 2.1));
        assert!(!cubic_contain_stroke(0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0, 4.0, 15.0, 50.0));
    }

    #[test]
    fn quadratic_stroke_threshold() {
        let apex_y = quadratic_at(0.0, -40.0, 0.0, 0.5);
        assert!(quadratic_contain_stroke(0.0, 0.0, 10.0, -40.0, 20.0, 0.0, 2.0, 10.0, apex_y + 0.9));
        assert!(!quadratic_contain_stroke(0.0, 0.0, 10.0, -40.0, 20.0, 0.0, 2.0, 10.0, apex_y + 1.2));
    }

    #[test]
    fn cubic_length_of_straight_curve() {
        let len = cubic_length(0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 3.0, 0.0, 10);
        assert!(approx(len, 3.0));
    }
}
