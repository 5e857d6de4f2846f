//! Hit testing over recorded path buffers.
//!
//! Fill containment sums the signed winding of every segment (non-zero rule).
//! Open subpaths are closed back to their start for fill only. Stroke
//! containment tests the distance to each segment against half the width,
//! with a cheap bounding-box rejection first.

use crate::geom::{arc, curve, line, winding};

use super::cmd::{Segment, Segments};
use super::proxy::ellipse_point;

/// True if `(x, y)` is inside the filled path.
pub fn contain(data: &[f64], x: f64, y: f64) -> bool {
    contain_path(data, 0.0, false, x, y)
}

/// True if `(x, y)` lies on the path stroked with `line_width`.
pub fn contain_stroke(data: &[f64], line_width: f64, x: f64, y: f64) -> bool {
    contain_path(data, line_width, true, x, y)
}

/// Squashes x around `cx` so an axis-aligned ellipse becomes a circle of
/// radius `ry`.
#[inline]
fn to_circle_space(cx: f64, rx: f64, ry: f64, x: f64, y: f64) -> (f64, f64) {
    let sx = if rx != 0.0 { ry / rx } else { 0.0 };
    (cx + (x - cx) * sx, y)
}

fn contain_path(data: &[f64], line_width: f64, is_stroke: bool, x: f64, y: f64) -> bool {
    let mut w = 0.0;
    let (mut xi, mut yi, mut x0, mut y0) = (0.0, 0.0, 0.0, 0.0);
    let mut has_point = false;

    // Adds a line's winding; `true` means the point sits on the line.
    macro_rules! wind {
        ($ax:expr, $ay:expr, $bx:expr, $by:expr) => {{
            let v = winding::line($ax, $ay, $bx, $by, x, y);
            if v.is_infinite() {
                return true;
            }
            w += v;
        }};
    }

    for seg in Segments::new(data) {
        match seg {
            Segment::MoveTo { x: mx, y: my } => {
                if has_point && !is_stroke {
                    wind!(xi, yi, x0, y0);
                }
                x0 = mx;
                y0 = my;
                xi = mx;
                yi = my;
                has_point = true;
            }
            Segment::LineTo { x: lx, y: ly } => {
                if is_stroke {
                    if line::contain_stroke(xi, yi, lx, ly, line_width, x, y) {
                        return true;
                    }
                } else {
                    wind!(xi, yi, lx, ly);
                }
                xi = lx;
                yi = ly;
            }
            Segment::CubicTo { x1, y1, x2, y2, x: ex, y: ey } => {
                if is_stroke {
                    if curve::cubic_contain_stroke(xi, yi, x1, y1, x2, y2, ex, ey, line_width, x, y) {
                        return true;
                    }
                } else {
                    w += winding::cubic(xi, yi, x1, y1, x2, y2, ex, ey, x, y);
                }
                xi = ex;
                yi = ey;
            }
            Segment::QuadTo { x1, y1, x: ex, y: ey } => {
                if is_stroke {
                    if curve::quadratic_contain_stroke(xi, yi, x1, y1, ex, ey, line_width, x, y) {
                        return true;
                    }
                } else {
                    w += winding::quadratic(xi, yi, x1, y1, ex, ey, x, y);
                }
                xi = ex;
                yi = ey;
            }
            Segment::Arc { cx, cy, rx, ry, start, sweep, rotation, anticlockwise } => {
                let end = start + sweep;
                let (sx, sy) = ellipse_point(cx, cy, rx, ry, rotation, start);
                if has_point {
                    // Implicit connecting line from the current point.
                    if is_stroke {
                        if line::contain_stroke(xi, yi, sx, sy, line_width, x, y) {
                            return true;
                        }
                    } else {
                        wind!(xi, yi, sx, sy);
                    }
                } else {
                    x0 = sx;
                    y0 = sy;
                    has_point = true;
                }

                if rotation != 0.0 {
                    // Rotated ellipses are tested through their cubic approximation.
                    let (mut px, mut py) = (sx, sy);
                    let sweep = arc::arc_sweep(start, end, anticlockwise);
                    for c in arc::arc_to_cubics(cx, cy, rx, ry, start, sweep, rotation) {
                        if is_stroke {
                            if curve::cubic_contain_stroke(px, py, c[0], c[1], c[2], c[3], c[4], c[5], line_width, x, y) {
                                return true;
                            }
                        } else {
                            w += winding::cubic(px, py, c[0], c[1], c[2], c[3], c[4], c[5], x, y);
                        }
                        (px, py) = (c[4], c[5]);
                    }
                } else {
                    let (px, py) = to_circle_space(cx, rx, ry, x, y);
                    if is_stroke {
                        if arc::contain_stroke(cx, cy, ry, start, end, anticlockwise, line_width, px, py) {
                            return true;
                        }
                    } else {
                        w += winding::arc(cx, cy, ry, start, end, anticlockwise, px, py);
                    }
                }
                (xi, yi) = ellipse_point(cx, cy, rx, ry, rotation, end);
            }
            Segment::Rect { x: rx0, y: ry0, width, height } => {
                if has_point && !is_stroke {
                    wind!(xi, yi, x0, y0);
                }
                let (rx1, ry1) = (rx0 + width, ry0 + height);
                if is_stroke {
                    if line::contain_stroke(rx0, ry0, rx1, ry0, line_width, x, y)
                        || line::contain_stroke(rx1, ry0, rx1, ry1, line_width, x, y)
                        || line::contain_stroke(rx1, ry1, rx0, ry1, line_width, x, y)
                        || line::contain_stroke(rx0, ry1, rx0, ry0, line_width, x, y)
                    {
                        return true;
                    }
                } else {
                    wind!(rx1, ry0, rx1, ry1);
                    wind!(rx0, ry1, rx0, ry0);
                }
                x0 = rx0;
                y0 = ry0;
                xi = rx0;
                yi = ry0;
                has_point = true;
            }
            Segment::Close => {
                if is_stroke {
                    if line::contain_stroke(xi, yi, x0, y0, line_width, x, y) {
                        return true;
                    }
                } else {
                    wind!(xi, yi, x0, y0);
                }
                xi = x0;
                yi = y0;
            }
        }
    }

    if !is_stroke && has_point && (yi - y0).abs() > 1e-4 {
        wind!(xi, yi, x0, y0);
    }
    w != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{PathBuilder, PathProxy};
    use std::f64::consts::PI;

    fn polygon(points: &[(f64, f64)]) -> PathProxy {
        let mut p = PathProxy::new();
        p.move_to(points[0].0, points[0].1);
        for &(x, y) in &points[1..] {
            p.line_to(x, y);
        }
        p.close_path();
        p
    }

    // ── fill ──────────────────────────────────────────────────────────────

    #[test]
    fn square_inside_and_outside() {
        let sq = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert!(sq.contain(5.0, 5.0));
        assert!(sq.contain(0.5, 9.5));
        assert!(!sq.contain(-1.0, 5.0));
        assert!(!sq.contain(11.0, 5.0));
        assert!(!sq.contain(5.0, 11.0));
    }

    #[test]
    fn concave_polygon() {
        // "U" shape opening upward.
        let u = polygon(&[
            (0.0, 0.0), (3.0, 0.0), (3.0, 7.0), (7.0, 7.0),
            (7.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0),
        ]);
        assert!(u.contain(1.5, 5.0));
        assert!(u.contain(8.5, 5.0));
        assert!(!u.contain(5.0, 3.0));
        assert!(u.contain(5.0, 8.5));
    }

    #[test]
    fn vertex_aligned_ray_counts_once() {
        // The ray at y = 5 passes exactly through the right vertex.
        let diamond = polygon(&[(5.0, 0.0), (10.0, 5.0), (5.0, 10.0), (0.0, 5.0)]);
        assert!(diamond.contain(5.0, 5.0));
        assert!(!diamond.contain(-1.0, 5.0));
    }

    #[test]
    fn open_subpath_is_closed_for_fill() {
        let mut p = PathProxy::new();
        p.move_to(0.0, 0.0);
        p.line_to(10.0, 0.0);
        p.line_to(10.0, 10.0);
        assert!(p.contain(8.0, 2.0));
        assert!(!p.contain(2.0, 8.0));
    }

    #[test]
    fn circle_and_rect_fill() {
        let mut p = PathProxy::new();
        p.arc(0.0, 0.0, 10.0, 0.0, PI * 2.0, false);
        assert!(p.contain(3.0, 3.0));
        assert!(!p.contain(8.0, 8.0));

        let mut r = PathProxy::new();
        r.rect(0.0, 0.0, 10.0, 5.0);
        assert!(r.contain(5.0, 2.0));
        assert!(!r.contain(5.0, 6.0));
    }

    #[test]
    fn ellipse_fill() {
        let mut p = PathProxy::new();
        p.ellipse(0.0, 0.0, 20.0, 5.0, 0.0, 0.0, PI * 2.0, false);
        assert!(p.contain(15.0, 0.0));
        assert!(!p.contain(0.0, 6.0));
        assert!(!p.contain(19.0, 4.0));
    }

    #[test]
    fn rotated_ellipse_fill() {
        let mut p = PathProxy::new();
        p.ellipse(0.0, 0.0, 20.0, 5.0, PI / 2.0, 0.0, PI * 2.0, false);
        // Major axis now vertical.
        assert!(p.contain(0.0, 15.0));
        assert!(!p.contain(15.0, 0.0));
        assert!(p.contain_stroke(2.0, 0.0, -20.0));
    }

    #[test]
    fn curve_fill() {
        let mut p = PathProxy::new();
        p.move_to(0.0, 0.0);
        p.bezier_curve_to(0.0, 100.0, 100.0, 100.0, 100.0, 0.0);
        p.close_path();
        assert!(p.contain(50.0, 50.0));
        assert!(!p.contain(50.0, 80.0));
        assert!(!p.contain(50.0, -1.0));
    }

    #[test]
    fn empty_path_contains_nothing() {
        assert!(!PathProxy::new().contain(0.0, 0.0));
    }

    // ── stroke ────────────────────────────────────────────────────────────

    #[test]
    fn stroke_at_half_width() {
        let sq = polygon(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]);
        let eps = 1e-6;
        assert!(sq.contain_stroke(6.0, 50.0, 3.0 - eps));
        assert!(!sq.contain_stroke(6.0, 50.0, 3.0 + eps));
        // Closing edge counts.
        assert!(sq.contain_stroke(6.0, 2.0, 50.0));
        assert!(!sq.contain_stroke(6.0, 50.0, 50.0));
    }

    #[test]
    fn curve_stroke() {
        let mut p = PathProxy::new();
        p.move_to(0.0, 0.0);
        p.quadratic_curve_to(50.0, 0.0, 100.0, 0.0);
        assert!(p.contain_stroke(2.0, 50.0, 0.9));
        assert!(!p.contain_stroke(2.0, 50.0, 1.1));
    }

    #[test]
    fn arc_stroke_uses_half_width() {
        let mut p = PathProxy::new();
        p.arc(0.0, 0.0, 10.0, 0.0, PI * 2.0, false);
        assert!(p.contain_stroke(2.0, 10.9, 0.0));
        assert!(!p.contain_stroke(2.0, 11.1, 0.0));
        assert!(!p.contain_stroke(2.0, 0.0, 0.0));
    }
}
