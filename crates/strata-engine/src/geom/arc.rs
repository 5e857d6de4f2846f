//! Circular arcs and arc → cubic conversion.

use std::f64::consts::PI;

use smallvec::SmallVec;

use super::{normalize_radian, TAU};

/// True if the sweep from `start` to `end` covers the whole circle.
#[inline]
pub fn is_full_sweep(start: f64, end: f64) -> bool {
    let diff = (start - end).abs();
    diff >= TAU || (diff % TAU < 1e-4 && diff > 1e-4)
}

/// Normalized `(start, end)` with `0 <= start < 2π` and `start <= end < start + 2π`,
/// running in increasing angle order.
pub(crate) fn normalized_range(start: f64, end: f64, anticlockwise: bool) -> (f64, f64) {
    let (s, mut e) = if anticlockwise {
        (normalize_radian(end), normalize_radian(start))
    } else {
        (normalize_radian(start), normalize_radian(end))
    };
    if s > e {
        e += TAU;
    }
    (s, e)
}

#[inline]
pub(crate) fn angle_in_range(angle: f64, start: f64, end: f64) -> bool {
    (angle >= start && angle <= end) || (angle + TAU >= start && angle + TAU <= end)
}

/// True if `(x, y)` lies on the stroked arc of width `line_width`.
#[allow(clippy::too_many_arguments)]
pub fn contain_stroke(
    cx: f64,
    cy: f64,
    r: f64,
    start: f64,
    end: f64,
    anticlockwise: bool,
    line_width: f64,
    x: f64,
    y: f64,
) -> bool {
    if line_width <= 0.0 {
        return false;
    }
    let half = line_width / 2.0;
    let dx = x - cx;
    let dy = y - cy;
    let d = (dx * dx + dy * dy).sqrt();

    if d - half > r || d + half < r {
        return false;
    }
    if is_full_sweep(start, end) {
        return true;
    }

    let (s, e) = normalized_range(start, end, anticlockwise);
    let mut angle = dy.atan2(dx);
    if angle < 0.0 {
        angle += TAU;
    }
    angle_in_range(angle, s, e)
}

/// Signed sweep the canvas arc convention draws for `start → end`.
///
/// Clockwise arcs sweep `(end - start) mod 2π`, capped at a full turn once
/// the raw difference reaches 2π; anticlockwise arcs mirror that.
pub fn arc_sweep(start: f64, end: f64, anticlockwise: bool) -> f64 {
    let raw = if anticlockwise { start - end } else { end - start };
    let sweep = if raw >= TAU { TAU } else { normalize_radian(raw) };
    if anticlockwise { -sweep } else { sweep }
}

/// One cubic Bézier piece: `[c1x, c1y, c2x, c2y, x, y]`.
pub type CubicPiece = [f64; 6];

/// Approximates an elliptical arc (axis-aligned, then rotated by `psi`) by
/// cubic Béziers of at most 90° each.
///
/// `sweep` is signed; its sign gives the direction. The starting point is not
/// part of the output.
pub fn arc_to_cubics(
    cx: f64,
    cy: f64,
    rx: f64,
    ry: f64,
    start: f64,
    sweep: f64,
    psi: f64,
) -> SmallVec<[CubicPiece; 4]> {
    let mut out = SmallVec::new();
    if !sweep.is_finite() || sweep == 0.0 {
        return out;
    }
    let sweep = sweep.clamp(-TAU, TAU);
    let segments = ((sweep.abs() / (PI / 2.0)).ceil() as usize).max(1);
    let step = sweep / segments as f64;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let (sin_psi, cos_psi) = psi.sin_cos();
    let map = |ux: f64, uy: f64| {
        let px = ux * rx;
        let py = uy * ry;
        (cx + px * cos_psi - py * sin_psi, cy + px * sin_psi + py * cos_psi)
    };

    let mut a0 = start;
    for _ in 0..segments {
        let a1 = a0 + step;
        let (s0, c0) = a0.sin_cos();
        let (s1, c1) = a1.sin_cos();

        let (c1x, c1y) = map(c0 - k * s0, s0 + k * c0);
        let (c2x, c2y) = map(c1 + k * s1, s1 - k * c1);
        let (x, y) = map(c1, s1);
        out.push([c1x, c1y, c2x, c2y, x, y]);
        a0 = a1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::curve::cubic_at;

    #[test]
    fn ring_test_honors_half_width() {
        let eps = 1e-6;
        assert!(contain_stroke(0.0, 0.0, 10.0, 0.0, TAU, false, 2.0, 11.0 - eps, 0.0));
        assert!(!contain_stroke(0.0, 0.0, 10.0, 0.0, TAU, false, 2.0, 11.0 + eps, 0.0));
        assert!(contain_stroke(0.0, 0.0, 10.0, 0.0, TAU, false, 2.0, 0.0, -9.0 - eps));
        assert!(!contain_stroke(0.0, 0.0, 10.0, 0.0, TAU, false, 2.0, 0.0, 0.0));
    }

    #[test]
    fn angle_range_is_respected() {
        // Quarter arc in the lower-right quadrant (y down).
        assert!(contain_stroke(0.0, 0.0, 10.0, 0.0, PI / 2.0, false, 2.0, 7.07, 7.07));
        assert!(!contain_stroke(0.0, 0.0, 10.0, 0.0, PI / 2.0, false, 2.0, -7.07, -7.07));
        // Same angles anticlockwise cover the other three quadrants.
        assert!(contain_stroke(0.0, 0.0, 10.0, 0.0, PI / 2.0, true, 2.0, -7.07, -7.07));
    }

    #[test]
    fn cubic_pieces_stay_on_circle() {
        let pieces = arc_to_cubics(5.0, 5.0, 10.0, 10.0, 0.3, 2.5, 0.0);
        assert_eq!(pieces.len(), 2);
        let mut x0 = 5.0 + 10.0 * 0.3f64.cos();
        let mut y0 = 5.0 + 10.0 * 0.3f64.sin();
        for p in &pieces {
            for i in 0..=10 {
                let t = i as f64 / 10.0;
                let x = cubic_at(x0, p[0], p[2], p[4], t);
                let y = cubic_at(y0, p[1], p[3], p[5], t);
                let r = ((x - 5.0).powi(2) + (y - 5.0).powi(2)).sqrt();
                assert!((r - 10.0).abs() < 0.01, "r = {r}");
            }
            x0 = p[4];
            y0 = p[5];
        }
        assert!((x0 - (5.0 + 10.0 * 2.8f64.cos())).abs() < 1e-9);
    }

    #[test]
    fn sweep_follows_canvas_convention() {
        assert!((arc_sweep(0.0, PI / 2.0, false) - PI / 2.0).abs() < 1e-12);
        assert!((arc_sweep(0.0, PI / 2.0, true) + 1.5 * PI).abs() < 1e-12);
        assert_eq!(arc_sweep(0.0, 3.0 * PI, false), TAU);
        assert_eq!(arc_sweep(0.0, -3.0 * PI, true), -TAU);
        assert!((arc_sweep(PI, 0.0, false) - PI).abs() < 1e-12);
    }

    #[test]
    fn zero_sweep_has_no_pieces() {
        assert!(arc_to_cubics(0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0).is_empty());
    }
}
