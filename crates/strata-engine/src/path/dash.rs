//! Software line dashing.

use smallvec::SmallVec;

use crate::geom::curve::{cubic_at, cubic_length, cubic_subdivide};
use crate::surface::Surface;

/// Walks a dash pattern along consecutive segments of one subpath.
///
/// Odd-length patterns are repeated once, matching canvas `setLineDash`.
#[derive(Debug, Clone)]
pub(crate) struct Dasher {
    pattern: SmallVec<[f64; 8]>,
    offset: f64,
    idx: usize,
    /// Distance already consumed inside `pattern[idx]`.
    consumed: f64,
}

impl Dasher {
    pub fn new(pattern: &[f64], offset: f64) -> Option<Self> {
        if pattern.is_empty() || pattern.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return None;
        }
        let mut p: SmallVec<[f64; 8]> = SmallVec::from_slice(pattern);
        if p.len() % 2 == 1 {
            p.extend_from_slice(pattern);
        }
        if p.iter().sum::<f64>() <= 0.0 {
            return None;
        }
        let mut d = Self {
            pattern: p,
            offset: if offset.is_finite() { offset } else { 0.0 },
            idx: 0,
            consumed: 0.0,
        };
        d.reset();
        Some(d)
    }

    /// Restarts the pattern at the configured offset (new subpath).
    pub fn reset(&mut self) {
        let sum: f64 = self.pattern.iter().sum();
        let mut phase = self.offset % sum;
        if phase < 0.0 {
            phase += sum;
        }
        self.idx = 0;
        self.consumed = 0.0;
        while phase > 0.0 {
            let entry = self.pattern[self.idx];
            if phase < entry {
                self.consumed = phase;
                break;
            }
            phase -= entry;
            self.idx = (self.idx + 1) % self.pattern.len();
        }
    }

    /// Splits `[0, length]` into on/off pieces, calling `emit(d0, d1, on)`
    /// with distances along the segment.
    fn walk(&mut self, length: f64, mut emit: impl FnMut(f64, f64, bool)) {
        if !(length > 0.0) {
            return;
        }
        let mut pos = 0.0;
        while pos < length {
            let entry = self.pattern[self.idx];
            let remaining = entry - self.consumed;
            let on = self.idx % 2 == 0;
            if pos + remaining >= length - 1e-9 {
                self.consumed = (self.consumed + length - pos).min(entry);
                emit(pos, length, on);
                break;
            }
            if remaining > 0.0 {
                emit(pos, pos + remaining, on);
            }
            pos += remaining;
            self.idx = (self.idx + 1) % self.pattern.len();
            self.consumed = 0.0;
        }
    }

    /// Dashes the straight segment `(x0, y0) → (x1, y1)`. The pen is assumed
    /// to be at `(x0, y0)`.
    pub fn line<S: Surface + ?Sized>(&mut self, surface: &mut S, x0: f64, y0: f64, x1: f64, y1: f64) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len = (dx * dx + dy * dy).sqrt();
        if !(len > 0.0) {
            return;
        }
        let (ux, uy) = (dx / len, dy / len);
        self.walk(len, |_, d1, on| {
            let x = x0 + ux * d1;
            let y = y0 + uy * d1;
            if on {
                surface.line_to(x, y);
            } else {
                surface.move_to(x, y);
            }
        });
    }

    /// Dashes a cubic. Dash boundaries are placed by approximate arc length
    /// (10 chords) and each dash is emitted as the matching sub-curve.
    #[allow(clippy::too_many_arguments)]
    pub fn cubic<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64,
    ) {
        let len = cubic_length(x0, y0, x1, y1, x2, y2, x3, y3, 10);
        self.walk(len, |d0, d1, on| {
            let t0 = (d0 / len).clamp(0.0, 1.0);
            let t1 = (d1 / len).clamp(0.0, 1.0);
            if on {
                let xs = sub_cubic(x0, x1, x2, x3, t0, t1);
                let ys = sub_cubic(y0, y1, y2, y3, t0, t1);
                surface.bezier_curve_to(xs[1], ys[1], xs[2], ys[2], xs[3], ys[3]);
            } else {
                surface.move_to(cubic_at(x0, x1, x2, x3, t1), cubic_at(y0, y1, y2, y3, t1));
            }
        });
    }
}

/// Control values of the part of a cubic between `t0` and `t1`.
fn sub_cubic(p0: f64, p1: f64, p2: f64, p3: f64, t0: f64, t1: f64) -> [f64; 4] {
    if t1 <= 0.0 {
        return [p0; 4];
    }
    let (left, _) = cubic_subdivide(p0, p1, p2, p3, t1);
    let (_, right) = cubic_subdivide(left[0], left[1], left[2], left[3], t0 / t1);
    right
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{RecordingSurface, SurfaceOp};

    #[test]
    fn rejects_degenerate_patterns() {
        assert!(Dasher::new(&[], 0.0).is_none());
        assert!(Dasher::new(&[0.0, 0.0], 0.0).is_none());
        assert!(Dasher::new(&[1.0, -1.0], 0.0).is_none());
    }

    #[test]
    fn dashes_a_line() {
        let mut d = Dasher::new(&[4.0, 2.0], 0.0).unwrap();
        let mut s = RecordingSurface::new(10, 10);
        d.line(&mut s, 0.0, 0.0, 10.0, 0.0);
        assert_eq!(
            s.take_ops(),
            vec![
                SurfaceOp::LineTo(4.0, 0.0),
                SurfaceOp::MoveTo(6.0, 0.0),
                SurfaceOp::LineTo(10.0, 0.0),
            ]
        );
    }

    #[test]
    fn phase_carries_over_segments() {
        let mut d = Dasher::new(&[4.0, 2.0], 0.0).unwrap();
        let mut s = RecordingSurface::new(10, 10);
        d.line(&mut s, 0.0, 0.0, 3.0, 0.0);
        d.line(&mut s, 3.0, 0.0, 3.0, 5.0);
        assert_eq!(
            s.take_ops(),
            vec![
                SurfaceOp::LineTo(3.0, 0.0),
                SurfaceOp::LineTo(3.0, 1.0),
                SurfaceOp::MoveTo(3.0, 3.0),
                SurfaceOp::LineTo(3.0, 5.0),
            ]
        );
    }

    #[test]
    fn offset_shifts_the_pattern() {
        let mut d = Dasher::new(&[4.0, 2.0], 5.0).unwrap();
        let mut s = RecordingSurface::new(10, 10);
        d.line(&mut s, 0.0, 0.0, 8.0, 0.0);
        // Starts 1 unit into the gap.
        assert_eq!(
            s.take_ops(),
            vec![
                SurfaceOp::MoveTo(1.0, 0.0),
                SurfaceOp::LineTo(5.0, 0.0),
                SurfaceOp::MoveTo(7.0, 0.0),
                SurfaceOp::LineTo(8.0, 0.0),
            ]
        );
    }

    #[test]
    fn odd_pattern_is_doubled() {
        let mut d = Dasher::new(&[3.0], 0.0).unwrap();
        let mut s = RecordingSurface::new(10, 10);
        d.line(&mut s, 0.0, 0.0, 9.0, 0.0);
        assert_eq!(
            s.take_ops(),
            vec![
                SurfaceOp::LineTo(3.0, 0.0),
                SurfaceOp::MoveTo(6.0, 0.0),
                SurfaceOp::LineTo(9.0, 0.0),
            ]
        );
    }

    #[test]
    fn dashed_cubic_emits_sub_curves() {
        let mut d = Dasher::new(&[10.0, 10.0], 0.0).unwrap();
        let mut s = RecordingSurface::new(10, 10);
        d.cubic(&mut s, 0.0, 0.0, 10.0, 0.0, 20.0, 0.0, 30.0, 0.0);
        let ops = s.take_ops();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], SurfaceOp::BezierCurveTo(_, _, _, _, x, _) if (x - 10.0).abs() < 1e-9));
        assert!(matches!(ops[1], SurfaceOp::MoveTo(x, _) if (x - 20.0).abs() < 1e-9));
        assert!(matches!(ops[2], SurfaceOp::BezierCurveTo(_, _, _, _, x, _) if (x - 30.0).abs() < 1e-9));
    }
}
