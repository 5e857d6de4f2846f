use crate::path::PathBuilder;

use super::ShapeGeometry;

/// Annular wedge between radii `r0` (inner) and `r` (outer).
#[derive(Debug, Clone, PartialEq)]
pub struct Sector {
    pub cx: f64,
    pub cy: f64,
    pub r0: f64,
    pub r: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    /// Sweep direction of the outer arc; clockwise on screen by default.
    pub clockwise: bool,
}

impl Sector {
    #[inline]
    pub fn new(cx: f64, cy: f64, r0: f64, r: f64, start_angle: f64, end_angle: f64) -> Self {
        Self { cx, cy, r0, r, start_angle, end_angle, clockwise: true }
    }
}

impl ShapeGeometry for Sector {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        let (x, y) = (self.cx, self.cy);
        let r0 = self.r0.max(0.0);
        let r = self.r.max(0.0);
        let (s0, c0) = self.start_angle.sin_cos();
        let (s1, c1) = self.end_angle.sin_cos();

        path.move_to(c0 * r0 + x, s0 * r0 + y);
        path.line_to(c0 * r + x, s0 * r + y);
        path.arc(x, y, r, self.start_angle, self.end_angle, !self.clockwise);
        path.line_to(c1 * r0 + x, s1 * r0 + y);
        if r0 != 0.0 {
            path.arc(x, y, r0, self.end_angle, self.start_angle, self.clockwise);
        }
        path.close_path();
    }
}
