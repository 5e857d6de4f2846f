use crate::paint::Style;
use crate::path::PathBuilder;

use super::{stroke_style, ShapeGeometry};

/// Open circular arc.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub clockwise: bool,
}

impl Arc {
    #[inline]
    pub fn new(cx: f64, cy: f64, r: f64, start_angle: f64, end_angle: f64) -> Self {
        Self { cx, cy, r, start_angle, end_angle, clockwise: true }
    }
}

impl ShapeGeometry for Arc {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        let r = self.r.max(0.0);
        let (s, c) = self.start_angle.sin_cos();
        path.move_to(c * r + self.cx, s * r + self.cy);
        path.arc(self.cx, self.cy, r, self.start_angle, self.end_angle, !self.clockwise);
    }

    fn default_style(&self) -> Style {
        stroke_style()
    }
}
