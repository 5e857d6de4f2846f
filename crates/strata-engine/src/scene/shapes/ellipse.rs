use std::f64::consts::PI;

use crate::path::PathBuilder;

use super::ShapeGeometry;

#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    pub cx: f64,
    pub cy: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Ellipse {
    #[inline]
    pub fn new(cx: f64, cy: f64, rx: f64, ry: f64) -> Self {
        Self { cx, cy, rx, ry }
    }
}

impl ShapeGeometry for Ellipse {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        path.move_to(self.cx + self.rx, self.cy);
        path.ellipse(self.cx, self.cy, self.rx, self.ry, 0.0, 0.0, PI * 2.0, false);
        path.close_path();
    }
}
