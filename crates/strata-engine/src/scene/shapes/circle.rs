use std::f64::consts::PI;

use crate::path::PathBuilder;

use super::ShapeGeometry;

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    #[inline]
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self { cx, cy, r }
    }
}

impl ShapeGeometry for Circle {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        // Explicit move so the arc does not connect from a previous point.
        path.move_to(self.cx + self.r, self.cy);
        path.arc(self.cx, self.cy, self.r, 0.0, PI * 2.0, false);
    }
}
