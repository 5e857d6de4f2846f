use crate::paint::Style;
use crate::path::PathBuilder;

use super::{stroke_style, ShapeGeometry};

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

impl ShapeGeometry for Line {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        path.move_to(self.x1, self.y1);
        path.line_to(self.x2, self.y2);
    }

    fn default_style(&self) -> Style {
        stroke_style()
    }
}
