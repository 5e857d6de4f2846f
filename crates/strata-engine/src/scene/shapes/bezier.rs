use crate::paint::Style;
use crate::path::PathBuilder;

use super::{stroke_style, ShapeGeometry};

/// Quadratic (no second control point) or cubic Bézier curve.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub cpx1: f64,
    pub cpy1: f64,
    pub cp2: Option<(f64, f64)>,
}

impl BezierCurve {
    pub fn quadratic(x1: f64, y1: f64, cpx: f64, cpy: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2, cpx1: cpx, cpy1: cpy, cp2: None }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn cubic(x1: f64, y1: f64, cpx1: f64, cpy1: f64, cpx2: f64, cpy2: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2, cpx1, cpy1, cp2: Some((cpx2, cpy2)) }
    }
}

impl ShapeGeometry for BezierCurve {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        path.move_to(self.x1, self.y1);
        match self.cp2 {
            Some((cpx2, cpy2)) => path.bezier_curve_to(self.cpx1, self.cpy1, cpx2, cpy2, self.x2, self.y2),
            None => path.quadratic_curve_to(self.cpx1, self.cpy1, self.x2, self.y2),
        }
    }

    fn default_style(&self) -> Style {
        stroke_style()
    }
}
