use crate::coords::Vec2;
use crate::paint::Style;
use crate::path::PathBuilder;

use super::{stroke_style, ShapeGeometry};

fn build_points(points: &[Vec2], path: &mut dyn PathBuilder, close: bool) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    path.move_to(first.x, first.y);
    for p in rest {
        path.line_to(p.x, p.y);
    }
    if close {
        path.close_path();
    }
}

/// Closed polygon through `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec2>,
}

impl Polygon {
    #[inline]
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }
}

impl ShapeGeometry for Polygon {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        build_points(&self.points, path, true);
    }
}

/// Open polyline through `points`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec2>,
}

impl Polyline {
    #[inline]
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }
}

impl ShapeGeometry for Polyline {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        build_points(&self.points, path, false);
    }

    fn default_style(&self) -> Style {
        stroke_style()
    }
}
