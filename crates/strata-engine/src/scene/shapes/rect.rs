use crate::path::PathBuilder;

use super::ShapeGeometry;

/// Axis-aligned rectangle with optional rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Corner radii `[top-left, top-right, bottom-right, bottom-left]`.
    pub radius: [f64; 4],
}

impl Rect {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, radius: [0.0; 4] }
    }

    #[inline]
    pub fn with_radius(mut self, r: f64) -> Self {
        self.radius = [r; 4];
        self
    }

    #[inline]
    pub fn with_radii(mut self, radius: [f64; 4]) -> Self {
        self.radius = radius;
        self
    }

    /// Radii clamped to be non-negative and scaled down proportionally when
    /// adjacent corners would overlap.
    fn clamped_radii(&self, w: f64, h: f64) -> [f64; 4] {
        let [mut r1, mut r2, mut r3, mut r4] = self.radius.map(|r| r.max(0.0));
        let shrink = |a: &mut f64, b: &mut f64, side: f64| {
            let total = *a + *b;
            if total > side && total > 0.0 {
                *a *= side / total;
                *b *= side / total;
            }
        };
        shrink(&mut r1, &mut r2, w);
        shrink(&mut r3, &mut r4, w);
        shrink(&mut r2, &mut r3, h);
        shrink(&mut r1, &mut r4, h);
        [r1, r2, r3, r4]
    }
}

impl ShapeGeometry for Rect {
    fn build_path(&self, path: &mut dyn PathBuilder) {
        // Normalize negative extents.
        let (x, w) = if self.width < 0.0 { (self.x + self.width, -self.width) } else { (self.x, self.width) };
        let (y, h) = if self.height < 0.0 { (self.y + self.height, -self.height) } else { (self.y, self.height) };

        if self.radius.iter().all(|r| *r <= 0.0) {
            path.rect(x, y, w, h);
            return;
        }

        let [r1, r2, r3, r4] = self.clamped_radii(w, h);
        let half_pi = std::f64::consts::FRAC_PI_2;
        let pi = std::f64::consts::PI;

        path.move_to(x + r1, y);
        path.line_to(x + w - r2, y);
        if r2 != 0.0 {
            path.arc(x + w - r2, y + r2, r2, -half_pi, 0.0, false);
        }
        path.line_to(x + w, y + h - r3);
        if r3 != 0.0 {
            path.arc(x + w - r3, y + h - r3, r3, 0.0, half_pi, false);
        }
        path.line_to(x + r4, y + h);
        if r4 != 0.0 {
            path.arc(x + r4, y + h - r4, r4, half_pi, pi, false);
        }
        path.line_to(x, y + r1);
        if r1 != 0.0 {
            path.arc(x + r1, y + r1, r1, pi, pi * 1.5, false);
        }
        path.close_path();
    }
}
