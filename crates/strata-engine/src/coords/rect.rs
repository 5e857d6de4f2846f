use super::{Matrix, Vec2};

/// Axis-aligned rectangle in logical pixels (top-left origin).
///
/// Invariant: `width` and `height` are non-negative once built through
/// [`BoundingRect::new`]; negative extents are normalized by shifting the origin.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }.normalized()
    }

    /// Smallest rect spanning two corner points.
    #[inline]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.x;
        let mut y = self.y;
        let mut w = self.width;
        let mut h = self.height;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Self { x, y, width: w, height: h }
    }

    /// Closed containment: edges count as inside.
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }

    /// Union of both rects.
    pub fn union(self, other: BoundingRect) -> BoundingRect {
        let min = self.min().min(other.min());
        let max = self.max().max(other.max());
        Self::from_min_max(min, max)
    }

    /// True when the rects overlap or touch.
    #[inline]
    pub fn intersects(self, other: BoundingRect) -> bool {
        let (ax0, ay0, ax1, ay1) = (self.x, self.y, self.x + self.width, self.y + self.height);
        let (bx0, by0, bx1, by1) = (other.x, other.y, other.x + other.width, other.y + other.height);
        !(ax1 < bx0 || bx1 < ax0 || ay1 < by0 || by1 < ay0)
    }

    /// Overlapping area, or `None` when the rects do not share a positive area.
    #[inline]
    pub fn intersection(self, other: BoundingRect) -> Option<BoundingRect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = (self.x + self.width).min(other.x + other.width);
        let y1 = (self.y + self.height).min(other.y + other.height);

        let w = x1 - x0;
        let h = y1 - y0;

        if w <= 0.0 || h <= 0.0 {
            None
        } else {
            Some(Self { x: x0, y: y0, width: w, height: h })
        }
    }

    /// Axis-aligned bounds of the four transformed corners.
    pub fn transformed(self, m: &Matrix) -> BoundingRect {
        let corners = [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x, self.y + self.height),
            Vec2::new(self.x + self.width, self.y + self.height),
        ];
        let first = m.apply(corners[0]);
        let (min, max) = corners[1..].iter().fold((first, first), |(lo, hi), &c| {
            let p = m.apply(c);
            (lo.min(p), hi.max(p))
        });
        Self::from_min_max(min, max)
    }

    /// Grows the rect by `amount` on every side.
    #[inline]
    pub fn inflate(self, amount: f64) -> BoundingRect {
        Self {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + amount * 2.0,
            height: self.height + amount * 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f64, y: f64, w: f64, h: f64) -> BoundingRect {
        BoundingRect::new(x, y, w, h)
    }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn negative_width_shifts_origin() {
        let n = r(10.0, 0.0, -4.0, 5.0);
        assert_eq!(n.x, 6.0);
        assert_eq!(n.width, 4.0);
    }

    #[test]
    fn negative_height_shifts_origin() {
        let n = r(0.0, 10.0, 5.0, -3.0);
        assert_eq!(n.y, 7.0);
        assert_eq!(n.height, 3.0);
    }

    // ── contains ──────────────────────────────────────────────────────────

    #[test]
    fn contains_edges_inclusive() {
        let rect = r(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(!rect.contains(Vec2::new(10.5, 5.0)));
    }

    // ── union / intersect ─────────────────────────────────────────────────

    #[test]
    fn union_spans_both() {
        let u = r(0.0, 0.0, 5.0, 5.0).union(r(10.0, -2.0, 1.0, 1.0));
        assert_eq!(u, r(0.0, -2.0, 11.0, 7.0));
    }

    #[test]
    fn touching_rects_intersect_but_have_no_area() {
        let a = r(0.0, 0.0, 10.0, 10.0);
        let b = r(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(b));
        assert!(a.intersection(b).is_none());
    }

    #[test]
    fn disjoint_rects_do_not_intersect() {
        assert!(!r(0.0, 0.0, 5.0, 5.0).intersects(r(20.0, 20.0, 5.0, 5.0)));
    }

    // ── transformed ───────────────────────────────────────────────────────

    #[test]
    fn transformed_by_quarter_turn() {
        let m = Matrix::IDENTITY.rotate(core::f64::consts::FRAC_PI_2);
        let t = r(0.0, 0.0, 4.0, 2.0).transformed(&m);
        assert!((t.width - 2.0).abs() < 1e-9);
        assert!((t.height - 4.0).abs() < 1e-9);
        assert!((t.y + 4.0).abs() < 1e-9);
    }
}
