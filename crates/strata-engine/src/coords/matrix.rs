use super::Vec2;

/// 2D affine matrix `[a, b, c, d, e, f]`.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`, the same layout a 2D
/// drawing context takes in `set_transform`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Matrix(pub [f64; 6]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self([a, b, c, d, e, f])
    }

    #[inline]
    pub const fn translation(x: f64, y: f64) -> Self {
        Self([1.0, 0.0, 0.0, 1.0, x, y])
    }

    /// Returns `self * rhs`: `rhs` is applied first, then `self`.
    pub fn mul(&self, rhs: &Matrix) -> Matrix {
        let m1 = &self.0;
        let m2 = &rhs.0;
        Matrix([
            m1[0] * m2[0] + m1[2] * m2[1],
            m1[1] * m2[0] + m1[3] * m2[1],
            m1[0] * m2[2] + m1[2] * m2[3],
            m1[1] * m2[2] + m1[3] * m2[3],
            m1[0] * m2[4] + m1[2] * m2[5] + m1[4],
            m1[1] * m2[4] + m1[3] * m2[5] + m1[5],
        ])
    }

    /// Post-translates (the translation is applied after the current mapping).
    #[inline]
    pub fn translate(&self, x: f64, y: f64) -> Matrix {
        let mut m = self.0;
        m[4] += x;
        m[5] += y;
        Matrix(m)
    }

    /// Post-scales around the origin.
    #[inline]
    pub fn scale(&self, sx: f64, sy: f64) -> Matrix {
        let m = &self.0;
        Matrix([m[0] * sx, m[1] * sy, m[2] * sx, m[3] * sy, m[4] * sx, m[5] * sy])
    }

    /// Post-rotates by `rad`. Positive angles turn counter-clockwise on screen
    /// (y axis pointing down).
    pub fn rotate(&self, rad: f64) -> Matrix {
        let [aa, ab, ac, ad, atx, aty] = self.0;
        let st = rad.sin();
        let ct = rad.cos();
        Matrix([
            aa * ct + ab * st,
            -aa * st + ab * ct,
            ac * ct + ad * st,
            -ac * st + ct * ad,
            ct * atx + st * aty,
            ct * aty - st * atx,
        ])
    }

    /// Inverse mapping, or `None` when the determinant is zero.
    pub fn invert(&self) -> Option<Matrix> {
        let [aa, ab, ac, ad, atx, aty] = self.0;
        let det = aa * ad - ab * ac;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let det = 1.0 / det;
        Some(Matrix([
            ad * det,
            -ab * det,
            -ac * det,
            aa * det,
            (ac * aty - ad * atx) * det,
            (ab * atx - aa * aty) * det,
        ]))
    }

    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        let m = &self.0;
        Vec2::new(m[0] * p.x + m[2] * p.y + m[4], m[1] * p.x + m[3] * p.y + m[5])
    }

    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Signed per-axis scale. The sign follows the diagonal so mirrored
    /// transforms report negative factors.
    pub fn scale_factors(&self) -> (f64, f64) {
        let m = &self.0;
        let mut sx = (m[0] * m[0] + m[1] * m[1]).sqrt();
        let mut sy = (m[2] * m[2] + m[3] * m[3]).sqrt();
        if m[0] < 0.0 {
            sx = -sx;
        }
        if m[3] < 0.0 {
            sy = -sy;
        }
        (sx, sy)
    }

    /// True when the transform collapses both axes (nothing it maps is visible).
    #[inline]
    pub fn is_zero_scale(&self) -> bool {
        self.0[0] == 0.0 && self.0[3] == 0.0
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn mul_applies_rhs_first() {
        let t = Matrix::translation(10.0, 0.0);
        let s = Matrix::IDENTITY.scale(2.0, 2.0);
        // scale then translate
        let m = t.mul(&s);
        assert!(approx(m.apply(Vec2::new(1.0, 1.0)), Vec2::new(12.0, 2.0)));
    }

    #[test]
    fn invert_round_trips() {
        let m = Matrix::IDENTITY.scale(2.0, 3.0).rotate(0.3).translate(5.0, -7.0);
        let inv = m.invert().unwrap();
        let p = Vec2::new(3.5, -1.25);
        assert!(approx(inv.apply(m.apply(p)), p));
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Matrix::IDENTITY.scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn rotate_quarter_turn_is_counter_clockwise_on_screen() {
        let m = Matrix::IDENTITY.rotate(core::f64::consts::FRAC_PI_2);
        assert!(approx(m.apply(Vec2::new(1.0, 0.0)), Vec2::new(0.0, -1.0)));
    }

    #[test]
    fn scale_factors_keep_sign() {
        let m = Matrix::IDENTITY.scale(-2.0, 3.0);
        assert_eq!(m.scale_factors(), (-2.0, 3.0));
    }
}
