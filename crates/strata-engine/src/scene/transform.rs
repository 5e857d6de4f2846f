use crate::coords::{Matrix, Vec2};

/// Components below this magnitude are treated as absent.
const EPSILON: f64 = 5e-5;

#[inline]
fn is_not_around_zero(v: f64) -> bool {
    v > EPSILON || v < -EPSILON
}

/// Local transform component of a scene node.
///
/// The local matrix is built as: move `origin` to (0, 0), scale, rotate,
/// move back, then translate by `position`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    /// Radians; positive turns counter-clockwise on screen.
    pub rotation: f64,
    pub scale: Vec2,
    /// Pivot of rotation and scale, in local coordinates.
    pub origin: Option<Vec2>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            origin: None,
        }
    }
}

impl Transform {
    /// True when position, rotation or scale differ from identity.
    pub fn needs_local_transform(&self) -> bool {
        is_not_around_zero(self.rotation)
            || is_not_around_zero(self.position.x)
            || is_not_around_zero(self.position.y)
            || is_not_around_zero(self.scale.x - 1.0)
            || is_not_around_zero(self.scale.y - 1.0)
    }

    /// Local matrix, regardless of whether it is the identity.
    pub fn local_matrix(&self) -> Matrix {
        let origin = self.origin.unwrap_or(Vec2::zero());
        let mut m = Matrix::translation(-origin.x, -origin.y).scale(self.scale.x, self.scale.y);
        if self.rotation != 0.0 {
            m = m.rotate(self.rotation);
        }
        m.translate(origin.x + self.position.x, origin.y + self.position.y)
    }

    /// World matrix given the parent's, or `None` when both are identity.
    pub fn resolve(&self, parent: Option<&Matrix>) -> Option<Matrix> {
        let local = self.needs_local_transform().then(|| self.local_matrix());
        match (parent, local) {
            (None, None) => None,
            (Some(p), None) => Some(*p),
            (None, Some(l)) => Some(l),
            (Some(p), Some(l)) => Some(p.mul(&l)),
        }
    }
}
