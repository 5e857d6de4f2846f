use crate::coords::{BoundingRect, Matrix, Vec2};
use crate::surface::Surface;

use super::Transform;

/// Something the painter can draw.
pub trait Drawable {
    /// Local-space bounds, inflated by the stroke when there is one.
    fn bounding_rect(&self) -> BoundingRect;

    /// Hook run before the world transform is resolved.
    fn before_update(&mut self) {}

    /// Hook run after the world transform is resolved.
    fn update(&mut self) {}

    /// Draws onto `surface`. `prev` is the element drawn just before on the
    /// same surface state, used to skip redundant style changes.
    fn brush<S: Surface + ?Sized>(&mut self, surface: &mut S, prev: Option<&Self>)
    where
        Self: Sized;
}

/// Point containment in world coordinates.
pub trait Hittable {
    fn contain(&self, x: f64, y: f64) -> bool;
}

/// Local transform component plus the resolved world matrix.
pub trait Transformable {
    fn transform(&self) -> &Transform;

    /// Mutable access; marks the owner dirty.
    fn transform_mut(&mut self) -> &mut Transform;

    /// Resolved world matrix; `None` is the identity.
    fn world_transform(&self) -> Option<&Matrix>;

    fn inverse_transform(&self) -> Option<&Matrix>;

    /// Recomputes the world matrix (and its inverse) from the local
    /// transform and the parent's world matrix.
    fn update_transform(&mut self, parent: Option<&Matrix>);

    /// Signed per-axis scale of the world matrix.
    fn global_scale(&self) -> (f64, f64) {
        self.world_transform().map_or((1.0, 1.0), Matrix::scale_factors)
    }

    fn transform_coord_to_local(&self, x: f64, y: f64) -> Vec2 {
        let p = Vec2::new(x, y);
        self.inverse_transform().map_or(p, |inv| inv.apply(p))
    }

    fn transform_coord_to_global(&self, x: f64, y: f64) -> Vec2 {
        let p = Vec2::new(x, y);
        self.world_transform().map_or(p, |m| m.apply(p))
    }
}
