//! Coordinate and geometry types shared by the scene graph, the path kernel and
//! the painter.
//!
//! Canonical CPU space:
//! - Logical pixels (device pixel ratio is applied by layers, not here)
//! - Origin top-left
//! - +X right, +Y down
//!
//! All geometry is `f64`; surfaces narrow to `f32` at the rasterizer boundary.

mod matrix;
mod rect;
mod vec2;
mod viewport;

pub use matrix::Matrix;
pub use rect::BoundingRect;
pub use vec2::Vec2;
pub use viewport::Viewport;
