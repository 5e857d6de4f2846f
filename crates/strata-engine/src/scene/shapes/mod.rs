//! Built-in shape geometries.
//!
//! Each shape describes its outline against a [`PathBuilder`]; the node's
//! `PathProxy` records it once and replays it until the geometry changes.

mod arc;
mod bezier;
mod circle;
mod custom;
mod ellipse;
mod line;
mod poly;
mod rect;
mod sector;

pub use arc::Arc;
pub use bezier::BezierCurve;
pub use circle::Circle;
pub use custom::CustomPath;
pub use ellipse::Ellipse;
pub use line::Line;
pub use poly::{Polygon, Polyline};
pub use rect::Rect;
pub use sector::Sector;

use std::fmt;

use crate::paint::{Color, Style};
use crate::path::PathBuilder;

/// Geometry of a shape node.
pub trait ShapeGeometry: fmt::Debug {
    /// Describes the outline in local coordinates.
    fn build_path(&self, path: &mut dyn PathBuilder);

    /// Style a freshly created node of this shape starts with.
    fn default_style(&self) -> Style {
        Style::filled(Color::BLACK)
    }

    /// Pre-update hook, run during scene traversal before the transform is
    /// resolved. Returns `true` when the geometry changed and the recorded
    /// path must be rebuilt.
    fn before_update(&mut self) -> bool {
        false
    }
}

/// Stroke-only default for open outlines.
#[inline]
pub(crate) fn stroke_style() -> Style {
    Style::stroked(Color::BLACK, 1.0)
}
