//! Recorded vector paths.
//!
//! A `PathProxy` records builder calls into a flat `f64` buffer of tagged
//! records (see [`PathCmd`]). The buffer is the single source of truth for
//! geometry queries (bounds, hit testing) and can be replayed onto any
//! [`Surface`](crate::surface::Surface).
//!
//! Building onto a live surface goes through [`BoundPath`], which records and
//! forwards in one pass, skipping sub-pixel line segments and decomposing
//! dashed strokes in software when the surface cannot dash natively.

mod bound;
mod cmd;
pub mod contain;
mod dash;
mod proxy;

pub use bound::BoundPath;
pub use cmd::{PathCmd, Segment, Segments};
pub use proxy::PathProxy;

/// Path construction interface shared by recorders and bound recorders.
///
/// Shapes describe their outline against this trait so that the same code
/// serves both "record only" and "record and draw".
pub trait PathBuilder {
    /// Starts a new, empty path.
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64);

    /// Circular arc; implicitly connects from the current point.
    fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool);

    /// Elliptical arc rotated by `rotation` radians.
    #[allow(clippy::too_many_arguments)]
    fn ellipse(
        &mut self,
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        rotation: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    );

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);
}
