//! Drawing surfaces.
//!
//! `Surface` is the immediate-mode 2D context the painter draws through. It
//! mirrors a canvas-style API: a current path, a save/restore state stack
//! (transform, clip, style) and fill/stroke/clip operations.
//!
//! Backends:
//! - `RasterSurface`: tiny-skia pixmap, used for on-screen layers and export
//! - `RecordingSurface`: records calls, used to inspect painter behavior

mod error;
mod raster;
mod recording;

pub use error::SurfaceError;
pub use raster::RasterSurface;
pub use recording::{RecordingSurface, SurfaceOp};

use crate::coords::Matrix;
use crate::paint::{LineCap, LineJoin, Paint};

/// Canvas-style 2D drawing context.
///
/// Coordinates passed to path methods are in user space and are mapped by the
/// current transform at the time of the call. Sizes are physical pixels.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Device pixel ratio the surface was created for.
    fn dpr(&self) -> f64;

    /// Reallocates the backing store. Contents are discarded.
    fn resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError>;

    /// Whether `set_line_dash` is honored natively by `stroke`.
    fn supports_line_dash(&self) -> bool {
        true
    }

    // ── state ─────────────────────────────────────────────────────────────

    fn save(&mut self);
    fn restore(&mut self);
    /// Replaces the current transform.
    fn set_transform(&mut self, m: &Matrix);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_fill_style(&mut self, paint: &Paint);
    fn set_stroke_style(&mut self, paint: &Paint);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_miter_limit(&mut self, limit: f64);
    /// Empty `dash` disables dashing.
    fn set_line_dash(&mut self, dash: &[f64], offset: f64);

    // ── path ──────────────────────────────────────────────────────────────

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn bezier_curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, x1: f64, y1: f64, x: f64, y: f64);
    /// Circular arc. Connects from the current point, if any.
    #[allow(clippy::too_many_arguments)]
    fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, anticlockwise: bool);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn close_path(&mut self);

    // ── drawing ───────────────────────────────────────────────────────────

    fn fill(&mut self);
    fn stroke(&mut self);
    /// Intersects the current clip with the current path.
    fn clip(&mut self);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Composites `src` at `(dx, dy)` scaled to `dw × dh` with the current
    /// transform, global alpha and clip.
    fn draw_image(&mut self, src: &Self, dx: f64, dy: f64, dw: f64, dh: f64)
    where
        Self: Sized;

    /// Allocates a new, cleared surface of the same backend.
    fn with_size(width: u32, height: u32, dpr: f64) -> Result<Self, SurfaceError>
    where
        Self: Sized;
}
