use crate::coords::{BoundingRect, Matrix, Vec2};
use crate::paint::Style;
use crate::path::{PathBuilder, PathProxy};
use crate::surface::Surface;

use super::shapes::ShapeGeometry;

/// Default minimum stroke width used for hit testing stroke-only shapes.
const STROKE_CONTAIN_THRESHOLD: f64 = 5.0;

/// Drawable payload of a shape node: geometry, style and the recorded path.
///
/// The path is recorded once per geometry change and replayed on every
/// draw; the local bounding rect is cached alongside it.
#[derive(Debug)]
pub struct Displayable {
    shape: Box<dyn ShapeGeometry>,
    style: Style,
    path: PathProxy,
    path_dirty: bool,
    rect: Option<BoundingRect>,
    /// Kept in the display list but never drawn.
    pub invisible: bool,
    /// Skip drawing when the world bounds miss the viewport.
    pub culling: bool,
    /// Generation key for time-sliced painting; negative disables it.
    pub progressive: i32,
    /// Ignored by hit testing.
    pub silent: bool,
    pub stroke_contain_threshold: f64,
}

impl Displayable {
    pub fn new(shape: impl ShapeGeometry + 'static) -> Self {
        let style = shape.default_style();
        Self {
            shape: Box::new(shape),
            style,
            path: PathProxy::new(),
            path_dirty: true,
            rect: None,
            invisible: false,
            culling: false,
            progressive: -1,
            silent: false,
            stroke_contain_threshold: STROKE_CONTAIN_THRESHOLD,
        }
    }

    #[inline]
    pub fn geometry(&self) -> &dyn ShapeGeometry {
        self.shape.as_ref()
    }

    /// Mutable geometry access; the path is re-recorded on the next update.
    pub fn geometry_mut(&mut self) -> &mut dyn ShapeGeometry {
        self.path_dirty = true;
        self.shape.as_mut()
    }

    pub fn set_geometry(&mut self, shape: impl ShapeGeometry + 'static) {
        self.shape = Box::new(shape);
        self.path_dirty = true;
    }

    #[inline]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    #[inline]
    pub fn path(&self) -> &PathProxy {
        &self.path
    }

    #[inline]
    pub fn is_path_dirty(&self) -> bool {
        self.path_dirty
    }

    #[inline]
    pub fn mark_path_dirty(&mut self) {
        self.path_dirty = true;
    }

    pub(crate) fn before_update(&mut self) {
        if self.shape.before_update() {
            self.path_dirty = true;
        }
    }

    /// Re-records the path when the geometry changed.
    pub(crate) fn update_path(&mut self) {
        if !self.path_dirty {
            return;
        }
        self.path.begin_path();
        self.shape.build_path(&mut self.path);
        self.rect = Some(self.path.bounding_rect());
        self.path_dirty = false;
    }

    /// Bounds of the recorded path, without stroke.
    pub fn path_rect(&self) -> BoundingRect {
        self.rect.unwrap_or_else(|| self.path.bounding_rect())
    }

    /// Local bounds inflated by the stroke for the given world matrix.
    pub fn bounding_rect(&self, world: Option<&Matrix>) -> BoundingRect {
        stroke_bounds(self.path_rect(), &self.style, self.stroke_contain_threshold, world)
    }

    /// Containment of a point already in local coordinates.
    ///
    /// The stroke is tested first; stroke-only shapes use at least
    /// `stroke_contain_threshold` as the width so thin lines stay pickable.
    pub fn contain_local(&self, x: f64, y: f64, world: Option<&Matrix>) -> bool {
        if !self.bounding_rect(world).contains(Vec2::new(x, y)) {
            return false;
        }
        let style = &self.style;
        if style.has_stroke() {
            let scale = if style.stroke_no_scale { line_scale(world) } else { 1.0 };
            if scale > 1e-10 {
                let mut lw = style.line_width;
                if !style.has_fill() {
                    lw = lw.max(self.stroke_contain_threshold);
                }
                if self.path.contain_stroke(lw / scale, x, y) {
                    return true;
                }
            }
        }
        style.has_fill() && self.path.contain(x, y)
    }

    /// Draws the shape with `world` as its transform.
    ///
    /// `style_override` replaces the own style for this draw only.
    pub(crate) fn brush<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        world: Option<&Matrix>,
        prev: Option<&Style>,
        style_override: Option<&Style>,
    ) {
        self.update_path();

        let dpr = surface.dpr();
        let m = world.map_or(Matrix::IDENTITY, |w| *w).scale(dpr, dpr);
        surface.set_transform(&m);

        let style = style_override.unwrap_or(&self.style);
        let rect = stroke_bounds(self.path_rect(), style, self.stroke_contain_threshold, world);
        let scale = if style.stroke_no_scale { line_scale(world) } else { 1.0 };
        style.bind(surface, prev, rect, scale);

        let (sx, sy) = world.map_or((1.0, 1.0), Matrix::scale_factors);
        self.path.set_scale(sx, sy, dpr);

        let has_fill = style.has_fill();
        let has_stroke = style.has_stroke();
        let dash = if has_stroke { style.active_dash() } else { None };

        match dash {
            Some(dash) if !surface.supports_line_dash() => {
                if has_fill {
                    surface.begin_path();
                    self.path.rebuild_path(surface);
                    surface.fill();
                }
                self.path.set_line_dash(Some(dash), style.line_dash_offset);
                let mut bound = self.path.bind(surface);
                bound.begin_path();
                self.shape.build_path(&mut bound);
                bound.finish();
                surface.stroke();
                self.path.set_line_dash(None, 0.0);
            }
            _ => {
                surface.begin_path();
                self.path.rebuild_path(surface);
                if has_fill {
                    surface.fill();
                }
                if let Some(dash) = dash {
                    surface.set_line_dash(dash, style.line_dash_offset);
                }
                if has_stroke {
                    surface.stroke();
                }
                if dash.is_some() {
                    surface.set_line_dash(&[], 0.0);
                }
            }
        }
    }
}

/// Scale applied to strokes by `world`; 1 when the diagonal is unscaled.
fn line_scale(world: Option<&Matrix>) -> f64 {
    match world {
        Some(Matrix(m)) if (m[0] - 1.0).abs() > 1e-10 && (m[3] - 1.0).abs() > 1e-10 => {
            (m[0] * m[3] - m[2] * m[1]).abs().sqrt()
        }
        _ => 1.0,
    }
}

fn stroke_bounds(rect: BoundingRect, style: &Style, threshold: f64, world: Option<&Matrix>) -> BoundingRect {
    if !style.has_stroke() {
        return rect;
    }
    let mut w = style.line_width;
    if !style.has_fill() {
        w = w.max(if threshold > 0.0 { threshold } else { 4.0 });
    }
    let scale = if style.stroke_no_scale { line_scale(world) } else { 1.0 };
    if scale > 1e-10 {
        rect.inflate(w / scale / 2.0)
    } else {
        rect
    }
}
