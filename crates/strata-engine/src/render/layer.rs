use crate::coords::{BoundingRect, Matrix, Viewport};
use crate::surface::{Surface, SurfaceError};

use super::LayerConfig;

/// One paint tier: a surface sized to the viewport times the device pixel
/// ratio, plus an optional back buffer used for motion blur.
///
/// Invariants:
/// - the back buffer, when present, has the surface's size
/// - `clear` leaves the surface with an identity transform and full alpha
#[derive(Debug)]
pub struct Layer<S> {
    surface: S,
    back: Option<S>,
    config: LayerConfig,
    pub(crate) dirty: bool,
    pub(crate) element_count: usize,
}

impl<S: Surface> Layer<S> {
    /// Wraps an existing surface.
    pub fn new(surface: S, config: LayerConfig) -> Self {
        Self {
            surface,
            back: None,
            config,
            dirty: true,
            element_count: 0,
        }
    }

    /// Allocates a surface for `viewport` at `dpr`.
    pub fn with_viewport(viewport: Viewport, dpr: f64, config: LayerConfig) -> Result<Self, SurfaceError> {
        let (w, h) = viewport.physical_size(dpr);
        Ok(Self::new(S::with_size(w, h, dpr)?, config))
    }

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn back_buffer(&self) -> Option<&S> {
        self.back.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &LayerConfig {
        &self.config
    }

    /// Replaces the settings; the back buffer is dropped when motion blur
    /// is turned off.
    pub fn set_config(&mut self, config: LayerConfig) {
        if !config.motion_blur {
            self.back = None;
        }
        self.config = config;
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Display-list elements counted on this layer by the last refresh.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Non-empty surface with a positive finite device pixel ratio.
    pub fn is_valid(&self) -> bool {
        let dpr = self.surface.dpr();
        self.surface.width() > 0 && self.surface.height() > 0 && dpr.is_finite() && dpr > 0.0
    }

    /// Resizes the surface (and back buffer) to `viewport` at the surface's
    /// device pixel ratio. Contents are discarded.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SurfaceError> {
        let (w, h) = viewport.physical_size(self.surface.dpr());
        self.surface.resize(w, h)?;
        if let Some(back) = &mut self.back {
            back.resize(w, h)?;
        }
        self.dirty = true;
        Ok(())
    }

    /// Clears the surface for a new frame.
    ///
    /// With motion blur on and `clear_all` unset, the previous content is
    /// kept in the back buffer and drawn back at `last_frame_alpha` over the
    /// clear color.
    pub fn clear(&mut self, clear_all: bool) {
        let w = self.surface.width() as f64;
        let h = self.surface.height() as f64;
        let blur = self.config.motion_blur && !clear_all;

        if blur && self.back.is_none() {
            match S::with_size(self.surface.width(), self.surface.height(), self.surface.dpr()) {
                Ok(back) => self.back = Some(back),
                Err(err) => log::warn!("motion blur disabled for this frame: {err}"),
            }
        }
        let back = if blur { self.back.as_mut() } else { None };
        if let Some(back) = back {
            back.set_transform(&Matrix::IDENTITY);
            back.set_global_alpha(1.0);
            back.clear_rect(0.0, 0.0, w, h);
            back.draw_image(&self.surface, 0.0, 0.0, w, h);
        }

        let s = &mut self.surface;
        s.set_transform(&Matrix::IDENTITY);
        s.set_global_alpha(1.0);
        s.clear_rect(0.0, 0.0, w, h);

        if let Some(paint) = &self.config.clear_color {
            s.save();
            s.set_fill_style(&paint.resolve(BoundingRect::new(0.0, 0.0, w, h)));
            s.fill_rect(0.0, 0.0, w, h);
            s.restore();
        }

        if blur {
            if let Some(back) = &self.back {
                s.save();
                s.set_global_alpha(self.config.last_frame_alpha.clamp(0.0, 1.0));
                s.draw_image(back, 0.0, 0.0, w, h);
                s.restore();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, Paint};
    use crate::surface::{RasterSurface, RecordingSurface, SurfaceOp};

    fn blur_layer() -> Layer<RasterSurface> {
        let config = LayerConfig { motion_blur: true, ..LayerConfig::default() };
        Layer::new(RasterSurface::new(4, 4, 1.0).unwrap(), config)
    }

    fn paint_red(layer: &mut Layer<RasterSurface>) {
        let s = layer.surface_mut();
        s.set_fill_style(&Paint::solid(Color::rgb(255, 0, 0)));
        s.fill_rect(0.0, 0.0, 4.0, 4.0);
    }

    fn alpha(layer: &Layer<RasterSurface>) -> i32 {
        layer.surface().pixel(1, 1).map_or(-1, |p| p[3] as i32)
    }

    // ── motion blur ───────────────────────────────────────────────────────

    #[test]
    fn previous_frame_fades_by_last_frame_alpha() {
        let mut layer = blur_layer();
        layer.clear(false);
        paint_red(&mut layer);
        assert_eq!(alpha(&layer), 255);

        // Second clear with no draws in between: frame 1 at 0.7 under an
        // empty frame 2.
        layer.clear(false);
        assert!((alpha(&layer) - 178).abs() <= 2, "alpha {}", alpha(&layer));

        layer.clear(false);
        assert!((alpha(&layer) - 125).abs() <= 3, "alpha {}", alpha(&layer));
    }

    #[test]
    fn clear_all_bypasses_the_back_buffer() {
        let mut layer = blur_layer();
        paint_red(&mut layer);
        layer.clear(true);
        assert_eq!(alpha(&layer), 0);
    }

    #[test]
    fn disabling_blur_drops_the_back_buffer() {
        let mut layer = blur_layer();
        layer.clear(false);
        assert!(layer.back_buffer().is_some());
        layer.set_config(LayerConfig::default());
        assert!(layer.back_buffer().is_none());
    }

    // ── clear color ───────────────────────────────────────────────────────

    #[test]
    fn clear_color_fills_after_clear() {
        let config = LayerConfig { clear_color: Some(Paint::solid(Color::WHITE)), ..LayerConfig::default() };
        let mut layer = Layer::new(RecordingSurface::new(8, 8), config);
        layer.clear(false);
        let ops = layer.surface_mut().take_ops();
        assert_eq!(
            ops,
            vec![
                SurfaceOp::SetTransform(Matrix::IDENTITY),
                SurfaceOp::GlobalAlpha(1.0),
                SurfaceOp::ClearRect(0.0, 0.0, 8.0, 8.0),
                SurfaceOp::Save,
                SurfaceOp::FillStyle(Paint::solid(Color::WHITE)),
                SurfaceOp::FillRect(0.0, 0.0, 8.0, 8.0),
                SurfaceOp::Restore,
            ]
        );
    }

    #[test]
    fn resize_follows_dpr() {
        let surface = RecordingSurface::new(1, 1).with_dpr(2.0);
        let mut layer = Layer::new(surface, LayerConfig::default());
        layer.resize(Viewport::new(10.0, 5.0)).unwrap();
        assert_eq!((layer.surface().width(), layer.surface().height()), (20, 10));
    }
}
