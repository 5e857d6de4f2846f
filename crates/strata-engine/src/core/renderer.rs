use std::mem;
use std::time::Instant;

use crate::paint::Style;
use crate::render::{Continuation, Painter, PainterError, RendererConfig};
use crate::scene::{NodeId, Storage};
use crate::surface::{Surface, SurfaceError};
use crate::time::{FrameClock, FrameTime};

/// What a `Renderer::tick` did.
#[derive(Debug, Copy, Clone)]
pub struct FrameResult {
    pub time: FrameTime,
    /// The display list was rebuilt and changed layers repainted.
    pub refreshed: bool,
    /// One progressive generation was painted instead of a refresh.
    pub progressive_step: bool,
    /// Progressive work remains; the host should keep ticking.
    pub pending: bool,
}

/// Scene storage plus painter, driven one frame at a time by the host.
///
/// A tick either refreshes (when the scene requested a repaint) or advances
/// the armed progressive continuation, never both.
#[derive(Debug)]
pub struct Renderer<S> {
    storage: Storage,
    painter: Painter<S>,
    clock: FrameClock,
    continuation: Option<Continuation>,
    paint_all_pending: bool,
    hover_pending: bool,
}

impl<S: Surface> Renderer<S> {
    pub fn new(config: &RendererConfig) -> Self {
        log::debug!(
            "renderer {}x{} @{} (progressive cap {})",
            config.width,
            config.height,
            config.dpr,
            config.progressive_layer_cap
        );
        Self {
            storage: Storage::new(),
            painter: Painter::new(config),
            clock: FrameClock::new(),
            continuation: None,
            paint_all_pending: true,
            hover_pending: false,
        }
    }

    #[inline]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    #[inline]
    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    #[inline]
    pub fn painter(&self) -> &Painter<S> {
        &self.painter
    }

    #[inline]
    pub fn painter_mut(&mut self) -> &mut Painter<S> {
        &mut self.painter
    }

    /// Whether a progressive continuation is waiting for the next tick.
    #[inline]
    pub fn has_pending_work(&self) -> bool {
        self.continuation.is_some()
    }

    /// Advances one frame.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        let time = self.clock.tick(now);
        let mut result = FrameResult { time, refreshed: false, progressive_step: false, pending: false };

        let paint_all = mem::take(&mut self.paint_all_pending);
        if self.storage.take_refresh_request() || paint_all {
            self.continuation = self.painter.refresh(&mut self.storage, paint_all);
            result.refreshed = true;
            self.hover_pending = true;
        } else if let Some(c) = self.continuation.take() {
            self.continuation = self.painter.run_continuation(&mut self.storage, c);
            result.progressive_step = true;
        }

        if mem::take(&mut self.hover_pending)
            && (self.painter.hover_count() > 0 || self.painter.hover_layer().is_some())
        {
            self.painter.refresh_hover(&mut self.storage);
        }

        result.pending = self.continuation.is_some();
        log::trace!(
            "frame {}: refreshed={} progressive={} pending={}",
            time.frame_index,
            result.refreshed,
            result.progressive_step,
            result.pending
        );
        result
    }

    /// Paints everything now: a refresh if one is due, then every remaining
    /// progressive generation.
    pub fn flush(&mut self) {
        let paint_all = mem::take(&mut self.paint_all_pending);
        if self.storage.take_refresh_request() || paint_all {
            self.continuation = self.painter.refresh(&mut self.storage, paint_all);
            self.hover_pending = true;
        }
        while let Some(c) = self.continuation.take() {
            self.continuation = self.painter.run_continuation(&mut self.storage, c);
        }
        if mem::take(&mut self.hover_pending) && self.painter.hover_count() > 0 {
            self.painter.refresh_hover(&mut self.storage);
        }
    }

    /// Resizes every layer; the next tick repaints all of them.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), PainterError> {
        self.paint_all_pending = true;
        self.hover_pending = true;
        self.painter.resize(width, height)
    }

    pub fn add_hover(&mut self, source: NodeId, patch: impl FnOnce(&mut Style)) -> bool {
        let added = self.painter.add_hover(&self.storage, source, patch);
        self.hover_pending |= added;
        added
    }

    pub fn remove_hover(&mut self, source: NodeId) -> bool {
        let removed = self.painter.remove_hover(source);
        self.hover_pending |= removed;
        removed
    }

    pub fn clear_hover(&mut self) {
        self.painter.clear_hover();
    }

    /// Flattens all layers into `target`.
    pub fn composite(&self, target: &mut S) {
        self.painter.composite(target);
    }

    /// Composites into a fresh surface of the viewport's physical size.
    pub fn snapshot(&self) -> Result<S, SurfaceError> {
        let (w, h) = self.painter.viewport().physical_size(self.painter.dpr());
        let mut target = S::with_size(w, h, self.painter.dpr())?;
        self.painter.composite(&mut target);
        Ok(target)
    }

    /// Paints the whole scene straight into a fresh surface, bypassing the
    /// layer cache and progressive slicing.
    pub fn render_to_surface(&mut self) -> Result<S, SurfaceError> {
        let (w, h) = self.painter.viewport().physical_size(self.painter.dpr());
        let mut target = S::with_size(w, h, self.painter.dpr())?;
        self.painter.render_to_surface(&mut self.storage, &mut target);
        Ok(target)
    }

    /// Drops the scene, hover mirrors and pending work.
    pub fn dispose(&mut self) {
        self.continuation = None;
        self.painter.clear_hover();
        self.storage.dispose();
        self.paint_all_pending = true;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::paint::{Color, Paint};
    use crate::scene::Node;
    use crate::scene::shapes::Rect;
    use crate::surface::{RasterSurface, RecordingSurface, SurfaceOp};

    fn config() -> RendererConfig {
        RendererConfig { width: 20.0, height: 20.0, ..RendererConfig::default() }
    }

    fn add_root(r: &mut Renderer<impl Surface>, node: Node) -> NodeId {
        let storage = r.storage_mut();
        let id = storage.insert(node);
        storage.add_root(id).unwrap();
        id
    }

    #[test]
    fn progressive_scene_settles_over_ticks() {
        let mut r = Renderer::<RecordingSurface>::new(&config());
        for i in 0..9 {
            add_root(&mut r, Node::shape(Rect::new(i as f64, 0.0, 1.0, 1.0)).with_progressive(i / 3));
        }
        let t0 = Instant::now();
        let frames: Vec<FrameResult> =
            (0..5).map(|i| r.tick(t0 + Duration::from_millis(16 * i))).collect();

        assert!(frames[0].refreshed && frames[0].pending);
        assert!(frames[1..4].iter().all(|f| f.progressive_step && !f.refreshed));
        assert!(!frames[3].pending);
        assert!(!frames[4].refreshed && !frames[4].progressive_step);
    }

    #[test]
    fn mutation_preempts_progressive_work() {
        let mut r = Renderer::<RecordingSurface>::new(&config());
        let ids: Vec<NodeId> = (0..6)
            .map(|i| add_root(&mut r, Node::shape(Rect::new(0.0, 0.0, 1.0, 1.0)).with_progressive(i / 2)))
            .collect();
        let t0 = Instant::now();
        r.tick(t0);
        r.storage_mut().mark_dirty(ids[0]);
        let f = r.tick(t0 + Duration::from_millis(16));
        assert!(f.refreshed && !f.progressive_step && f.pending);
    }

    #[test]
    fn hover_overlay_is_composited_last() {
        let mut r = Renderer::<RecordingSurface>::new(&config());
        let id = add_root(&mut r, Node::shape(Rect::new(0.0, 0.0, 5.0, 5.0)));
        assert!(r.add_hover(id, |s| s.fill = Some(Paint::solid(Color::WHITE))));
        r.tick(Instant::now());

        let hover_id = r.painter().hover_layer().map(|l| l.surface().id());
        let mut target = RecordingSurface::new(20, 20);
        r.composite(&mut target);
        let last = target.ops().iter().rev().find_map(|op| match op {
            SurfaceOp::DrawImage { src, .. } => Some(*src),
            _ => None,
        });
        assert!(hover_id.is_some());
        assert_eq!(last, hover_id);
    }

    #[test]
    fn flush_and_snapshot_produce_pixels() {
        let mut r = Renderer::<RasterSurface>::new(&config());
        add_root(
            &mut r,
            Node::shape(Rect::new(0.0, 0.0, 10.0, 10.0))
                .with_style(crate::paint::Style::filled(Color::rgb(0, 0, 255)))
                .with_progressive(0),
        );
        r.flush();
        assert!(!r.has_pending_work());

        let img = r.snapshot().unwrap();
        assert_eq!(img.pixel(5, 5), Some([0, 0, 255, 255]));
        assert_eq!(img.pixel(15, 15), Some([0, 0, 0, 0]));

        let direct = r.render_to_surface().unwrap();
        assert_eq!(direct.pixel(5, 5), Some([0, 0, 255, 255]));
    }

    #[test]
    fn resize_repaints_everything() {
        let mut r = Renderer::<RecordingSurface>::new(&config());
        add_root(&mut r, Node::shape(Rect::new(0.0, 0.0, 5.0, 5.0)));
        let t0 = Instant::now();
        r.tick(t0);
        assert!(!r.tick(t0 + Duration::from_millis(16)).refreshed);
        r.resize(40.0, 40.0).unwrap();
        assert!(r.tick(t0 + Duration::from_millis(32)).refreshed);
        assert_eq!(r.painter().get_layer(0).map(|l| l.surface().width()), Some(40));
    }

    #[test]
    fn dispose_empties_the_scene() {
        let mut r = Renderer::<RecordingSurface>::new(&config());
        add_root(&mut r, Node::shape(Rect::new(0.0, 0.0, 5.0, 5.0)));
        r.tick(Instant::now());
        r.dispose();
        assert!(r.storage().is_empty());
        assert!(!r.has_pending_work());
    }
}
