use crate::paint::Style;
use crate::scene::{NodeId, Storage};
use crate::sort::stable_sort_by_key;
use crate::surface::Surface;

use super::painter::{close_scope, is_drawable, update_clip, PaintScope};
use super::{Layer, LayerConfig, Painter};

/// zlevel reserved for the hover overlay, above any scene layer.
pub const HOVER_LAYER_ZLEVEL: i32 = 100_000;

/// Overlay copy of a scene element: geometry and transform come from the
/// source node, the style is the mirror's own.
#[derive(Debug, Clone)]
pub struct HoverMirror {
    pub source: NodeId,
    pub style: Style,
}

impl<S: Surface> Painter<S> {
    /// Mirrors `source` on the hover layer with its style adjusted by
    /// `patch`. An existing mirror of the same node is replaced.
    ///
    /// Returns false when `source` is not a shape.
    pub fn add_hover(&mut self, storage: &Storage, source: NodeId, patch: impl FnOnce(&mut Style)) -> bool {
        let Some(mut style) = storage.node(source).and_then(|n| n.style()).cloned() else {
            return false;
        };
        patch(&mut style);
        let mirror = HoverMirror { source, style };
        match self.hovers.iter_mut().find(|m| m.source == source) {
            Some(existing) => *existing = mirror,
            None => self.hovers.push(mirror),
        }
        true
    }

    pub fn remove_hover(&mut self, source: NodeId) -> bool {
        let before = self.hovers.len();
        self.hovers.retain(|m| m.source != source);
        self.hovers.len() != before
    }

    pub fn clear_hover(&mut self) {
        self.hovers.clear();
        if let Some(layer) = &mut self.hover_layer {
            layer.clear(true);
        }
    }

    #[inline]
    pub fn hover_count(&self) -> usize {
        self.hovers.len()
    }

    #[inline]
    pub fn hover_layer(&self) -> Option<&Layer<S>> {
        self.hover_layer.as_ref()
    }

    #[inline]
    pub fn hover_layer_mut(&mut self) -> Option<&mut Layer<S>> {
        self.hover_layer.as_mut()
    }

    /// Repaints the hover layer from the current mirrors, dropping those
    /// whose source left the scene. Source nodes are not modified apart from
    /// their path caches.
    pub fn refresh_hover(&mut self, storage: &mut Storage) {
        self.hovers
            .retain(|m| storage.node(m.source).is_some_and(|n| n.is_attached()));

        if self.hover_layer.is_none() {
            match Layer::with_viewport(self.viewport(), self.dpr(), LayerConfig::default()) {
                Ok(layer) => self.hover_layer = Some(layer),
                Err(err) => {
                    log::warn!("hover layer unavailable: {err}");
                    return;
                }
            }
        }

        let view = crate::coords::BoundingRect::new(0.0, 0.0, self.viewport().width, self.viewport().height);
        stable_sort_by_key(&mut self.hovers, |m| {
            storage.node(m.source).map(|n| n.paint_key()).unwrap_or_default()
        });

        let Some(layer) = self.hover_layer.as_mut() else {
            return;
        };
        layer.clear(true);
        let surface = layer.surface_mut();
        surface.save();
        let mut scope = PaintScope::new(false);
        let mut prev: Option<&Style> = None;

        for mirror in &self.hovers {
            let chain = match storage.node(mirror.source) {
                Some(node) if is_drawable(node, view) => node.clip_chain().cloned(),
                _ => continue,
            };
            if update_clip(storage, surface, &mut scope, chain.as_ref()) {
                prev = None;
            }
            if let Some(node) = storage.node_mut_quiet(mirror.source) {
                node.brush_with_style(surface, prev, &mirror.style);
                prev = Some(&mirror.style);
            }
        }
        close_scope(surface, scope);
        log::trace!("hover layer: {} mirror(s)", self.hovers.len());
    }
}
