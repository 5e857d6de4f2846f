use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::coords::{BoundingRect, Matrix, Viewport};
use crate::paint::Paint;
use crate::scene::{clip_changed, ClipChain, Drawable, Node, NodeId, Storage, Transformable};
use crate::surface::Surface;

use super::hover::HoverMirror;
use super::{Layer, LayerConfig, PainterError, RendererConfig};

/// Handle for one time slice of progressive painting.
///
/// Only the most recently armed handle is live; every `refresh` or
/// continuation step retires the previous one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Continuation {
    token: u64,
}

impl Continuation {
    #[inline]
    pub fn token(self) -> u64 {
        self.token
    }
}

/// Off-band layer of the progressive ring. Generation `g` of the queue is
/// painted onto slot `g % ring`.
#[derive(Debug)]
pub(crate) struct ProgressiveSlot<S> {
    pub(crate) layer: Layer<S>,
    /// zlevel the slot composites above: the highest host among the
    /// generations it receives.
    pub(crate) host: Option<i32>,
}

impl<S: Surface> ProgressiveSlot<S> {
    fn reset(&mut self, host: Option<i32>) {
        self.layer.clear(true);
        self.host = host;
    }
}

/// Consecutive progressive elements on one zlevel that share a key.
#[derive(Debug, Clone, PartialEq)]
struct Generation {
    host: i32,
    ids: Vec<NodeId>,
}

/// Per-layer drawing state carried across consecutive elements.
#[derive(Debug)]
pub(crate) struct PaintScope {
    /// Last element brushed since the surface state was last restored.
    pub(crate) prev: Option<NodeId>,
    /// Clip chain currently applied (inside its own save).
    pub(crate) clip: Option<ClipChain>,
    /// Clear node dirty flags after drawing.
    mark_clean: bool,
}

impl PaintScope {
    pub(crate) fn new(mark_clean: bool) -> Self {
        Self { prev: None, clip: None, mark_clean }
    }
}

/// Layered incremental painter.
///
/// Each zlevel present in the display list gets its own `Layer`, created on
/// first use. `refresh` repaints only layers whose elements changed, and
/// time-slices progressive elements (key `>= 0`) onto a small ring of extra
/// layers, one generation per `run_continuation` call.
///
/// Invariants:
/// - a layer is dirty while any generation assigned to it is unpainted
/// - at most one continuation is armed at a time
#[derive(Debug)]
pub struct Painter<S> {
    viewport: Viewport,
    dpr: f64,
    pub(crate) layers: BTreeMap<i32, Layer<S>>,
    layer_configs: HashMap<i32, LayerConfig>,
    pub(crate) slots: Vec<ProgressiveSlot<S>>,
    progressive_cap: usize,
    /// Progressive generations in scan order.
    queue: Vec<Generation>,
    /// Index into `queue` of the next generation to paint.
    next_generation: usize,
    token: u64,
    armed: Option<Continuation>,
    pub(crate) hovers: Vec<HoverMirror>,
    pub(crate) hover_layer: Option<Layer<S>>,
    background: Option<Paint>,
}

impl<S: Surface> Painter<S> {
    pub fn new(config: &RendererConfig) -> Self {
        Self {
            viewport: Viewport::new(config.width, config.height),
            dpr: config.dpr,
            layers: BTreeMap::new(),
            layer_configs: config.layers.clone(),
            slots: Vec::new(),
            progressive_cap: config.progressive_layer_cap,
            queue: Vec::new(),
            next_generation: 0,
            token: 0,
            armed: None,
            hovers: Vec::new(),
            hover_layer: None,
            background: config.background.clone(),
        }
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    #[inline]
    pub fn background(&self) -> Option<&Paint> {
        self.background.as_ref()
    }

    /// Paint drawn beneath every layer by `composite` and
    /// `render_to_surface`.
    pub fn set_background(&mut self, background: Option<Paint>) {
        self.background = background;
    }

    /// Currently armed continuation, if progressive work is pending.
    #[inline]
    pub fn armed(&self) -> Option<Continuation> {
        self.armed
    }

    #[inline]
    fn viewport_rect(&self) -> BoundingRect {
        BoundingRect::new(0.0, 0.0, self.viewport.width, self.viewport.height)
    }

    // ── layers ────────────────────────────────────────────────────────────

    /// Installs a caller-built layer at `zlevel`.
    ///
    /// Rejected without side effects when the zlevel is taken or the layer's
    /// surface is unusable.
    pub fn insert_layer(&mut self, zlevel: i32, mut layer: Layer<S>) -> Result<(), PainterError> {
        if self.layers.contains_key(&zlevel) || zlevel == super::HOVER_LAYER_ZLEVEL {
            log::error!("insert_layer: zlevel {zlevel} already occupied");
            return Err(PainterError::DuplicateZlevel { zlevel });
        }
        if !layer.is_valid() {
            log::error!("insert_layer: layer for zlevel {zlevel} is invalid");
            return Err(PainterError::InvalidLayer { zlevel });
        }
        layer.mark_dirty();
        self.layers.insert(zlevel, layer);
        Ok(())
    }

    /// Records settings for `zlevel`, applied now if the layer exists and on
    /// creation otherwise.
    pub fn config_layer(&mut self, zlevel: i32, config: LayerConfig) {
        if let Some(layer) = self.layers.get_mut(&zlevel) {
            layer.set_config(config.clone());
        }
        self.layer_configs.insert(zlevel, config);
    }

    /// Removes the layer at `zlevel`. Progressive work it hosts is dropped
    /// and restarts on the next refresh.
    pub fn del_layer(&mut self, zlevel: i32) -> Option<Layer<S>> {
        let removed = self.layers.remove(&zlevel)?;
        if self.queue.iter().any(|g| g.host == zlevel) {
            self.reset_progressive();
        }
        Some(removed)
    }

    /// Wipes the layer's pixels, bypassing motion blur.
    pub fn clear_layer(&mut self, zlevel: i32) {
        if let Some(layer) = self.layers.get_mut(&zlevel) {
            layer.clear(true);
        }
    }

    #[inline]
    pub fn get_layer(&self, zlevel: i32) -> Option<&Layer<S>> {
        self.layers.get(&zlevel)
    }

    #[inline]
    pub fn get_layer_mut(&mut self, zlevel: i32) -> Option<&mut Layer<S>> {
        self.layers.get_mut(&zlevel)
    }

    /// zlevels with a layer, in stacking order.
    pub fn zlevels(&self) -> impl Iterator<Item = i32> + '_ {
        self.layers.keys().copied()
    }

    /// Progressive ring layer at `index`, once allocated.
    #[inline]
    pub fn progressive_layer(&self, index: usize) -> Option<&Layer<S>> {
        self.slots.get(index).map(|s| &s.layer)
    }

    #[inline]
    pub fn progressive_layer_mut(&mut self, index: usize) -> Option<&mut Layer<S>> {
        self.slots.get_mut(index).map(|s| &mut s.layer)
    }

    /// Layer for `zlevel`, created with its recorded settings if missing.
    pub fn ensure_layer(&mut self, zlevel: i32) -> Result<&mut Layer<S>, PainterError> {
        if !self.layers.contains_key(&zlevel) {
            let config = self.layer_configs.get(&zlevel).cloned().unwrap_or_default();
            let layer = Layer::with_viewport(self.viewport, self.dpr, config)
                .map_err(|source| PainterError::MissingSurface { zlevel, source })?;
            log::debug!("created layer for zlevel {zlevel}");
            self.layers.insert(zlevel, layer);
        }
        self.layers.get_mut(&zlevel).ok_or(PainterError::InvalidLayer { zlevel })
    }

    /// Resizes every surface to the new logical viewport. All layers are
    /// marked dirty; the first failure is returned after attempting all.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), PainterError> {
        self.viewport = Viewport::new(width, height);
        let viewport = self.viewport;
        let mut first_err = None;

        let layers = self.layers.iter_mut().map(|(z, l)| (*z, l));
        let slots = self.slots.iter_mut().map(|s| (s.host.unwrap_or_default(), &mut s.layer));
        let hover = self.hover_layer.iter_mut().map(|l| (super::HOVER_LAYER_ZLEVEL, l));
        for (zlevel, layer) in layers.chain(slots).chain(hover) {
            if let Err(source) = layer.resize(viewport) {
                log::warn!("resize of zlevel {zlevel} failed: {source}");
                first_err.get_or_insert(PainterError::MissingSurface { zlevel, source });
            }
        }
        self.queue.clear();
        self.next_generation = 0;
        first_err.map_or(Ok(()), Err)
    }

    // ── refresh ───────────────────────────────────────────────────────────

    /// Rebuilds the display list and repaints changed layers.
    ///
    /// Non-progressive content is fully painted before this returns. When
    /// progressive generations are pending, the returned continuation paints
    /// the first of them.
    pub fn refresh(&mut self, storage: &mut Storage, paint_all: bool) -> Option<Continuation> {
        self.token += 1;
        self.armed = None;

        let list = storage.update_display_list(false).to_vec();
        self.update_layer_status(storage, &list);

        let queue = if self.progressive_cap > 0 {
            collect_generations(storage, &list)
        } else {
            Vec::new()
        };
        self.assign_progressive(queue, paint_all);

        let opened = self.paint_list(storage, &list, paint_all);

        let pending = self.pending_hosts();
        for (z, layer) in &mut self.layers {
            if layer.dirty && !opened.contains(z) {
                layer.clear(false);
            }
            layer.dirty = pending.contains(z);
        }
        log::debug!(
            "refresh: {} element(s), {} layer(s) painted, {} pending host(s)",
            list.len(),
            opened.len(),
            pending.len()
        );
        self.arm(!pending.is_empty())
    }

    /// Paints the next queued generation onto its ring slot.
    ///
    /// A handle other than the armed one is ignored and `None` is returned.
    pub fn run_continuation(&mut self, storage: &mut Storage, continuation: Continuation) -> Option<Continuation> {
        if self.armed != Some(continuation) {
            log::debug!("ignoring stale continuation {}", continuation.token);
            return None;
        }
        self.armed = None;

        let index = self.next_generation;
        let ring = self.slots.len();
        if let Some(generation) = self.queue.get(index).filter(|_| ring > 0) {
            let view = self.viewport_rect();
            let surface = self.slots[index % ring].layer.surface_mut();
            surface.save();
            let mut scope = PaintScope::new(true);
            for &id in &generation.ids {
                paint_element(storage, surface, &mut scope, id, view);
            }
            close_scope(surface, scope);
            self.next_generation += 1;

            let host = generation.host;
            let pending = self.pending_hosts();
            if let Some(layer) = self.layers.get_mut(&host) {
                layer.dirty = pending.contains(&host);
            }
            log::trace!("progressive generation {index} painted on slot {}", index % ring);
        }

        self.arm(self.next_generation < self.queue.len())
    }

    fn arm(&mut self, pending: bool) -> Option<Continuation> {
        if !pending {
            return None;
        }
        self.token += 1;
        let c = Continuation { token: self.token };
        self.armed = Some(c);
        Some(c)
    }

    fn pending_hosts(&self) -> BTreeSet<i32> {
        self.queue.iter().skip(self.next_generation).map(|g| g.host).collect()
    }

    fn reset_progressive(&mut self) {
        self.queue.clear();
        self.next_generation = 0;
        for slot in self.slots.iter_mut().filter(|s| s.host.is_some()) {
            slot.reset(None);
        }
    }

    /// Counts elements per zlevel and flags layers whose content changed.
    fn update_layer_status(&mut self, storage: &Storage, list: &[NodeId]) {
        let mut status: BTreeMap<i32, (usize, bool)> = BTreeMap::new();
        for node in list.iter().filter_map(|&id| storage.node(id)) {
            let entry = status.entry(node.zlevel()).or_default();
            entry.0 += 1;
            entry.1 |= node.is_dirty();
        }

        for (&zlevel, &(count, dirty)) in &status {
            match self.ensure_layer(zlevel) {
                Ok(layer) => {
                    if dirty || layer.element_count != count {
                        layer.dirty = true;
                    }
                    layer.element_count = count;
                }
                Err(err) => log::warn!("zlevel {zlevel} skipped: {err}"),
            }
        }
        for (z, layer) in &mut self.layers {
            if !status.contains_key(z) && layer.element_count != 0 {
                layer.element_count = 0;
                layer.dirty = true;
            }
        }
    }

    /// Replaces the generation queue when it changed or one of its hosts must
    /// repaint, and deals the generations round-robin onto the ring.
    /// Unchanged work keeps its progress.
    fn assign_progressive(&mut self, queue: Vec<Generation>, paint_all: bool) {
        let host_dirty = queue.iter().any(|g| self.layers.get(&g.host).is_none_or(|l| l.dirty));
        if !paint_all && !host_dirty && queue == self.queue {
            return;
        }
        self.reset_progressive();
        if queue.is_empty() {
            return;
        }

        let wanted = queue.len().min(self.progressive_cap);
        while self.slots.len() < wanted {
            match Layer::with_viewport(self.viewport, self.dpr, LayerConfig::default()) {
                Ok(layer) => self.slots.push(ProgressiveSlot { layer, host: None }),
                Err(err) => {
                    log::warn!("progressive layer {} unavailable: {err}", self.slots.len());
                    break;
                }
            }
        }
        let ring = self.slots.len();
        if ring == 0 {
            log::warn!("no progressive layer available; {} generation(s) skipped", queue.len());
            return;
        }

        for (g, generation) in queue.iter().enumerate() {
            let slot = &mut self.slots[g % ring];
            slot.host = slot.host.max(Some(generation.host));
        }
        self.queue = queue;
        log::debug!("{} progressive generation(s) over {ring} slot(s)", self.queue.len());

        for z in self.pending_hosts() {
            if let Some(layer) = self.layers.get_mut(&z) {
                layer.dirty = true;
            }
        }
    }

    /// Walks the display list once, painting elements of dirty layers.
    /// Returns the zlevels that were opened.
    fn paint_list(&mut self, storage: &mut Storage, list: &[NodeId], paint_all: bool) -> BTreeSet<i32> {
        let view = self.viewport_rect();
        let inline_progressive = self.progressive_cap == 0;
        let mut opened = BTreeSet::new();
        let mut current: Option<i32> = None;
        let mut scope: Option<PaintScope> = None;

        for &id in list {
            let Some((zlevel, progressive)) = storage.node(id).map(|n| (n.zlevel(), n.progressive() >= 0)) else {
                continue;
            };
            if current != Some(zlevel) {
                if let (Some(prev), Some(s)) = (current, scope.take()) {
                    if let Some(layer) = self.layers.get_mut(&prev) {
                        close_scope(layer.surface_mut(), s);
                    }
                }
                current = Some(zlevel);
                if let Some(layer) = self.layers.get_mut(&zlevel) {
                    if layer.dirty || paint_all {
                        layer.clear(false);
                        layer.surface_mut().save();
                        opened.insert(zlevel);
                        scope = Some(PaintScope::new(true));
                    }
                }
            }

            let Some(s) = scope.as_mut() else {
                continue;
            };
            if progressive && !inline_progressive {
                continue;
            }
            if let Some(layer) = self.layers.get_mut(&zlevel) {
                paint_element(storage, layer.surface_mut(), s, id, view);
            }
        }

        if let (Some(last), Some(s)) = (current, scope) {
            if let Some(layer) = self.layers.get_mut(&last) {
                close_scope(layer.surface_mut(), s);
            }
        }
        opened
    }

    // ── output ────────────────────────────────────────────────────────────

    /// Flattens background, layers (each followed by the progressive layers
    /// it hosts) and the hover layer into `target`.
    pub fn composite(&self, target: &mut S) {
        let w = target.width() as f64;
        let h = target.height() as f64;
        begin_output(target, self.background.as_ref());

        for (&z, layer) in &self.layers {
            target.draw_image(layer.surface(), 0.0, 0.0, w, h);
            for slot in self.slots.iter().filter(|s| s.host == Some(z)) {
                target.draw_image(slot.layer.surface(), 0.0, 0.0, w, h);
            }
        }
        if let Some(hover) = &self.hover_layer {
            target.draw_image(hover.surface(), 0.0, 0.0, w, h);
        }
    }

    /// Paints the whole display list, progressive elements included, into
    /// `target` in one pass. Layer state and node dirty flags are untouched.
    pub fn render_to_surface(&self, storage: &mut Storage, target: &mut S) {
        let list = storage.update_display_list(false).to_vec();
        let view = self.viewport_rect();
        begin_output(target, self.background.as_ref());

        target.save();
        let mut scope = PaintScope::new(false);
        for id in list {
            paint_element(storage, target, &mut scope, id, view);
        }
        close_scope(target, scope);
    }
}

/// Clears `target` under the identity transform and fills the background.
fn begin_output<S: Surface + ?Sized>(target: &mut S, background: Option<&Paint>) {
    let w = target.width() as f64;
    let h = target.height() as f64;
    target.set_transform(&Matrix::IDENTITY);
    target.set_global_alpha(1.0);
    target.clear_rect(0.0, 0.0, w, h);
    if let Some(bg) = background {
        target.save();
        target.set_fill_style(&bg.resolve(BoundingRect::new(0.0, 0.0, w, h)));
        target.fill_rect(0.0, 0.0, w, h);
        target.restore();
    }
}

/// Splits progressive elements into generations in paint order. A new
/// generation starts at every key or zlevel change and after any
/// non-progressive element.
fn collect_generations(storage: &Storage, list: &[NodeId]) -> Vec<Generation> {
    let mut queue: Vec<Generation> = Vec::new();
    let mut last: Option<(i32, i32)> = None;

    for &id in list {
        let Some(node) = storage.node(id) else {
            continue;
        };
        let (zlevel, key) = (node.zlevel(), node.progressive());
        if key < 0 {
            last = None;
            continue;
        }
        match queue.last_mut() {
            Some(generation) if last == Some((zlevel, key)) => generation.ids.push(id),
            _ => queue.push(Generation { host: zlevel, ids: vec![id] }),
        }
        last = Some((zlevel, key));
    }
    queue
}

/// True when the element would leave a visible mark.
pub(crate) fn is_drawable(node: &Node, view: BoundingRect) -> bool {
    let Some(d) = node.displayable() else {
        return false;
    };
    if d.invisible || d.style().opacity <= 0.0 {
        return false;
    }
    if node.world_transform().is_some_and(Matrix::is_zero_scale) {
        return false;
    }
    !d.culling || node.world_bounding_rect().is_none_or(|r| r.intersects(view))
}

/// Restores the previous clip and applies `chain` when they differ.
/// Returns true when the surface state was restored.
pub(crate) fn update_clip<S: Surface + ?Sized>(
    storage: &Storage,
    surface: &mut S,
    scope: &mut PaintScope,
    chain: Option<&ClipChain>,
) -> bool {
    if !clip_changed(scope.clip.as_ref(), chain) {
        return false;
    }
    let restored = scope.clip.take().is_some();
    if restored {
        surface.restore();
        scope.prev = None;
    }
    if let Some(chain) = chain {
        surface.save();
        let dpr = surface.dpr();
        for entry in chain.entries() {
            let Some(d) = storage.node(entry.node).and_then(Node::displayable) else {
                continue;
            };
            let m = entry.transform.unwrap_or(Matrix::IDENTITY).scale(dpr, dpr);
            surface.set_transform(&m);
            surface.begin_path();
            d.path().rebuild_path(surface);
            surface.clip();
        }
        scope.clip = Some(chain.clone());
    }
    restored
}

/// Draws one display-list element with clip scoping and style
/// de-duplication against the previous element.
pub(crate) fn paint_element<S: Surface + ?Sized>(
    storage: &mut Storage,
    surface: &mut S,
    scope: &mut PaintScope,
    id: NodeId,
    view: BoundingRect,
) {
    let chain = match storage.node(id) {
        Some(node) if is_drawable(node, view) => node.clip_chain().cloned(),
        Some(_) => {
            if scope.mark_clean {
                if let Some(node) = storage.node_mut_quiet(id) {
                    node.clear_dirty();
                }
            }
            return;
        }
        None => return,
    };

    update_clip(storage, surface, scope, chain.as_ref());

    let Some((node, prev)) = storage.node_with_prev(id, scope.prev) else {
        return;
    };
    node.brush(surface, prev);
    if scope.mark_clean {
        node.clear_dirty();
    }
    scope.prev = Some(id);
}

/// Pops the clip save (if any) and the layer save.
pub(crate) fn close_scope<S: Surface + ?Sized>(surface: &mut S, scope: PaintScope) {
    if scope.clip.is_some() {
        surface.restore();
    }
    surface.restore();
}
