use crate::coords::{BoundingRect, Matrix, Vec2};
use crate::paint::Style;
use crate::surface::Surface;

use super::{
    AnimationState, ClipChain, Displayable, Drawable, EventEmitter, Hittable, PaintKey,
    Transform, Transformable,
};
use super::shapes::ShapeGeometry;

slotmap::new_key_type! {
    /// Handle of a node in the scene arena.
    pub struct NodeId;
}

/// Group or leaf payload.
#[derive(Debug)]
pub enum NodeKind {
    /// Container; owns the ordered child list while attached.
    Group { children: Vec<NodeId> },
    /// Leaf that ends up in the display list.
    Shape(Box<Displayable>),
}

/// A scene node: transform, paint ordering, flags and a group or shape
/// payload.
///
/// Mutations through setters mark the node dirty so the next traversal
/// recomputes its world transform and the painter repaints its layer.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    transform: Transform,
    zlevel: i32,
    z: i32,
    z2: i32,
    ignore: bool,
    clip_path: Option<NodeId>,
    pub events: EventEmitter,
    pub animation: AnimationState,

    pub(crate) parent: Option<NodeId>,
    pub(crate) dirty: bool,
    pub(crate) attached: bool,
    pub(crate) world: Option<Matrix>,
    pub(crate) inv: Option<Matrix>,
    pub(crate) clip_chain: Option<ClipChain>,
    /// Element this node currently clips, when used as a clip path.
    pub(crate) clip_target: Option<NodeId>,
}

impl Node {
    fn with_kind(kind: NodeKind) -> Self {
        Self {
            kind,
            transform: Transform::default(),
            zlevel: 0,
            z: 0,
            z2: 0,
            ignore: false,
            clip_path: None,
            events: EventEmitter::default(),
            animation: AnimationState::default(),
            parent: None,
            dirty: true,
            attached: false,
            world: None,
            inv: None,
            clip_chain: None,
            clip_target: None,
        }
    }

    pub fn group() -> Self {
        Self::with_kind(NodeKind::Group { children: Vec::new() })
    }

    /// Leaf with `geometry`, styled with the geometry's default style.
    pub fn shape(geometry: impl ShapeGeometry + 'static) -> Self {
        Self::with_kind(NodeKind::Shape(Box::new(Displayable::new(geometry))))
    }

    // ── builders ──────────────────────────────────────────────────────────

    pub fn with_style(mut self, style: Style) -> Self {
        if let Some(s) = self.style_mut() {
            *s = style;
        }
        self
    }

    pub fn with_z(mut self, zlevel: i32, z: i32, z2: i32) -> Self {
        self.zlevel = zlevel;
        self.z = z;
        self.z2 = z2;
        self
    }

    pub fn with_position(mut self, x: f64, y: f64) -> Self {
        self.transform.position = Vec2::new(x, y);
        self
    }

    pub fn with_rotation(mut self, rad: f64) -> Self {
        self.transform.rotation = rad;
        self
    }

    pub fn with_scale(mut self, sx: f64, sy: f64) -> Self {
        self.transform.scale = Vec2::new(sx, sy);
        self
    }

    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.transform.origin = Some(Vec2::new(x, y));
        self
    }

    /// Sets the time-slicing generation key (shape nodes only).
    pub fn with_progressive(mut self, key: i32) -> Self {
        if let NodeKind::Shape(d) = &mut self.kind {
            d.progressive = key;
        }
        self
    }

    // ── payload ───────────────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    /// Children of a group; empty for shapes.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::Shape(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            NodeKind::Group { children } => Some(children),
            NodeKind::Shape(_) => None,
        }
    }

    pub fn displayable(&self) -> Option<&Displayable> {
        match &self.kind {
            NodeKind::Shape(d) => Some(d),
            NodeKind::Group { .. } => None,
        }
    }

    /// Mutable payload access; marks the node dirty.
    pub fn displayable_mut(&mut self) -> Option<&mut Displayable> {
        self.dirty = true;
        self.displayable_mut_clean()
    }

    pub(crate) fn displayable_mut_clean(&mut self) -> Option<&mut Displayable> {
        match &mut self.kind {
            NodeKind::Shape(d) => Some(d),
            NodeKind::Group { .. } => None,
        }
    }

    pub fn style(&self) -> Option<&Style> {
        self.displayable().map(Displayable::style)
    }

    /// Mutable style access; marks the node dirty.
    pub fn style_mut(&mut self) -> Option<&mut Style> {
        self.displayable_mut().map(Displayable::style_mut)
    }

    // ── ordering & flags ──────────────────────────────────────────────────

    #[inline]
    pub fn zlevel(&self) -> i32 {
        self.zlevel
    }

    #[inline]
    pub fn z(&self) -> i32 {
        self.z
    }

    #[inline]
    pub fn z2(&self) -> i32 {
        self.z2
    }

    #[inline]
    pub fn paint_key(&self) -> PaintKey {
        PaintKey::new(self.zlevel, self.z, self.z2)
    }

    pub fn set_z(&mut self, zlevel: i32, z: i32, z2: i32) {
        self.zlevel = zlevel;
        self.z = z;
        self.z2 = z2;
        self.dirty = true;
    }

    #[inline]
    pub fn ignore(&self) -> bool {
        self.ignore
    }

    /// Ignored nodes (and their subtrees) are left out of the display list.
    pub fn set_ignore(&mut self, ignore: bool) {
        self.ignore = ignore;
        self.dirty = true;
    }

    /// Progressive generation key; negative for groups and regular shapes.
    pub fn progressive(&self) -> i32 {
        self.displayable().map_or(-1, |d| d.progressive)
    }

    #[inline]
    pub fn clip_path(&self) -> Option<NodeId> {
        self.clip_path
    }

    pub(crate) fn set_clip_path_raw(&mut self, clip: Option<NodeId>) {
        self.clip_path = clip;
        self.dirty = true;
    }

    /// Clip chain resolved by the last traversal.
    #[inline]
    pub fn clip_chain(&self) -> Option<&ClipChain> {
        self.clip_chain.as_ref()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    // ── transform shortcuts ───────────────────────────────────────────────

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.transform_mut().position = Vec2::new(x, y);
    }

    pub fn set_rotation(&mut self, rad: f64) {
        self.transform_mut().rotation = rad;
    }

    pub fn set_scale(&mut self, sx: f64, sy: f64) {
        self.transform_mut().scale = Vec2::new(sx, sy);
    }

    pub fn set_origin(&mut self, origin: Option<Vec2>) {
        self.transform_mut().origin = origin;
    }

    /// Bounds of a shape in world coordinates.
    pub fn world_bounding_rect(&self) -> Option<BoundingRect> {
        let d = self.displayable()?;
        let rect = d.bounding_rect(self.world.as_ref());
        Some(match &self.world {
            Some(m) => rect.transformed(m),
            None => rect,
        })
    }

    /// Draws with `style` instead of the own style, leaving the node
    /// untouched apart from its path cache.
    pub(crate) fn brush_with_style<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        prev: Option<&Style>,
        style: &Style,
    ) {
        let world = self.world;
        if let NodeKind::Shape(d) = &mut self.kind {
            d.brush(surface, world.as_ref(), prev, Some(style));
        }
    }

    /// World transform applied to this node's clip paths: the clip's local
    /// transform composed with the clipped element's world matrix.
    pub(crate) fn bind_as_clip(&mut self, clipped_world: Option<&Matrix>) {
        self.update_transform(clipped_world);
        if let Some(d) = self.displayable_mut_clean() {
            d.before_update();
            d.update_path();
        }
    }
}

impl Transformable for Node {
    #[inline]
    fn transform(&self) -> &Transform {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut Transform {
        self.dirty = true;
        &mut self.transform
    }

    #[inline]
    fn world_transform(&self) -> Option<&Matrix> {
        self.world.as_ref()
    }

    #[inline]
    fn inverse_transform(&self) -> Option<&Matrix> {
        self.inv.as_ref()
    }

    fn update_transform(&mut self, parent: Option<&Matrix>) {
        self.world = self.transform.resolve(parent);
        self.inv = self.world.as_ref().and_then(Matrix::invert);
    }
}

impl Drawable for Node {
    /// Local bounds of a shape; groups report an empty rect (use
    /// `Storage::bounding_rect` for the union of a subtree).
    fn bounding_rect(&self) -> BoundingRect {
        self.displayable()
            .map_or_else(BoundingRect::default, |d| d.bounding_rect(self.world.as_ref()))
    }

    fn before_update(&mut self) {
        if let Some(d) = self.displayable_mut_clean() {
            d.before_update();
        }
    }

    fn update(&mut self) {
        if let Some(d) = self.displayable_mut_clean() {
            d.update_path();
        }
    }

    fn brush<S: Surface + ?Sized>(&mut self, surface: &mut S, prev: Option<&Self>) {
        let prev_style = prev.and_then(Node::style);
        let world = self.world;
        if let NodeKind::Shape(d) = &mut self.kind {
            d.brush(surface, world.as_ref(), prev_style, None);
        }
    }
}

impl Hittable for Node {
    fn contain(&self, x: f64, y: f64) -> bool {
        let Some(d) = self.displayable() else {
            return false;
        };
        let local = self.transform_coord_to_local(x, y);
        d.contain_local(local.x, local.y, self.world.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{Color, Paint};
    use crate::scene::shapes::{Circle, Rect};
    use crate::surface::{RecordingSurface, SurfaceOp};

    fn square() -> Node {
        let mut n = Node::shape(Rect::new(0.0, 0.0, 10.0, 10.0));
        n.update();
        n
    }

    // ── flags ─────────────────────────────────────────────────────────────

    #[test]
    fn new_nodes_are_dirty_and_detached() {
        let n = Node::group();
        assert!(n.is_dirty());
        assert!(!n.is_attached());
        assert!(n.children().is_empty());
    }

    #[test]
    fn setters_mark_dirty() {
        let mut n = square();
        n.clear_dirty();
        n.set_position(1.0, 2.0);
        assert!(n.is_dirty());

        n.clear_dirty();
        if let Some(s) = n.style_mut() {
            s.opacity = 0.5;
        }
        assert!(n.is_dirty());
    }

    #[test]
    fn groups_have_no_style() {
        let mut g = Node::group().with_style(Style::filled(Color::WHITE));
        assert!(g.style().is_none());
        assert!(g.style_mut().is_none());
        assert_eq!(g.progressive(), -1);
    }

    // ── hit testing ───────────────────────────────────────────────────────

    #[test]
    fn contain_uses_world_transform() {
        let mut n = square().with_position(100.0, 0.0);
        n.update_transform(None);
        assert!(n.contain(105.0, 5.0));
        assert!(!n.contain(5.0, 5.0));
    }

    #[test]
    fn contain_respects_scale() {
        let mut n = Node::shape(Circle::new(0.0, 0.0, 10.0)).with_scale(2.0, 2.0);
        n.update();
        n.update_transform(None);
        assert!(n.contain(15.0, 0.0));
        assert!(!n.contain(25.0, 0.0));
    }

    #[test]
    fn world_bounds_follow_the_transform() {
        let mut n = square().with_position(5.0, 5.0).with_scale(2.0, 2.0);
        n.update_transform(None);
        assert_eq!(n.world_bounding_rect(), Some(BoundingRect::new(5.0, 5.0, 20.0, 20.0)));
    }

    // ── brush ─────────────────────────────────────────────────────────────

    #[test]
    fn brush_skips_style_shared_with_prev() {
        let a = square();
        let mut b = square();
        let mut s = RecordingSurface::new(10, 10);
        b.brush(&mut s, Some(&a));
        let ops = s.take_ops();
        assert!(!ops.iter().any(|op| matches!(op, SurfaceOp::FillStyle(_))));
        assert!(ops.contains(&SurfaceOp::Fill));
    }

    #[test]
    fn brush_without_prev_sets_fill() {
        let mut a = square();
        let mut s = RecordingSurface::new(10, 10);
        a.brush(&mut s, None);
        assert!(s.take_ops().contains(&SurfaceOp::FillStyle(Paint::solid(Color::BLACK))));
    }
}
