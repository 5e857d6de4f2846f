use std::mem;

use slotmap::SlotMap;

use crate::coords::{BoundingRect, Matrix, Vec2};
use crate::sort::stable_sort_by_key;

use super::{
    ClipChain, ClipEntry, Drawable, Hittable, Node, NodeEvent, NodeId, SceneError, Transformable,
};

/// Owner of the scene graph.
///
/// Responsibilities:
/// - arena of nodes addressed by `NodeId`
/// - ordered root list and parent/child links
/// - attach/detach bookkeeping (events, animations)
/// - flattening the tree into the paint-ordered display list
#[derive(Debug, Default)]
pub struct Storage {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    display_list: Vec<NodeId>,
    refresh_requested: bool,
}

impl Storage {
    pub fn new() -> Self {
        Self::default()
    }

    // ── arena ─────────────────────────────────────────────────────────────

    /// Stores a detached node.
    pub fn insert(&mut self, node: Node) -> NodeId {
        self.nodes.insert(node)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access; requests a repaint.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.refresh_requested = true;
        self.nodes.get_mut(id)
    }

    /// Access without requesting a repaint, for painting and traversal.
    #[inline]
    pub(crate) fn node_mut_quiet(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Current node plus the previously drawn one, borrowed together.
    pub(crate) fn node_with_prev(&mut self, id: NodeId, prev: Option<NodeId>) -> Option<(&mut Node, Option<&Node>)> {
        match prev {
            Some(p) if p != id && self.nodes.contains_key(p) => {
                let [cur, prev] = self.nodes.get_disjoint_mut([id, p])?;
                Some((cur, Some(&*prev)))
            }
            _ => self.nodes.get_mut(id).map(|n| (n, None)),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    // ── tree ──────────────────────────────────────────────────────────────

    /// Appends `id` to the root list and attaches its subtree. A node that
    /// already is a root is left where it is; a child is moved out of its
    /// parent first.
    pub fn add_root(&mut self, id: NodeId) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownNode(id));
        }
        if self.roots.contains(&id) {
            return Ok(());
        }
        self.unlink_from_parent(id);
        self.roots.push(id);
        self.attach(id);
        self.refresh_requested = true;
        Ok(())
    }

    /// Detaches one root, or every root when `id` is `None`.
    pub fn remove_root(&mut self, id: Option<NodeId>) {
        match id {
            None => {
                for root in mem::take(&mut self.roots) {
                    self.detach(root);
                }
                self.display_list.clear();
            }
            Some(id) => {
                let Some(pos) = self.roots.iter().position(|r| *r == id) else {
                    return;
                };
                self.roots.remove(pos);
                self.detach(id);
            }
        }
        self.refresh_requested = true;
    }

    /// Appends `child` to `parent`'s children, moving it from its previous
    /// place in the tree.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let p = self.nodes.get(parent).ok_or(SceneError::UnknownNode(parent))?;
        if !p.is_group() {
            return Err(SceneError::NotAGroup(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownNode(child));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        let was_attached = self.nodes[child].is_attached();
        self.unlink_from_parent(child);
        if let Some(pos) = self.roots.iter().position(|r| *r == child) {
            self.roots.remove(pos);
        }

        let parent_attached = self.nodes[parent].is_attached();
        if let Some(p) = self.nodes.get_mut(parent) {
            if let Some(children) = p.children_mut() {
                children.push(child);
            }
            p.mark_dirty();
        }
        self.nodes[child].parent = Some(parent);

        if parent_attached {
            self.attach(child);
        } else if was_attached {
            self.detach(child);
        }
        self.refresh_requested = true;
        Ok(())
    }

    /// Removes `child` from `parent` and detaches it. Returns `false` when it
    /// was not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let Some(children) = self.nodes.get_mut(parent).and_then(Node::children_mut) else {
            return false;
        };
        let Some(pos) = children.iter().position(|c| *c == child) else {
            return false;
        };
        children.remove(pos);
        self.nodes[parent].mark_dirty();
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
        self.detach(child);
        self.refresh_requested = true;
        true
    }

    pub fn remove_all_children(&mut self, parent: NodeId) {
        let children = match self.nodes.get_mut(parent).and_then(Node::children_mut) {
            Some(children) => mem::take(children),
            None => return,
        };
        for child in children {
            if let Some(c) = self.nodes.get_mut(child) {
                c.parent = None;
            }
            self.detach(child);
        }
        self.nodes[parent].mark_dirty();
        self.refresh_requested = true;
    }

    /// Removes `id` and its whole subtree from the arena.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if !self.contains(id) {
            return None;
        }
        if let Some(pos) = self.roots.iter().position(|r| *r == id) {
            self.roots.remove(pos);
        }
        self.unlink_from_parent(id);
        self.detach(id);

        let mut stack: Vec<NodeId> = self.nodes[id].children().to_vec();
        while let Some(n) = stack.pop() {
            if let Some(node) = self.nodes.remove(n) {
                stack.extend_from_slice(node.children());
            }
        }
        self.display_list.retain(|d| self.nodes.contains_key(*d) && *d != id);
        self.refresh_requested = true;
        self.nodes.remove(id)
    }

    fn unlink_from_parent(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get_mut(id).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            if let Some(children) = p.children_mut() {
                children.retain(|c| *c != id);
            }
            p.mark_dirty();
        }
    }

    fn is_ancestor_or_self(&self, candidate: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == candidate {
                return true;
            }
            match self.nodes.get(id).and_then(Node::parent) {
                Some(p) => id = p,
                None => return false,
            }
        }
    }

    // ── registration ──────────────────────────────────────────────────────

    /// Registers `id` and its descendants. Idempotent.
    pub fn attach(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.nodes.get_mut(n) else {
                continue;
            };
            if !node.attached {
                node.attached = true;
                node.mark_dirty();
                node.events.trigger(&NodeEvent::Attached);
            }
            stack.extend_from_slice(node.children());
        }
    }

    /// Unregisters `id` and its descendants: running animations are stopped
    /// and event handlers dropped. Idempotent.
    pub fn detach(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let Some(node) = self.nodes.get_mut(n) else {
                continue;
            };
            if node.attached {
                node.attached = false;
                let stopped = node.animation.stop_all();
                if !stopped.is_empty() {
                    log::debug!("detach {n:?}: stopped {} animator(s)", stopped.len());
                }
                node.events.trigger(&NodeEvent::Detached);
                node.events.off_all();
                node.clip_chain = None;
            }
            stack.extend_from_slice(node.children());
        }
    }

    // ── dirty tracking ────────────────────────────────────────────────────

    /// Flags `id` for transform recomputation and repaint. A clip node also
    /// dirties the element it clips.
    pub fn mark_dirty(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.mark_dirty();
        if let Some(target) = node.clip_target {
            if let Some(t) = self.nodes.get_mut(target) {
                t.mark_dirty();
            }
        }
        self.refresh_requested = true;
    }

    /// Sets or clears the clip path of `id`. The clip node is not part of the
    /// tree; its transform is bound to `id` on every traversal.
    pub fn set_clip_path(&mut self, id: NodeId, clip: Option<NodeId>) -> Result<(), SceneError> {
        if !self.contains(id) {
            return Err(SceneError::UnknownNode(id));
        }
        if let Some(c) = clip {
            let node = self.nodes.get(c).ok_or(SceneError::UnknownNode(c))?;
            if node.displayable().is_none() {
                return Err(SceneError::NotAShape(c));
            }
            if c == id {
                return Err(SceneError::Cycle { parent: id, child: c });
            }
        }

        let old = self.nodes[id].clip_path();
        if let Some(old) = old.and_then(|o| self.nodes.get_mut(o)) {
            old.clip_target = None;
        }
        if let Some(c) = clip {
            self.nodes[c].clip_target = Some(id);
        }
        self.nodes[id].set_clip_path_raw(clip);
        self.refresh_requested = true;
        Ok(())
    }

    /// Returns and resets the pending repaint request.
    pub fn take_refresh_request(&mut self) -> bool {
        mem::take(&mut self.refresh_requested)
    }

    #[inline]
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    // ── flattening ────────────────────────────────────────────────────────

    /// Paint-ordered shape ids from the last `update_display_list`.
    #[inline]
    pub fn display_list(&self) -> &[NodeId] {
        &self.display_list
    }

    /// Walks the tree, refreshes transforms, paths and clip chains, and
    /// rebuilds the display list sorted by `(zlevel, z, z2)`.
    ///
    /// Ignored subtrees are skipped unless `include_ignore` is set. Equal
    /// keys keep traversal order.
    pub fn update_display_list(&mut self, include_ignore: bool) -> &[NodeId] {
        self.display_list.clear();
        let roots = mem::take(&mut self.roots);
        for &root in &roots {
            self.update_and_add(root, None, None, include_ignore);
        }
        self.roots = roots;

        let nodes = &self.nodes;
        stable_sort_by_key(&mut self.display_list, |id| {
            nodes.get(*id).map(Node::paint_key).unwrap_or_default()
        });
        log::trace!("display list: {} element(s)", self.display_list.len());
        &self.display_list
    }

    fn update_and_add(
        &mut self,
        id: NodeId,
        parent_world: Option<Matrix>,
        inherited: Option<&ClipChain>,
        include_ignore: bool,
    ) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if node.ignore() && !include_ignore {
            return;
        }

        node.before_update();
        if node.is_dirty() {
            node.update_transform(parent_world.as_ref());
        }
        node.update();

        let world = node.world;
        let dirty = node.is_dirty();
        let chain = match node.clip_path() {
            Some(clip) => Some(self.extend_chain(id, world, inherited, clip)),
            None => inherited.cloned(),
        };

        let Some(children) = self.nodes[id].children_mut().map(mem::take) else {
            self.nodes[id].clip_chain = chain;
            self.display_list.push(id);
            return;
        };
        for &child in &children {
            if dirty {
                if let Some(c) = self.nodes.get_mut(child) {
                    c.mark_dirty();
                }
            }
            self.update_and_add(child, world, chain.as_ref(), include_ignore);
        }
        let node = &mut self.nodes[id];
        if let Some(slot) = node.children_mut() {
            *slot = children;
        }
        node.clear_dirty();
    }

    /// Appends the clip chain declared by `target` (following each clip's own
    /// clip path) to the inherited one.
    fn extend_chain(
        &mut self,
        target: NodeId,
        target_world: Option<Matrix>,
        inherited: Option<&ClipChain>,
        first: NodeId,
    ) -> ClipChain {
        let mut entries: Vec<ClipEntry> = inherited.map(|c| c.entries().to_vec()).unwrap_or_default();
        let own_start = entries.len();
        let mut bound_to = target_world;
        let mut current = Some(first);

        while let Some(cid) = current {
            if cid == target || entries[own_start..].iter().any(|e| e.node == cid) {
                log::warn!("clip path cycle at {cid:?}; chain truncated");
                break;
            }
            let Some(clip) = self.nodes.get_mut(cid) else {
                break;
            };
            clip.bind_as_clip(bound_to.as_ref());
            entries.push(ClipEntry { node: cid, transform: clip.world });
            bound_to = clip.world;
            current = clip.clip_path();
        }
        ClipChain::new(entries)
    }

    // ── queries ───────────────────────────────────────────────────────────

    /// Topmost displayed shape containing the world point, honoring clip
    /// chains. Silent shapes are transparent to picking.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        self.display_list.iter().rev().copied().find(|&id| {
            let Some(node) = self.nodes.get(id) else {
                return false;
            };
            if node.displayable().is_none_or(|d| d.silent) || !node.contain(x, y) {
                return false;
            }
            node.clip_chain()
                .is_none_or(|chain| chain.entries().iter().all(|e| self.clip_contains(e, x, y)))
        })
    }

    fn clip_contains(&self, entry: &ClipEntry, x: f64, y: f64) -> bool {
        let Some(d) = self.nodes.get(entry.node).and_then(Node::displayable) else {
            return true;
        };
        let p = Vec2::new(x, y);
        let local = match &entry.transform {
            Some(m) => match m.invert() {
                Some(inv) => inv.apply(p),
                None => return false,
            },
            None => p,
        };
        d.contain_local(local.x, local.y, entry.transform.as_ref())
    }

    /// Local bounds of a node; for groups, the union of the children's
    /// bounds mapped through their local transforms.
    pub fn bounding_rect(&self, id: NodeId) -> Option<BoundingRect> {
        let node = self.nodes.get(id)?;
        if !node.is_group() {
            return Some(node.bounding_rect());
        }
        node.children()
            .iter()
            .filter_map(|&c| {
                let child = self.nodes.get(c)?;
                if child.ignore() {
                    return None;
                }
                let rect = self.bounding_rect(c)?;
                let t = child.transform();
                Some(if t.needs_local_transform() { rect.transformed(&t.local_matrix()) } else { rect })
            })
            .reduce(BoundingRect::union)
    }

    /// Delivers `event` to the handlers registered on `id`.
    pub fn trigger(&mut self, id: NodeId, event: &NodeEvent) -> usize {
        self.nodes.get_mut(id).map_or(0, |n| n.events.trigger(event))
    }

    /// Detaches everything and empties the arena.
    pub fn dispose(&mut self) {
        self.remove_root(None);
        self.nodes.clear();
        self.display_list.clear();
        self.refresh_requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::shapes::Rect;
    use crate::scene::{AnimatorId, EventKind, PaintKey};
    use std::cell::Cell;
    use std::rc::Rc;

    fn rect_node(x: f64) -> Node {
        Node::shape(Rect::new(x, 0.0, 10.0, 10.0))
    }

    fn keys(s: &Storage) -> Vec<PaintKey> {
        s.display_list().iter().map(|id| s.node(*id).map(Node::paint_key).unwrap_or_default()).collect()
    }

    // ── tree ──────────────────────────────────────────────────────────────

    #[test]
    fn add_child_rejects_cycles() {
        let mut s = Storage::new();
        let a = s.insert(Node::group());
        let b = s.insert(Node::group());
        s.add_child(a, b).unwrap();
        assert_eq!(s.add_child(b, a), Err(SceneError::Cycle { parent: b, child: a }));
        assert_eq!(s.add_child(a, a), Err(SceneError::Cycle { parent: a, child: a }));
    }

    #[test]
    fn add_child_to_shape_is_rejected() {
        let mut s = Storage::new();
        let a = s.insert(rect_node(0.0));
        let b = s.insert(rect_node(0.0));
        assert_eq!(s.add_child(a, b), Err(SceneError::NotAGroup(a)));
    }

    #[test]
    fn reparenting_moves_the_child() {
        let mut s = Storage::new();
        let g1 = s.insert(Node::group());
        let g2 = s.insert(Node::group());
        let r = s.insert(rect_node(0.0));
        s.add_child(g1, r).unwrap();
        s.add_child(g2, r).unwrap();
        assert!(s.node(g1).unwrap().children().is_empty());
        assert_eq!(s.node(g2).unwrap().children(), &[r]);
        assert_eq!(s.node(r).unwrap().parent(), Some(g2));
    }

    #[test]
    fn attach_is_recursive_and_idempotent() {
        let mut s = Storage::new();
        let g = s.insert(Node::group());
        let r = s.insert(rect_node(0.0));
        s.add_child(g, r).unwrap();
        assert!(!s.node(r).unwrap().is_attached());

        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        s.node_mut(r).unwrap().events.on(EventKind::Attached, move |_| h.set(h.get() + 1));

        s.add_root(g).unwrap();
        s.attach(g);
        assert!(s.node(r).unwrap().is_attached());
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn detach_stops_animations_and_drops_handlers() {
        let mut s = Storage::new();
        let g = s.insert(Node::group());
        let r = s.insert(rect_node(0.0));
        s.add_child(g, r).unwrap();
        s.add_root(g).unwrap();

        let node = s.node_mut(r).unwrap();
        node.animation.register(AnimatorId(7));
        let detached = Rc::new(Cell::new(false));
        let d = detached.clone();
        node.events.on(EventKind::Detached, move |_| d.set(true));

        s.remove_root(Some(g));
        let node = s.node(r).unwrap();
        assert!(!node.is_attached());
        assert!(!node.animation.is_animating());
        assert!(node.events.is_empty());
        assert!(detached.get());

        // Second detach is a no-op.
        s.detach(g);
        assert!(!s.node(r).unwrap().is_attached());
    }

    #[test]
    fn remove_drops_the_subtree() {
        let mut s = Storage::new();
        let g = s.insert(Node::group());
        let r = s.insert(rect_node(0.0));
        s.add_child(g, r).unwrap();
        s.add_root(g).unwrap();
        s.update_display_list(false);
        assert!(s.remove(g).is_some());
        assert!(!s.contains(r));
        assert!(s.display_list().is_empty());
        assert!(s.roots().is_empty());
    }

    // ── flattening ────────────────────────────────────────────────────────

    #[test]
    fn display_list_counts_eligible_leaves() {
        let mut s = Storage::new();
        let g = s.insert(Node::group());
        let hidden = s.insert(Node::group());
        for i in 0..3 {
            let r = s.insert(rect_node(i as f64));
            s.add_child(g, r).unwrap();
        }
        let under_hidden = s.insert(rect_node(0.0));
        s.add_child(hidden, under_hidden).unwrap();
        s.node_mut(hidden).unwrap().set_ignore(true);
        s.add_child(g, hidden).unwrap();
        s.add_root(g).unwrap();

        assert_eq!(s.update_display_list(false).len(), 3);
        assert_eq!(s.update_display_list(true).len(), 4);
    }

    #[test]
    fn flattening_is_idempotent() {
        let mut s = Storage::new();
        let g = s.insert(Node::group().with_position(5.0, 0.0));
        for i in 0..5 {
            let r = s.insert(rect_node(0.0).with_z(0, 5 - i, 0));
            s.add_child(g, r).unwrap();
        }
        s.add_root(g).unwrap();
        let first = s.update_display_list(false).to_vec();
        let second = s.update_display_list(false).to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn sorted_by_zlevel_then_z_then_z2() {
        let mut s = Storage::new();
        for (zl, z, z2) in [(0, 1, 0), (0, 0, 1), (0, 0, 0)] {
            let id = s.insert(rect_node(0.0).with_z(zl, z, z2));
            s.add_root(id).unwrap();
        }
        s.update_display_list(false);
        assert_eq!(keys(&s), vec![PaintKey::new(0, 0, 0), PaintKey::new(0, 0, 1), PaintKey::new(0, 1, 0)]);
    }

    #[test]
    fn equal_keys_keep_traversal_order() {
        let mut s = Storage::new();
        let ids: Vec<_> = (0..40).map(|i| s.insert(rect_node(i as f64).with_z(0, i % 2, 0))).collect();
        for &id in &ids {
            s.add_root(id).unwrap();
        }
        s.update_display_list(false);
        let evens: Vec<_> = ids.iter().step_by(2).copied().collect();
        assert_eq!(&s.display_list()[..20], evens.as_slice());
    }

    #[test]
    fn world_transform_composes_parent_first() {
        let mut s = Storage::new();
        let g = s.insert(Node::group().with_position(10.0, 0.0).with_scale(2.0, 2.0));
        let r = s.insert(rect_node(0.0).with_position(1.0, 0.0));
        s.add_child(g, r).unwrap();
        s.add_root(g).unwrap();
        s.update_display_list(false);
        let p = s.node(r).unwrap().transform_coord_to_global(0.0, 0.0);
        assert_eq!((p.x, p.y), (12.0, 0.0));
    }

    #[test]
    fn dirty_parent_dirties_children() {
        let mut s = Storage::new();
        let g = s.insert(Node::group());
        let r = s.insert(rect_node(0.0));
        s.add_child(g, r).unwrap();
        s.add_root(g).unwrap();
        s.update_display_list(false);
        s.node_mut_quiet(r).unwrap().clear_dirty();

        s.node_mut(g).unwrap().set_position(3.0, 0.0);
        s.update_display_list(false);
        let node = s.node(r).unwrap();
        assert!(node.is_dirty());
        assert_eq!(node.transform_coord_to_global(0.0, 0.0).x, 3.0);
        assert!(!s.node(g).unwrap().is_dirty());
    }

    // ── clips ─────────────────────────────────────────────────────────────

    #[test]
    fn siblings_share_the_inherited_chain() {
        let mut s = Storage::new();
        let g = s.insert(Node::group());
        let clip = s.insert(Node::shape(Rect::new(0.0, 0.0, 5.0, 5.0)));
        let a = s.insert(rect_node(0.0));
        let b = s.insert(rect_node(0.0));
        s.add_child(g, a).unwrap();
        s.add_child(g, b).unwrap();
        s.set_clip_path(g, Some(clip)).unwrap();
        s.add_root(g).unwrap();
        s.update_display_list(false);

        let ca = s.node(a).unwrap().clip_chain().unwrap();
        let cb = s.node(b).unwrap().clip_chain().unwrap();
        assert_eq!(ca.entries()[0].node, clip);
        assert!(ca.same_clips(cb));
    }

    #[test]
    fn clip_transform_is_bound_to_the_clipped_element() {
        let mut s = Storage::new();
        let g = s.insert(Node::group().with_position(100.0, 0.0));
        let clip = s.insert(Node::shape(Rect::new(0.0, 0.0, 5.0, 5.0)));
        let a = s.insert(rect_node(0.0));
        s.add_child(g, a).unwrap();
        s.set_clip_path(g, Some(clip)).unwrap();
        s.add_root(g).unwrap();
        s.update_display_list(false);

        assert_eq!(s.hit_test(102.0, 2.0), Some(a));
        // Inside the element, outside the clip.
        assert_eq!(s.hit_test(108.0, 8.0), None);
    }

    #[test]
    fn dirtying_a_clip_dirties_its_target() {
        let mut s = Storage::new();
        let a = s.insert(rect_node(0.0));
        let clip = s.insert(Node::shape(Rect::new(0.0, 0.0, 5.0, 5.0)));
        s.set_clip_path(a, Some(clip)).unwrap();
        s.add_root(a).unwrap();
        s.update_display_list(false);
        s.node_mut_quiet(a).unwrap().clear_dirty();

        s.mark_dirty(clip);
        assert!(s.node(a).unwrap().is_dirty());
    }

    #[test]
    fn group_bounds_union_children() {
        let mut s = Storage::new();
        let g = s.insert(Node::group());
        let a = s.insert(rect_node(0.0));
        let b = s.insert(rect_node(0.0).with_position(20.0, 0.0));
        s.add_child(g, a).unwrap();
        s.add_child(g, b).unwrap();
        s.add_root(g).unwrap();
        s.update_display_list(false);
        assert_eq!(s.bounding_rect(g), Some(BoundingRect::new(0.0, 0.0, 30.0, 10.0)));
    }

    #[test]
    fn hit_test_returns_topmost() {
        let mut s = Storage::new();
        let low = s.insert(rect_node(0.0).with_z(0, 0, 0));
        let high = s.insert(rect_node(0.0).with_z(0, 1, 0));
        s.add_root(high).unwrap();
        s.add_root(low).unwrap();
        s.update_display_list(false);
        assert_eq!(s.hit_test(5.0, 5.0), Some(high));

        s.node_mut(high).unwrap().displayable_mut().unwrap().silent = true;
        assert_eq!(s.hit_test(5.0, 5.0), Some(low));
    }

    #[test]
    fn refresh_request_is_taken_once() {
        let mut s = Storage::new();
        let a = s.insert(rect_node(0.0));
        s.add_root(a).unwrap();
        assert!(s.take_refresh_request());
        assert!(!s.take_refresh_request());
    }
}
