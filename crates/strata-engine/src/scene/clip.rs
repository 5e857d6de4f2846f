use std::rc::Rc;

use crate::coords::Matrix;

use super::NodeId;

/// One clip shape of a chain, with the world transform it resolved to when
/// bound to the element it clips.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipEntry {
    pub node: NodeId,
    pub transform: Option<Matrix>,
}

/// Ordered clip shapes (outermost first) that must all pass for a pixel of
/// an element to be visible.
///
/// Rebuilt on every traversal. Siblings that inherit the same chain share one
/// allocation, so painters can detect "same clip as the previous element"
/// by pointer first.
#[derive(Debug, Clone)]
pub struct ClipChain(Rc<[ClipEntry]>);

impl ClipChain {
    pub fn new(entries: Vec<ClipEntry>) -> Self {
        Self(entries.into())
    }

    #[inline]
    pub fn entries(&self) -> &[ClipEntry] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same clip nodes in the same order.
    pub fn same_clips(&self, other: &ClipChain) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
            || (self.len() == other.len()
                && self.0.iter().zip(other.0.iter()).all(|(a, b)| a.node == b.node))
    }
}

/// True if painting an element with clip `next` after one with clip `prev`
/// requires resetting the clip state.
pub fn clip_changed(prev: Option<&ClipChain>, next: Option<&ClipChain>) -> bool {
    match (prev, next) {
        (None, None) => false,
        (Some(a), Some(b)) => !a.same_clips(b),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids() -> (NodeId, NodeId) {
        let mut sm: SlotMap<NodeId, ()> = SlotMap::with_key();
        (sm.insert(()), sm.insert(()))
    }

    #[test]
    fn identical_nodes_are_not_a_change() {
        let (a, b) = ids();
        let c1 = ClipChain::new(vec![ClipEntry { node: a, transform: None }]);
        let c2 = ClipChain::new(vec![ClipEntry { node: a, transform: Some(Matrix::IDENTITY) }]);
        let c3 = ClipChain::new(vec![ClipEntry { node: b, transform: None }]);
        assert!(!clip_changed(Some(&c1), Some(&c1.clone())));
        assert!(!clip_changed(Some(&c1), Some(&c2)));
        assert!(clip_changed(Some(&c1), Some(&c3)));
        assert!(clip_changed(None, Some(&c1)));
        assert!(clip_changed(Some(&c1), None));
        assert!(!clip_changed(None, None));
    }
}
