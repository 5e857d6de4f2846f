use smallvec::SmallVec;

/// Opaque id of an animator owned by the animation collaborator.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AnimatorId(pub u64);

/// Animators currently driving a node.
///
/// The animation system registers its animators here so that detaching the
/// node can stop them; interpolation itself lives outside the renderer.
#[derive(Debug, Default, Clone)]
pub struct AnimationState {
    running: SmallVec<[AnimatorId; 2]>,
}

impl AnimationState {
    pub fn register(&mut self, id: AnimatorId) {
        if !self.running.contains(&id) {
            self.running.push(id);
        }
    }

    /// Forgets an animator that finished on its own.
    pub fn finish(&mut self, id: AnimatorId) {
        self.running.retain(|a| *a != id);
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        !self.running.is_empty()
    }

    #[inline]
    pub fn running(&self) -> &[AnimatorId] {
        &self.running
    }

    /// Stops every animator, returning the ids that were running.
    pub fn stop_all(&mut self) -> SmallVec<[AnimatorId; 2]> {
        std::mem::take(&mut self.running)
    }
}
