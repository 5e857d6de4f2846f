use std::fmt;

use crate::coords::Vec2;

/// Pointer and lifecycle events delivered to a node.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum NodeEvent {
    Click { pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerOver { pos: Vec2 },
    PointerOut { pos: Vec2 },
    /// The node became part of the rendered scene.
    Attached,
    /// The node left the rendered scene; handlers are cleared right after.
    Detached,
}

/// Event category used to register handlers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    Click,
    PointerMove,
    PointerOver,
    PointerOut,
    Attached,
    Detached,
}

impl NodeEvent {
    #[inline]
    pub fn kind(&self) -> EventKind {
        match self {
            NodeEvent::Click { .. } => EventKind::Click,
            NodeEvent::PointerMove { .. } => EventKind::PointerMove,
            NodeEvent::PointerOver { .. } => EventKind::PointerOver,
            NodeEvent::PointerOut { .. } => EventKind::PointerOut,
            NodeEvent::Attached => EventKind::Attached,
            NodeEvent::Detached => EventKind::Detached,
        }
    }
}

/// Handle returned by [`EventEmitter::on`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct HandlerId(u32);

type Handler = Box<dyn FnMut(&NodeEvent)>;

/// Per-node event handler registry.
///
/// The renderer never dispatches pointer input itself; an input collaborator
/// resolves targets via hit testing and calls [`trigger`](Self::trigger).
#[derive(Default)]
pub struct EventEmitter {
    handlers: Vec<(HandlerId, EventKind, Handler)>,
    next_id: u32,
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl EventEmitter {
    pub fn on(&mut self, kind: EventKind, handler: impl FnMut(&NodeEvent) + 'static) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.handlers.push((id, kind, Box::new(handler)));
        id
    }

    /// Removes one handler. Returns `false` if it was not registered.
    pub fn off(&mut self, id: HandlerId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _, _)| *h != id);
        self.handlers.len() != before
    }

    pub fn off_all(&mut self) {
        self.handlers.clear();
    }

    #[inline]
    pub fn has_handlers(&self, kind: EventKind) -> bool {
        self.handlers.iter().any(|(_, k, _)| *k == kind)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Calls every handler registered for the event's kind, in registration
    /// order. Returns how many ran.
    pub fn trigger(&mut self, event: &NodeEvent) -> usize {
        let kind = event.kind();
        let mut n = 0;
        for (_, k, h) in &mut self.handlers {
            if *k == kind {
                h(event);
                n += 1;
            }
        }
        n
    }
}
