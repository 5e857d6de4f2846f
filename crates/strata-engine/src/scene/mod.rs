//! Retained scene graph.
//!
//! Responsibilities:
//! - node arena with group/shape payloads (`Storage`, `Node`)
//! - per-node components: `Transform`, `EventEmitter`, `AnimationState`
//! - flattening into a paint-ordered display list (zlevel, z, z2; stable)
//! - clip chains resolved per traversal
//! - shape geometries under `scene::shapes`

mod animation;
mod clip;
mod displayable;
mod error;
mod events;
mod key;
mod node;
mod storage;
mod traits;
mod transform;

pub mod shapes;

pub use animation::{AnimationState, AnimatorId};
pub use clip::{clip_changed, ClipChain, ClipEntry};
pub use displayable::Displayable;
pub use error::SceneError;
pub use events::{EventEmitter, EventKind, HandlerId, NodeEvent};
pub use key::PaintKey;
pub use node::{Node, NodeId, NodeKind};
pub use storage::Storage;
pub use traits::{Drawable, Hittable, Transformable};
pub use transform::Transform;
