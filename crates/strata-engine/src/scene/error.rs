use std::fmt;

use super::NodeId;

/// Rejected scene-graph mutation. The graph is left unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// The id does not refer to a live node.
    UnknownNode(NodeId),
    /// Children can only be added to group nodes.
    NotAGroup(NodeId),
    /// Clip paths must be shape nodes.
    NotAShape(NodeId),
    /// Adding `child` under `parent` would make a node its own ancestor.
    Cycle { parent: NodeId, child: NodeId },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownNode(id) => write!(f, "unknown node {id:?}"),
            SceneError::NotAGroup(id) => write!(f, "node {id:?} is not a group"),
            SceneError::NotAShape(id) => write!(f, "node {id:?} is not a shape"),
            SceneError::Cycle { parent, child } => {
                write!(f, "adding {child:?} under {parent:?} would create a cycle")
            }
        }
    }
}

impl std::error::Error for SceneError {}
