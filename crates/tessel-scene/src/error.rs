use crate::node::NodeId;

/// Errors from scene graph edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} does not exist (despawned or never spawned)")]
    StaleNode(NodeId),

    #[error("cannot parent {child} under {parent}: {parent} is {child} or one of its descendants")]
    Cycle { child: NodeId, parent: NodeId },
}
