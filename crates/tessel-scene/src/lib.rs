//! Tessel Scene - Game object hierarchy
//!
//! Game objects live in a generational arena and refer to each other by
//! [`NodeId`]. Meshes and materials are referenced by asset handle.

mod error;
mod node;
mod scene;

pub use error::SceneError;
pub use node::NodeId;
pub use scene::{DrawItem, GameObject, Scene};
