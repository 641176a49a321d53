//! Tessel Assets - Mesh loading and asset management
//!
//! Turns Wavefront OBJ text into indexed triangle meshes with a per-triangle
//! tangent basis, and caches loaded meshes and texture materials behind
//! typed handles.

mod config;
mod error;
mod handle;
mod indexer;
mod loader;
mod material;
mod mesh;
pub mod obj;
mod server;
mod tangent;

pub use config::{DegenerateUvPolicy, LoadOptions};
pub use error::{AssetError, Attribute, MeshError};
pub use handle::{AssetHandle, AssetId};
pub use indexer::MeshIndexer;
pub use loader::{load_obj, load_obj_from_reader};
pub use material::TextureMaterial;
pub use mesh::{Aabb, Mesh, MeshStats, Vertex};
pub use server::AssetServer;
pub use tangent::TangentBasis;
