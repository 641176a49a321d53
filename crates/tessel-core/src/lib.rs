//! Tessel Core - Shared math types
//!
//! - Vector and matrix primitives (re-exported from glam)
//! - Transform used by scene objects

pub mod types;

pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
pub use types::Transform;
