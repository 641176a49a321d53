use serde::{Deserialize, Serialize};

/// What to do when a triangle's UV deltas have no inverse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateUvPolicy {
    /// Emit zero tangent and bitangent for the triangle
    #[default]
    Zero,
    /// Abort the load with `MeshError::DegenerateUv`
    Fail,
}

/// Knobs applied while turning an OBJ stream into a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Convert bottom-left UV origin to top-left (`v = 1 - v`)
    pub flip_v: bool,
    pub degenerate_uv: DegenerateUvPolicy,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            flip_v: true,
            degenerate_uv: DegenerateUvPolicy::Zero,
        }
    }
}
