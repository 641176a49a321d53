use std::path::{Path, PathBuf};

/// A single-texture material. Only the texture's location is recorded here;
/// decoding and GPU upload belong to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureMaterial {
    name: String,
    texture: PathBuf,
}

impl TextureMaterial {
    /// Named after the texture's file stem.
    pub fn new(texture: impl Into<PathBuf>) -> Self {
        let texture = texture.into();
        let name = texture
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, texture }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture_path(&self) -> &Path {
        &self.texture
    }
}
