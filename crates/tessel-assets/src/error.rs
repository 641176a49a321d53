use std::fmt;
use std::path::PathBuf;

/// The attribute list a face triplet component refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Attribute::Position => "position",
            Attribute::TexCoord => "texcoord",
            Attribute::Normal => "normal",
        })
    }
}

/// Errors that abort a mesh load. No partial mesh survives any of them.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("I/O error reading '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: face must hold 3 or 4 v/vt/vn triplets, got '{content}'")]
    MalformedFace { line: usize, content: String },

    #[error("line {line}: {attribute} index {index} is outside 1..={len}")]
    IndexOutOfRange {
        line: usize,
        attribute: Attribute,
        index: i64,
        len: usize,
    },

    #[error("line {line}: malformed attribute '{content}'")]
    MalformedAttribute { line: usize, content: String },

    #[error("line {line}: texture coordinates are degenerate, tangent space undefined")]
    DegenerateUv { line: usize },
}

/// Errors that can occur in the asset server.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to load mesh: {0}")]
    Mesh(#[from] MeshError),
}
