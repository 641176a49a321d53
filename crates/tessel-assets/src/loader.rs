//! OBJ file to indexed [`Mesh`].
//!
//! A load parses the whole stream first, then indexes the collected faces.
//! Any failure in either stage drops every intermediate buffer and returns
//! the error; there is no partially built mesh.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::config::LoadOptions;
use crate::error::MeshError;
use crate::indexer::MeshIndexer;
use crate::mesh::Mesh;
use crate::obj;

/// Load an OBJ file from disk. The mesh is named after the file stem.
pub fn load_obj(path: &Path, options: &LoadOptions) -> Result<Mesh, MeshError> {
    let file = File::open(path).map_err(|source| MeshError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    build(&name, BufReader::new(file), path, options)
}

/// Load OBJ text from any buffered reader.
pub fn load_obj_from_reader<R: BufRead>(
    name: &str,
    reader: R,
    options: &LoadOptions,
) -> Result<Mesh, MeshError> {
    build(name, reader, Path::new(name), options)
}

fn build<R: BufRead>(
    name: &str,
    reader: R,
    origin: &Path,
    options: &LoadOptions,
) -> Result<Mesh, MeshError> {
    let document = obj::parse_obj(reader, origin, options)?;

    let mut indexer = MeshIndexer::with_capacity(document.triangle_count());
    for record in &document.faces {
        indexer.push_face(record, &document.geometry, options.degenerate_uv)?;
    }
    let mesh = indexer.finish(name);

    if mesh.is_empty() {
        warn!("Mesh '{}' has no faces", name);
    }
    debug!(
        "Loaded mesh '{}': {} positions, {} faces -> {} vertices, {} triangles",
        name,
        document.geometry.positions.len(),
        document.faces.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Attribute;
    use std::collections::HashSet;
    use std::io::Cursor;
    use std::path::PathBuf;

    const SQUARE: &str = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
";

    fn load(src: &str) -> Result<Mesh, MeshError> {
        load_obj_from_reader("test", Cursor::new(src), &LoadOptions::default())
    }

    #[test]
    fn single_triangle() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n";
        let mesh = load(src).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        assert_eq!(mesh.name(), "test");
    }

    #[test]
    fn shared_vertices_are_reused() {
        let mesh = load(&format!("{SQUARE}f 1/1/1 2/2/1 3/3/1\nf 1/1/1 3/3/1 4/4/1\n")).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn quad_is_triangulated() {
        let mesh = load(&format!("{SQUARE}f 1/1/1 2/2/1 3/3/1 4/4/1\n")).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn out_of_range_position_fails_without_mesh() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 5/1/1\n";
        match load(src) {
            Err(MeshError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: 5,
                len: 3,
                ..
            }) => {}
            other => panic!("expected IndexOutOfRange, got: {:?}", other),
        }
    }

    #[test]
    fn latin1_comment_does_not_fail_the_load() {
        let mut src = b"# Cr\xE9e par l'\xE9quipe\n".to_vec();
        src.extend_from_slice(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\n");
        src.extend_from_slice(b"f 1/1/1 2/2/1 3/3/1\n");
        let mesh = load_obj_from_reader("latin1", Cursor::new(src), &LoadOptions::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
    }

    #[test]
    fn infinite_position_is_rejected() {
        let src = "v inf 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\n";
        assert!(matches!(load(src), Err(MeshError::MalformedAttribute { line: 1, .. })));
    }

    #[test]
    fn error_in_later_face_discards_earlier_work() {
        let src = format!("{SQUARE}f 1/1/1 2/2/1 3/3/1\nf 1/1/1 3/3/1\n");
        assert!(matches!(load(&src), Err(MeshError::MalformedFace { line: 11, .. })));
    }

    #[test]
    fn no_faces_gives_empty_mesh() {
        let mesh = load(SQUARE).unwrap();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn counts_and_dedup_hold_for_mixed_faces() {
        // A cube-like strip: quads and triangles sharing corners, with a UV seam.
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
v 0 0 1
v 1 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vt 0.5 0.5
vn 0 0 1
vn 0 1 0
f 1/1/1 2/2/1 3/3/1 4/4/1
f 1/1/2 2/2/2 6/3/2 5/4/2
f 1/5/1 3/3/1 4/4/1
f 2/2/1 3/3/1 1/1/1
";
        let mesh = load(src).unwrap();

        let referenced: HashSet<(u32, u32, u32)> = [
            (1, 1, 1), (2, 2, 1), (3, 3, 1), (4, 4, 1),
            (1, 1, 2), (2, 2, 2), (6, 3, 2), (5, 4, 2),
            (1, 5, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(mesh.vertex_count(), referenced.len());
        assert_eq!(mesh.index_count(), 3 * (2 + 2 + 1 + 1));
        assert!(mesh.indices().iter().all(|&i| (i as usize) < mesh.vertex_count()));
    }

    #[test]
    fn loading_is_deterministic() {
        let src = format!("{SQUARE}f 4/4/1 3/3/1 1/1/1\nf 1/1/1 2/2/1 3/3/1 4/4/1\n");
        let first = load(&src).unwrap();
        let second = load(&src).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.indices(), &[0, 1, 2, 2, 3, 1, 2, 1, 0]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_obj(Path::new("/nonexistent/nothing.obj"), &LoadOptions::default())
            .unwrap_err();
        match err {
            MeshError::Io { path, .. } => assert_eq!(path, PathBuf::from("/nonexistent/nothing.obj")),
            other => panic!("expected Io, got: {:?}", other),
        }
    }

    #[test]
    fn loads_from_disk_and_names_after_stem() {
        let path = std::env::temp_dir().join(format!("tessel-loader-{}.obj", std::process::id()));
        std::fs::write(&path, format!("{SQUARE}f 1/1/1 2/2/1 3/3/1 4/4/1\n")).unwrap();

        let mesh = load_obj(&path, &LoadOptions::default());
        std::fs::remove_file(&path).ok();

        let mesh = mesh.unwrap();
        assert_eq!(mesh.name(), format!("tessel-loader-{}", std::process::id()));
        assert_eq!(mesh.triangle_count(), 2);
        // vt 0 0 is flipped to (0, 1) on load.
        assert_eq!(mesh.vertices()[0].tex_coord, [0.0, 1.0]);
    }
}
