//! Wavefront OBJ text parsing.
//!
//! Only the subset needed for indexed, textured, lit meshes is understood:
//! `v`, `vt`, `vn` and `f` lines whose corners are full `v/vt/vn` triplets.
//! Every other line kind is skipped.

use std::io::BufRead;
use std::path::Path;
use std::str::SplitWhitespace;

use glam::{Vec2, Vec3};

use crate::config::LoadOptions;
use crate::error::{Attribute, MeshError};

/// Attribute lists in file order. Indices into them are 0-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawGeometry {
    pub positions: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub normals: Vec<Vec3>,
}

impl RawGeometry {
    fn len_of(&self, attribute: Attribute) -> usize {
        match attribute {
            Attribute::Position => self.positions.len(),
            Attribute::TexCoord => self.tex_coords.len(),
            Attribute::Normal => self.normals.len(),
        }
    }

    /// Convert a 1-based OBJ index into a 0-based one, checking it against
    /// the attributes defined so far. Zero and negative indices are rejected.
    pub fn resolve_index(
        &self,
        attribute: Attribute,
        index: i64,
        line: usize,
    ) -> Result<u32, MeshError> {
        let len = self.len_of(attribute);
        let out_of_range = MeshError::IndexOutOfRange {
            line,
            attribute,
            index,
            len,
        };
        if index < 1 || index as u64 > len as u64 {
            return Err(out_of_range);
        }
        u32::try_from(index - 1).map_err(|_| out_of_range)
    }

    /// Look up the position, texcoord, and normal a triplet points at.
    pub fn attributes(
        &self,
        triplet: FaceIndexTriplet,
        line: usize,
    ) -> Result<(Vec3, Vec2, Vec3), MeshError> {
        let missing = |attribute: Attribute, index: u32| MeshError::IndexOutOfRange {
            line,
            attribute,
            index: i64::from(index) + 1,
            len: self.len_of(attribute),
        };
        let position = self
            .positions
            .get(triplet.position as usize)
            .ok_or_else(|| missing(Attribute::Position, triplet.position))?;
        let tex_coord = self
            .tex_coords
            .get(triplet.tex_coord as usize)
            .ok_or_else(|| missing(Attribute::TexCoord, triplet.tex_coord))?;
        let normal = self
            .normals
            .get(triplet.normal as usize)
            .ok_or_else(|| missing(Attribute::Normal, triplet.normal))?;
        Ok((*position, *tex_coord, *normal))
    }
}

/// One `(position, texcoord, normal)` combination referenced by a face.
/// Fields are 0-based. Ordering is field-wise lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceIndexTriplet {
    pub position: u32,
    pub tex_coord: u32,
    pub normal: u32,
}

impl FaceIndexTriplet {
    pub fn new(position: u32, tex_coord: u32, normal: u32) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }
}

const TRIANGLE_ORDER: [usize; 3] = [0, 1, 2];
const QUAD_ORDER: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// A polygon from an `f` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Triangle([FaceIndexTriplet; 3]),
    /// Split along the 0-2 diagonal into (0,1,2) and (0,2,3).
    Quad([FaceIndexTriplet; 4]),
}

impl Face {
    pub fn corners(&self) -> &[FaceIndexTriplet] {
        match self {
            Face::Triangle(corners) => corners,
            Face::Quad(corners) => corners,
        }
    }

    pub fn triangle_count(&self) -> usize {
        match self {
            Face::Triangle(_) => 1,
            Face::Quad(_) => 2,
        }
    }

    /// Corner positions in the order their vertex slots are emitted.
    pub fn emission_order(&self) -> &'static [usize] {
        match self {
            Face::Triangle(_) => &TRIANGLE_ORDER,
            Face::Quad(_) => &QUAD_ORDER,
        }
    }

    /// Triplets in the order their vertex slots are emitted into the index buffer.
    pub fn emitted(&self) -> impl Iterator<Item = FaceIndexTriplet> + '_ {
        let corners = self.corners();
        self.emission_order().iter().map(move |&i| corners[i])
    }
}

/// A face together with the source line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRecord {
    pub line: usize,
    pub face: Face,
}

/// Everything parsed from one OBJ stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjDocument {
    pub geometry: RawGeometry,
    pub faces: Vec<FaceRecord>,
}

impl ObjDocument {
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|r| r.face.triangle_count()).sum()
    }
}

/// Parse an OBJ stream line by line.
///
/// `origin` is only used to label I/O errors. Faces are validated against the
/// attribute lists as they stand when the face is read, so attributes must be
/// declared before the faces that use them.
pub fn parse_obj<R: BufRead>(
    mut reader: R,
    origin: &Path,
    options: &LoadOptions,
) -> Result<ObjDocument, MeshError> {
    let mut document = ObjDocument::default();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| MeshError::Io {
                path: origin.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        line_no += 1;

        // Comments and names may be in any encoding. Invalid bytes only
        // matter on the lines we tokenize, where they fail to parse.
        let line = String::from_utf8_lossy(&buf);
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };

        match keyword {
            "v" => {
                let [x, y, z] =
                    parse_floats::<3>(&mut tokens).ok_or_else(|| malformed(line_no, &line))?;
                document.geometry.positions.push(Vec3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] =
                    parse_floats::<3>(&mut tokens).ok_or_else(|| malformed(line_no, &line))?;
                document.geometry.normals.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] =
                    parse_floats::<2>(&mut tokens).ok_or_else(|| malformed(line_no, &line))?;
                let v = if options.flip_v { 1.0 - v } else { v };
                document.geometry.tex_coords.push(Vec2::new(u, v));
            }
            "f" => {
                let face = parse_face(tokens, &document.geometry, line_no, &line)?;
                document.faces.push(FaceRecord {
                    line: line_no,
                    face,
                });
            }
            _ => {}
        }
    }

    Ok(document)
}

fn malformed(line: usize, content: &str) -> MeshError {
    MeshError::MalformedAttribute {
        line,
        content: content.trim().to_string(),
    }
}

/// Read the first `N` tokens as finite floats. Trailing components (such as `w`) are ignored.
fn parse_floats<const N: usize>(tokens: &mut SplitWhitespace<'_>) -> Option<[f32; N]> {
    let mut out = [0.0; N];
    for slot in &mut out {
        *slot = tokens.next()?.parse().ok().filter(|f: &f32| f.is_finite())?;
    }
    Some(out)
}

fn parse_triplet(token: &str) -> Option<[i64; 3]> {
    let mut parts = token.split('/');
    let v = parts.next()?.parse().ok()?;
    let vt = parts.next()?.parse().ok()?;
    let vn = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some([v, vt, vn])
}

fn parse_face(
    tokens: SplitWhitespace<'_>,
    geometry: &RawGeometry,
    line_no: usize,
    line: &str,
) -> Result<Face, MeshError> {
    let malformed_face = || MeshError::MalformedFace {
        line: line_no,
        content: line.trim().to_string(),
    };

    let raw: Vec<[i64; 3]> = tokens
        .map(parse_triplet)
        .collect::<Option<_>>()
        .ok_or_else(malformed_face)?;
    if raw.len() != 3 && raw.len() != 4 {
        return Err(malformed_face());
    }

    let mut corners = Vec::with_capacity(raw.len());
    for [v, vt, vn] in raw {
        corners.push(FaceIndexTriplet {
            position: geometry.resolve_index(Attribute::Position, v, line_no)?,
            tex_coord: geometry.resolve_index(Attribute::TexCoord, vt, line_no)?,
            normal: geometry.resolve_index(Attribute::Normal, vn, line_no)?,
        });
    }

    match corners[..] {
        [a, b, c] => Ok(Face::Triangle([a, b, c])),
        [a, b, c, d] => Ok(Face::Quad([a, b, c, d])),
        _ => Err(malformed_face()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "\
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

    fn parse(src: &str) -> Result<ObjDocument, MeshError> {
        parse_obj(Cursor::new(src), Path::new("test.obj"), &LoadOptions::default())
    }

    #[test]
    fn reads_attributes_in_file_order() {
        let doc = parse(HEADER).unwrap();
        assert_eq!(doc.geometry.positions.len(), 4);
        assert_eq!(doc.geometry.tex_coords.len(), 4);
        assert_eq!(doc.geometry.normals, vec![Vec3::Z]);
        assert_eq!(doc.geometry.positions[2], Vec3::new(1.0, 1.0, 0.0));
        assert!(doc.faces.is_empty());
    }

    #[test]
    fn flips_v_by_default() {
        let doc = parse("vt 0.25 0.75\n").unwrap();
        assert_eq!(doc.geometry.tex_coords[0], Vec2::new(0.25, 0.25));
    }

    #[test]
    fn keeps_v_when_flip_disabled() {
        let options = LoadOptions {
            flip_v: false,
            ..Default::default()
        };
        let doc = parse_obj(Cursor::new("vt 0.25 0.75\n"), Path::new("t"), &options).unwrap();
        assert_eq!(doc.geometry.tex_coords[0], Vec2::new(0.25, 0.75));
    }

    #[test]
    fn ignores_unknown_lines_and_extra_components() {
        let src = "# comment\nmtllib a.mtl\no thing\ns off\n\nv 1 2 3 1.0\nvt 0.5 0.5 0\nusemtl m\n";
        let doc = parse(src).unwrap();
        assert_eq!(doc.geometry.positions, vec![Vec3::new(1.0, 2.0, 3.0)]);
        assert_eq!(doc.geometry.tex_coords.len(), 1);
    }

    #[test]
    fn converts_face_indices_to_zero_based() {
        let doc = parse(&format!("{HEADER}f 2/1/1 3/2/1 4/3/1\n")).unwrap();
        assert_eq!(doc.faces.len(), 1);
        assert_eq!(doc.faces[0].line, 10);
        assert_eq!(
            doc.faces[0].face,
            Face::Triangle([
                FaceIndexTriplet::new(1, 0, 0),
                FaceIndexTriplet::new(2, 1, 0),
                FaceIndexTriplet::new(3, 2, 0),
            ])
        );
    }

    #[test]
    fn quad_emits_two_triangles_along_first_diagonal() {
        let doc = parse(&format!("{HEADER}f 1/1/1 2/2/1 3/3/1 4/4/1\n")).unwrap();
        let face = doc.faces[0].face;
        assert_eq!(face.triangle_count(), 2);
        let emitted: Vec<u32> = face.emitted().map(|t| t.position).collect();
        assert_eq!(emitted, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(doc.triangle_count(), 2);
    }

    #[test]
    fn rejects_wrong_corner_counts() {
        for face in ["f 1/1/1 2/2/1", "f 1/1/1 2/2/1 3/3/1 4/4/1 1/1/1", "f"] {
            let err = parse(&format!("{HEADER}{face}\n")).unwrap_err();
            assert!(
                matches!(err, MeshError::MalformedFace { line: 10, .. }),
                "{face}: {err:?}"
            );
        }
    }

    #[test]
    fn rejects_incomplete_triplets() {
        for face in [
            "f 1//1 2//1 3//1",
            "f 1 2 3",
            "f 1/1 2/2 3/3",
            "f 1/1/1/1 2/2/1 3/3/1",
            "f a/1/1 2/2/1 3/3/1",
        ] {
            let err = parse(&format!("{HEADER}{face}\n")).unwrap_err();
            assert!(matches!(err, MeshError::MalformedFace { .. }), "{face}: {err:?}");
        }
    }

    #[test]
    fn rejects_relative_and_zero_indices() {
        let err = parse(&format!("{HEADER}f -1/1/1 2/2/1 3/3/1\n")).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                attribute: Attribute::Position,
                index: -1,
                ..
            }
        ));

        let err = parse(&format!("{HEADER}f 1/1/1 2/0/1 3/3/1\n")).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                attribute: Attribute::TexCoord,
                index: 0,
                ..
            }
        ));
    }

    #[test]
    fn rejects_index_past_defined_positions() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvn 0 0 1\nf 1/1/1 2/1/1 5/1/1\n";
        let err = parse(src).unwrap_err();
        match err {
            MeshError::IndexOutOfRange {
                line,
                attribute,
                index,
                len,
            } => {
                assert_eq!(line, 6);
                assert_eq!(attribute, Attribute::Position);
                assert_eq!(index, 5);
                assert_eq!(len, 3);
            }
            other => panic!("expected IndexOutOfRange, got: {:?}", other),
        }
    }

    #[test]
    fn rejects_face_before_its_attributes() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1/1/1 2/2/1 3/3/1\nvt 0 0\nvt 1 0\nvt 0 1\n";
        let err = parse(src).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                attribute: Attribute::TexCoord,
                len: 0,
                ..
            }
        ));
    }

    #[test]
    fn rejects_short_attribute_lines() {
        let err = parse("v 1 2\n").unwrap_err();
        assert!(matches!(err, MeshError::MalformedAttribute { line: 1, .. }));
        let err = parse("v 0 0 0\nvt x y\n").unwrap_err();
        assert!(matches!(err, MeshError::MalformedAttribute { line: 2, .. }));
    }

    #[test]
    fn rejects_non_finite_components() {
        for src in ["v inf 0 0\n", "v 0 NaN 0\n", "vn 0 0 -infinity\n", "vt 0.5 inf\n"] {
            let err = parse(src).unwrap_err();
            assert!(
                matches!(err, MeshError::MalformedAttribute { line: 1, .. }),
                "{src}: {err:?}"
            );
        }
    }

    #[test]
    fn skips_comments_that_are_not_utf8() {
        let mut src = b"# Cr\xE9e\no caf\xE9\n".to_vec();
        src.extend_from_slice(HEADER.as_bytes());
        src.extend_from_slice(b"f 1/1/1 2/2/1 3/3/1\r\n");
        let doc = parse_obj(Cursor::new(src), Path::new("t"), &LoadOptions::default()).unwrap();
        assert_eq!(doc.geometry.positions.len(), 4);
        assert_eq!(doc.faces.len(), 1);
        assert_eq!(doc.faces[0].line, 12);
    }

    #[test]
    fn invalid_bytes_in_a_vertex_line_are_malformed() {
        let src = b"v 1 \xFF 0\n".to_vec();
        let err = parse_obj(Cursor::new(src), Path::new("t"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, MeshError::MalformedAttribute { line: 1, .. }));
    }

    #[test]
    fn triplet_ordering_is_lexicographic() {
        let a = FaceIndexTriplet::new(0, 5, 5);
        let b = FaceIndexTriplet::new(1, 0, 0);
        let c = FaceIndexTriplet::new(1, 0, 1);
        assert!(a < b && b < c);
        assert_eq!(b.cmp(&b), std::cmp::Ordering::Equal);
    }
}
