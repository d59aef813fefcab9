/// Mesh construction for wireframe rendering
use nalgebra::Point3;

/// Number of entries each face contributes to [`Mesh::lines`]: three corners
/// plus the first corner again to close the outline.
pub const LOOP_LEN: usize = 4;

/// Corner indices of the faces emitted by [`Mesh::cuboid`].
///
/// Only the front (z = +depth) and back (z = -depth) faces are present, two
/// triangles each. The box has no side faces.
pub const CUBOID_FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]];

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("face {face} references vertex {index}, mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },
}

/// A mesh holding its unique corners and a render-ready line loop sequence.
///
/// `lines` is laid out in runs of [`LOOP_LEN`] points (A, B, C, A), one run per
/// face. Every entry is a copy of a vertex, the two sequences share nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Point3<f32>>,
    pub lines: Vec<Point3<f32>>,
}

impl Mesh {
    /// Build a box from its half-extents.
    ///
    /// Vertices are numbered front face first, counter-clockwise from the
    /// bottom-left corner, then the back face in the same order:
    ///
    /// ```text
    /// 0 (-w, -h, +d)   1 (+w, -h, +d)   2 (+w, +h, +d)   3 (-w, +h, +d)
    /// 4 (-w, -h, -d)   5 (+w, -h, -d)   6 (+w, +h, -d)   7 (-w, +h, -d)
    /// ```
    ///
    /// Extents are not validated; a zero extent collapses that axis.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let vertices = vec![
            Point3::new(-width, -height, depth),
            Point3::new(width, -height, depth),
            Point3::new(width, height, depth),
            Point3::new(-width, height, depth),
            Point3::new(-width, -height, -depth),
            Point3::new(width, -height, -depth),
            Point3::new(width, height, -depth),
            Point3::new(-width, height, -depth),
        ];

        let mut lines = Vec::with_capacity(CUBOID_FACES.len() * LOOP_LEN);
        for [a, b, c] in CUBOID_FACES {
            push_loop(&mut lines, vertices[a], vertices[b], vertices[c]);
        }

        Self { vertices, lines }
    }

    /// Build a mesh from corners and triangle index triples.
    pub fn from_faces(
        vertices: Vec<Point3<f32>>,
        faces: &[[usize; 3]],
    ) -> Result<Self, GeometryError> {
        let mut lines = Vec::with_capacity(faces.len() * LOOP_LEN);

        for (face, indices) in faces.iter().enumerate() {
            let mut corners = [Point3::origin(); 3];
            for (corner, &index) in corners.iter_mut().zip(indices) {
                *corner = *vertices.get(index).ok_or(GeometryError::IndexOutOfRange {
                    face,
                    index,
                    vertex_count: vertices.len(),
                })?;
            }
            push_loop(&mut lines, corners[0], corners[1], corners[2]);
        }

        Ok(Self { vertices, lines })
    }

    pub fn face_count(&self) -> usize {
        self.lines.len() / LOOP_LEN
    }

    /// Iterate the closed outline of each face.
    pub fn line_loops(&self) -> impl Iterator<Item = &[Point3<f32>]> {
        self.lines.chunks_exact(LOOP_LEN)
    }
}

fn push_loop(lines: &mut Vec<Point3<f32>>, a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) {
    lines.extend_from_slice(&[a, b, c, a]);
}
