//! Indexed triangle mesh.

use crate::{IndexRemap, MeshTopology, Vertex};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Stores vertices and faces separately, with faces referencing vertices by
/// index. Scan meshes, group submeshes, stitched meshes and linking meshes
/// all share this representation.
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Vertex>` - Positions, texture coordinates, normals
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Vertex, MeshTopology};
///
/// let mut mesh = IndexedMesh::new();
/// mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(1.0, 0.0, 0.0));
/// mesh.vertices.push(Vertex::from_coords(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Vertex positions in index order.
    #[must_use]
    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Mean vertex position, or the origin for an empty mesh.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{IndexedMesh, Vertex, Point3};
    ///
    /// let mesh = IndexedMesh::from_parts(
    ///     vec![Vertex::from_coords(0.0, 0.0, 0.0), Vertex::from_coords(2.0, 4.0, 6.0)],
    ///     vec![],
    /// );
    /// assert_eq!(mesh.centroid(), Point3::new(1.0, 2.0, 3.0));
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Point3<f64> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vector3::zeros(), |acc, v| acc + v.position.coords);
        Point3::from(sum / self.vertices.len() as f64)
    }

    /// Translate every vertex by `offset`.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// Returns the index offset applied to `other`'s vertices.
    #[allow(clippy::cast_possible_truncation)]
    pub fn append(&mut self, other: &Self) -> u32 {
        let offset = self.vertices.len() as u32;
        self.vertices.extend(other.vertices.iter().cloned());
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
        offset
    }

    /// Recompute per-vertex normals from face cross products.
    ///
    /// Vertices with no incident faces, or whose accumulated normal is
    /// degenerate, get `None`.
    pub fn compute_normals(&mut self) {
        let mut accum = vec![Vector3::zeros(); self.vertices.len()];

        for face in &self.faces {
            let [a, b, c] = face.map(|i| i as usize);
            if a >= accum.len() || b >= accum.len() || c >= accum.len() {
                continue;
            }
            let pa = self.vertices[a].position;
            let e1 = self.vertices[b].position - pa;
            let e2 = self.vertices[c].position - pa;
            let n = e1.cross(&e2);
            accum[a] += n;
            accum[b] += n;
            accum[c] += n;
        }

        for (vertex, n) in self.vertices.iter_mut().zip(accum) {
            let len = n.norm();
            vertex.normal = if len > 1e-10 { Some(n / len) } else { None };
        }
    }

    /// Face indices incident to each vertex.
    #[must_use]
    pub fn faces_by_vertex(&self) -> Vec<Vec<usize>> {
        let mut table = vec![Vec::new(); self.vertices.len()];
        for (fi, face) in self.faces.iter().enumerate() {
            for &v in face {
                if let Some(list) = table.get_mut(v as usize) {
                    list.push(fi);
                }
            }
        }
        table
    }

    /// Build a compacted copy that keeps only vertices surviving `remap`.
    ///
    /// Faces referencing any removed vertex are dropped; the rest are
    /// re-indexed.
    #[must_use]
    pub fn compact(&self, remap: &IndexRemap) -> Self {
        let vertices = self
            .vertices
            .iter()
            .enumerate()
            .filter(|(i, _)| !remap.is_removed(*i as u32))
            .map(|(_, v)| v.clone())
            .collect();
        let faces = self
            .faces
            .iter()
            .filter_map(|&f| remap.remap_face(f))
            .collect();
        Self { vertices, faces }
    }
}

impl MeshTopology for IndexedMesh {
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn face_count(&self) -> usize {
        self.faces.len()
    }
}
