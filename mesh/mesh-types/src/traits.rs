//! Mesh traits.

/// Basic topology queries shared by mesh containers.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// True if the mesh has no vertices.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }
}
