//! Per-group submeshes and their boundary bookkeeping.

use mesh_types::{IndexRemap, IndexedMesh, MeshTopology, Point3, Vector3, Vertex};

use crate::anatomy::{AnatomicalGroup, TextureRegion};
use crate::error::{RegionError, RegionResult};

/// A vertex on a segmentation cut, tagged with the atlas region its seam
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CreatedEdge {
    /// Local vertex index.
    pub vertex: u32,
    /// Seam texture region.
    pub region: TextureRegion,
}

/// The part of one scan that belongs to one anatomical group.
///
/// Vertex positions are relative to `origin`. The three index tables
/// (`original_index`, `scanned_edges`, `created_edges`) always use the
/// current local indexing; [`GroupSubmesh::remove_vertices`] rewrites all of
/// them together with the mesh.
#[derive(Debug, Clone)]
pub struct GroupSubmesh {
    /// Which body part this is.
    pub group: AnatomicalGroup,
    /// World position the vertices are relative to.
    pub origin: Point3<f64>,
    /// Geometry, positions relative to `origin`.
    pub mesh: IndexedMesh,
    /// Local vertex -> vertex index in the full scan mesh.
    pub original_index: Vec<u32>,
    /// Local vertices on the scan boundary, ascending.
    pub scanned_edges: Vec<u32>,
    /// Local vertices on a segmentation cut, in discovery order.
    pub created_edges: Vec<CreatedEdge>,
}

impl GroupSubmesh {
    /// An empty submesh anchored at `origin`.
    #[must_use]
    pub const fn new(group: AnatomicalGroup, origin: Point3<f64>) -> Self {
        Self {
            group,
            origin,
            mesh: IndexedMesh::new(),
            original_index: Vec::new(),
            scanned_edges: Vec::new(),
            created_edges: Vec::new(),
        }
    }

    /// Appends a vertex taken from the full scan and returns its local index.
    #[allow(clippy::cast_possible_truncation)]
    pub fn push_vertex(&mut self, original: u32, vertex: Vertex) -> u32 {
        let local = self.mesh.vertices.len() as u32;
        self.mesh.vertices.push(vertex);
        self.original_index.push(original);
        local
    }

    /// True if `local` lies on the scan boundary.
    #[must_use]
    pub fn is_scanned_edge(&self, local: u32) -> bool {
        self.scanned_edges.binary_search(&local).is_ok()
    }

    /// Seam region of `local`, if it lies on a segmentation cut.
    #[must_use]
    pub fn created_edge_region(&self, local: u32) -> Option<TextureRegion> {
        self.created_edges
            .iter()
            .find(|e| e.vertex == local)
            .map(|e| e.region)
    }

    /// Local index of a full-scan vertex.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn local_of_original(&self, original: u32) -> Option<u32> {
        self.original_index
            .iter()
            .position(|&o| o == original)
            .map(|i| i as u32)
    }

    /// World position of a local vertex.
    #[must_use]
    pub fn world_position(&self, local: u32) -> Option<Point3<f64>> {
        self.mesh
            .vertices
            .get(local as usize)
            .map(|v| self.origin + v.position.coords)
    }

    /// World positions of all vertices.
    #[must_use]
    pub fn world_positions(&self) -> Vec<Point3<f64>> {
        self.mesh
            .vertices
            .iter()
            .map(|v| self.origin + v.position.coords)
            .collect()
    }

    /// Moves the geometry by `offset` without moving the origin.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        self.mesh.translate(offset);
    }

    /// Removes the flagged vertices and re-derives every index table.
    ///
    /// Faces touching a removed vertex are dropped. A surviving vertex that
    /// loses some, but not all, of its faces now borders the cut and is added
    /// to `scanned_edges`. Created edges and `original_index` entries of
    /// removed vertices are dropped; the rest are remapped.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::VertexCountMismatch`] if `removed` does not
    /// have one flag per vertex.
    #[allow(clippy::cast_possible_truncation)]
    pub fn remove_vertices(&mut self, removed: &[bool]) -> RegionResult<IndexRemap> {
        if removed.len() != self.mesh.vertices.len() {
            return Err(RegionError::VertexCountMismatch {
                what: "removal flags",
                expected: self.mesh.vertices.len(),
                actual: removed.len(),
            });
        }

        let face_removed: Vec<bool> = self
            .mesh
            .faces
            .iter()
            .map(|f| f.iter().any(|&v| removed[v as usize]))
            .collect();
        let partially_cut: Vec<bool> = self
            .mesh
            .faces_by_vertex()
            .iter()
            .enumerate()
            .map(|(v, faces)| {
                let cut = faces.iter().filter(|&&f| face_removed[f]).count();
                !removed[v] && cut > 0 && cut < faces.len()
            })
            .collect();

        let remap = IndexRemap::from_removed(removed);

        let mut scanned: Vec<u32> = self
            .scanned_edges
            .iter()
            .filter_map(|&v| remap.get(v))
            .collect();
        scanned.extend(
            partially_cut
                .iter()
                .enumerate()
                .filter(|&(_, &p)| p)
                .filter_map(|(v, _)| remap.get(v as u32)),
        );
        scanned.sort_unstable();
        scanned.dedup();

        self.created_edges = self
            .created_edges
            .iter()
            .filter_map(|e| {
                remap.get(e.vertex).map(|vertex| CreatedEdge {
                    vertex,
                    region: e.region,
                })
            })
            .collect();
        self.original_index = self
            .original_index
            .iter()
            .zip(removed)
            .filter(|&(_, &r)| !r)
            .map(|(&o, _)| o)
            .collect();
        self.scanned_edges = scanned;
        self.mesh = self.mesh.compact(&remap);

        Ok(remap)
    }

    /// True if every index table is in range and consistent with the mesh.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let n = self.mesh.vertices.len();
        let in_range = |v: u32| (v as usize) < n;
        self.original_index.len() == n
            && self.mesh.faces.iter().flatten().all(|&v| in_range(v))
            && self.scanned_edges.iter().all(|&v| in_range(v))
            && self.scanned_edges.windows(2).all(|w| w[0] < w[1])
            && self.created_edges.iter().all(|e| in_range(e.vertex))
    }
}

impl MeshTopology for GroupSubmesh {
    fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    fn face_count(&self) -> usize {
        self.mesh.face_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::Point2;

    /// A 3x2 strip of four triangles:
    ///
    /// ```text
    /// 0 - 1 - 2
    /// | / | / |
    /// 3 - 4 - 5
    /// ```
    fn strip() -> GroupSubmesh {
        let mut sub = GroupSubmesh::new(AnatomicalGroup::LowerTorso, Point3::new(1.0, 0.0, 0.0));
        for i in 0..6u32 {
            let (x, y) = (f64::from(i % 3), f64::from(i / 3));
            sub.push_vertex(100 + i, Vertex::new(Point3::new(x, y, 0.0), Point2::origin()));
        }
        sub.mesh.faces = vec![[0, 1, 3], [3, 1, 4], [1, 2, 4], [4, 2, 5]];
        sub.scanned_edges = vec![0, 2, 3, 5];
        sub.created_edges = vec![
            CreatedEdge {
                vertex: 2,
                region: TextureRegion::Legs,
            },
            CreatedEdge {
                vertex: 5,
                region: TextureRegion::MainBody,
            },
        ];
        sub
    }

    #[test]
    fn test_world_position() {
        let sub = strip();
        assert_eq!(sub.world_position(4), Some(Point3::new(2.0, 1.0, 0.0)));
        assert_eq!(sub.world_position(6), None);
        assert_eq!(sub.local_of_original(103), Some(3));
    }

    #[test]
    fn test_remove_right_column() {
        let mut sub = strip();
        let remap = sub.remove_vertices(&[false, false, true, false, false, true]).unwrap();

        assert_eq!(remap.kept_count(), 4);
        assert_eq!(sub.vertex_count(), 4);
        assert_eq!(sub.mesh.faces, vec![[0, 1, 2], [2, 1, 3]]);
        assert_eq!(sub.original_index, vec![100, 101, 103, 104]);
        // Vertices 1 and 4 lost half their faces and now border the cut
        assert_eq!(sub.scanned_edges, vec![0, 1, 2, 3]);
        assert!(sub.created_edges.is_empty());
        assert!(sub.is_consistent());
    }

    #[test]
    fn test_remove_left_column_remaps_created_edges() {
        let mut sub = strip();
        sub.remove_vertices(&[true, false, false, true, false, false]).unwrap();

        assert_eq!(sub.original_index, vec![101, 102, 104, 105]);
        assert_eq!(sub.created_edge_region(1), Some(TextureRegion::Legs));
        assert_eq!(sub.created_edge_region(3), Some(TextureRegion::MainBody));
        assert!(sub.is_scanned_edge(1));
        assert!(sub.is_consistent());
    }

    #[test]
    fn test_remove_nothing_is_identity() {
        let mut sub = strip();
        let before = sub.clone();
        sub.remove_vertices(&[false; 6]).unwrap();
        assert_eq!(sub.mesh.faces, before.mesh.faces);
        assert_eq!(sub.scanned_edges, before.scanned_edges);
        assert_eq!(sub.created_edges, before.created_edges);
    }

    #[test]
    fn test_remove_wrong_length() {
        let mut sub = strip();
        assert!(matches!(
            sub.remove_vertices(&[false; 2]),
            Err(RegionError::VertexCountMismatch { .. })
        ));
    }
}
