//! Joining the two cleaned halves of a group into one closed-ish mesh.

use mesh_region::{AnatomicalGroup, GroupSubmesh};
use mesh_transform::Pose;
use mesh_types::{IndexedMesh, MeshTopology, Point3};

use crate::chains::SeamSides;
use crate::smooth::smooth_seam;
use crate::zipper::zip_chains;

/// Front and back halves of one group joined and zipped.
///
/// Vertices `0..front_vertex_count` come from the front scan, the rest from
/// the back scan. Positions are local to `container`.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedGroupMesh {
    /// Which body part this is.
    pub group: AnatomicalGroup,
    /// Placement of the group in the body: the anchor POI's pose.
    pub container: Pose,
    /// Geometry in container-local coordinates, UVs still per scan.
    pub mesh: IndexedMesh,
    /// Number of leading vertices that came from the front scan.
    pub front_vertex_count: usize,
    /// Triangles added along the two seams.
    pub seam_triangle_count: usize,
}

impl StitchedGroupMesh {
    /// An empty mesh placed at `container`.
    #[must_use]
    pub fn empty(group: AnatomicalGroup, container: Pose) -> Self {
        Self {
            group,
            container,
            mesh: IndexedMesh::new(),
            front_vertex_count: 0,
            seam_triangle_count: 0,
        }
    }

    /// True if vertex `index` came from the front scan.
    #[must_use]
    pub const fn is_front_vertex(&self, index: usize) -> bool {
        index < self.front_vertex_count
    }

    /// Vertex positions in body space.
    #[must_use]
    pub fn world_positions(&self) -> Vec<Point3<f64>> {
        self.mesh
            .vertices
            .iter()
            .map(|v| self.container.transform_point(&v.position))
            .collect()
    }
}

impl MeshTopology for StitchedGroupMesh {
    fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    fn face_count(&self) -> usize {
        self.mesh.face_count()
    }
}

/// Combines two halves that share an origin.
///
/// The back half is appended after the front. Each half's scan boundary is
/// split into two seam sides; matching sides are smoothed for
/// `smoothing_iterations` passes and zipped, side A with outward winding
/// toward the negative axis and side B toward the positive one. Finally the
/// vertices are moved into `container`'s local frame and normals are
/// recomputed.
#[must_use]
pub fn combine_halves(
    front: &GroupSubmesh,
    back: &GroupSubmesh,
    container: Pose,
    smoothing_iterations: usize,
) -> StitchedGroupMesh {
    let vertical = front.group.is_vertical();

    let mut mesh = front.mesh.clone();
    let back_offset = mesh.append(&back.mesh);
    let front_vertex_count = front.vertex_count();

    let mut positions = mesh.positions();
    let front_sides = SeamSides::from_edges(&positions, &front.scanned_edges, vertical);
    let back_sides = SeamSides::from_edges(
        &positions[front_vertex_count..],
        &back.scanned_edges,
        vertical,
    )
    .offset(back_offset);

    smooth_seam(&mut positions, &front_sides.a, &back_sides.a, vertical, smoothing_iterations);
    smooth_seam(&mut positions, &front_sides.b, &back_sides.b, vertical, smoothing_iterations);

    let side_a = zip_chains(&positions, &front_sides.a, &back_sides.a, vertical, false);
    let side_b = zip_chains(&positions, &front_sides.b, &back_sides.b, vertical, true);
    let seam_triangle_count = side_a.len() + side_b.len();
    mesh.faces.extend(side_a);
    mesh.faces.extend(side_b);

    for (vertex, p) in mesh.vertices.iter_mut().zip(positions) {
        vertex.position = container.inverse_transform_point(&(front.origin + p.coords));
    }
    mesh.compute_normals();

    StitchedGroupMesh {
        group: front.group,
        container,
        mesh,
        front_vertex_count,
        seam_triangle_count,
    }
}
