//! Linking meshes across segmentation cuts.
//!
//! Segmentation dropped every triangle whose corners fell into different
//! groups, leaving gaps between neighbouring groups. One linking mesh per
//! texture region refills those gaps from the cut triangles. Each of its
//! vertices is pinned to a group container by an [`EdgeHook`], so when the
//! containers are posed the linking mesh follows.

use hashbrown::HashMap;
use mesh_region::{AnatomicalGroup, GroupSubmesh, TextureRegion};
use mesh_transform::Pose;
use mesh_types::{IndexedMesh, MeshTopology, Point3, Vertex};
use tracing::debug;

use crate::error::{StitchError, StitchResult};

/// A linking-mesh vertex pinned to a group container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHook {
    /// Group whose container the hook rides on.
    pub group: AnatomicalGroup,
    /// Linking mesh the hook drives.
    pub region: TextureRegion,
    /// Vertex index in that linking mesh.
    pub index: u32,
    /// Position in the container's local frame.
    pub local: Point3<f64>,
}

/// Seam-filling mesh for one texture region.
///
/// Vertices `0..front_vertex_count` come from front-scan created edges, the
/// rest from the back scan. `hooks[i]` drives vertex `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkingMesh {
    /// Region whose atlas the mesh samples.
    pub region: TextureRegion,
    /// Geometry in body space, UVs still per scan.
    pub mesh: IndexedMesh,
    /// Number of leading vertices from the front scan.
    pub front_vertex_count: usize,
    /// One hook per vertex.
    pub hooks: Vec<EdgeHook>,
}

impl LinkingMesh {
    fn empty(region: TextureRegion) -> Self {
        Self {
            region,
            mesh: IndexedMesh::new(),
            front_vertex_count: 0,
            hooks: Vec::new(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push(&mut self, group: AnatomicalGroup, world: Point3<f64>, vertex: &Vertex, container: &Pose) -> u32 {
        let index = self.mesh.vertices.len() as u32;
        self.mesh.vertices.push(Vertex::new(world, vertex.uv));
        self.hooks.push(EdgeHook {
            group,
            region: self.region,
            index,
            local: container.inverse_transform_point(&world),
        });
        index
    }

    /// True if vertex `index` came from the front scan.
    #[must_use]
    pub const fn is_front_vertex(&self, index: usize) -> bool {
        index < self.front_vertex_count
    }

    /// Hooks riding on `group`'s container.
    pub fn hooks_for_group(&self, group: AnatomicalGroup) -> impl Iterator<Item = &EdgeHook> {
        self.hooks.iter().filter(move |h| h.group == group)
    }

    /// Moves every vertex to its hook's current body-space position.
    ///
    /// # Errors
    ///
    /// Returns [`StitchError::GroupCount`] if `containers` does not hold one
    /// pose per group.
    pub fn refresh(&mut self, containers: &[Pose]) -> StitchResult<()> {
        check_containers(containers)?;
        for (vertex, hook) in self.mesh.vertices.iter_mut().zip(&self.hooks) {
            vertex.position = containers[hook.group.index()].transform_point(&hook.local);
        }
        self.mesh.compute_normals();
        Ok(())
    }
}

impl MeshTopology for LinkingMesh {
    fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    fn face_count(&self) -> usize {
        self.mesh.face_count()
    }
}

fn check_containers(containers: &[Pose]) -> StitchResult<()> {
    if containers.len() == AnatomicalGroup::COUNT {
        Ok(())
    } else {
        Err(StitchError::GroupCount {
            what: "container list",
            expected: AnatomicalGroup::COUNT,
            actual: containers.len(),
        })
    }
}

/// One scan's contribution to the linking meshes.
#[derive(Debug, Clone, Copy)]
pub struct LinkingSource<'a> {
    /// Cleaned group submeshes, one per group in index order.
    pub groups: &'a [GroupSubmesh],
    /// Cut triangles from segmentation, as full-scan vertex indices.
    pub cut_triangles: &'a [[u32; 3]],
}

/// Builds the five linking meshes from both scans' created edges.
///
/// Every surviving created-edge vertex is added to the linking mesh of its
/// seam tag, front scan first. A cut triangle is kept if all three of its
/// full-scan vertices made it into the same linking mesh; if a full-scan
/// vertex appears more than once, its first occurrence is used.
///
/// # Errors
///
/// Returns [`StitchError::GroupCount`] if either scan or `containers` does
/// not cover every group.
pub fn build_linking_meshes(
    front: LinkingSource<'_>,
    back: LinkingSource<'_>,
    containers: &[Pose],
) -> StitchResult<Vec<LinkingMesh>> {
    check_containers(containers)?;
    for (what, source) in [("front scan", &front), ("back scan", &back)] {
        if source.groups.len() != AnatomicalGroup::COUNT {
            return Err(StitchError::GroupCount {
                what,
                expected: AnatomicalGroup::COUNT,
                actual: source.groups.len(),
            });
        }
    }

    let mut meshes: Vec<LinkingMesh> = TextureRegion::ALL.iter().map(|&r| LinkingMesh::empty(r)).collect();

    let front_lookup = add_created_edges(&mut meshes, front.groups, containers);
    for mesh in &mut meshes {
        mesh.front_vertex_count = mesh.mesh.vertices.len();
    }
    let back_lookup = add_created_edges(&mut meshes, back.groups, containers);

    for ((mesh, front_index), back_index) in meshes.iter_mut().zip(&front_lookup).zip(&back_lookup) {
        let faces = linking_triangles(front.cut_triangles, front_index)
            .chain(linking_triangles(back.cut_triangles, back_index))
            .collect::<Vec<_>>();
        mesh.mesh.faces = faces;
        mesh.mesh.compute_normals();
        debug!(
            region = ?mesh.region,
            vertices = mesh.vertex_count(),
            triangles = mesh.face_count(),
            "Linking mesh built"
        );
    }

    Ok(meshes)
}

/// Appends one scan's created edges; returns, per region, the map from
/// full-scan vertex index to linking-mesh vertex index.
fn add_created_edges(
    meshes: &mut [LinkingMesh],
    groups: &[GroupSubmesh],
    containers: &[Pose],
) -> Vec<HashMap<u32, u32>> {
    let mut lookup = vec![HashMap::new(); meshes.len()];
    for (sub, container) in groups.iter().zip(containers) {
        for edge in &sub.created_edges {
            let (Some(vertex), Some(&original)) = (
                sub.mesh.vertices.get(edge.vertex as usize),
                sub.original_index.get(edge.vertex as usize),
            ) else {
                continue;
            };
            let region = edge.region.index();
            let world = sub.origin + vertex.position.coords;
            let index = meshes[region].push(sub.group, world, vertex, container);
            lookup[region].entry(original).or_insert(index);
        }
    }
    lookup
}

fn linking_triangles<'a>(
    cuts: &'a [[u32; 3]],
    lookup: &'a HashMap<u32, u32>,
) -> impl Iterator<Item = [u32; 3]> + 'a {
    cuts.iter().filter_map(move |face| {
        let [a, b, c] = face.map(|v| lookup.get(&v).copied());
        Some([a?, b?, c?])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_region::CreatedEdge;
    use mesh_types::{Point2, Vector3};

    fn empty_groups() -> Vec<GroupSubmesh> {
        AnatomicalGroup::ALL
            .iter()
            .map(|&g| GroupSubmesh::new(g, Point3::origin()))
            .collect()
    }

    fn containers() -> Vec<Pose> {
        vec![Pose::identity(); AnatomicalGroup::COUNT]
    }

    /// Torso/leg cut: a triangle with two corners in the lower torso and one
    /// in the left hip-to-knee group, all tagged `Legs`.
    fn cut_scan() -> (Vec<GroupSubmesh>, Vec<[u32; 3]>) {
        let mut groups = empty_groups();
        let torso = &mut groups[AnatomicalGroup::LowerTorso.index()];
        torso.origin = Point3::new(0.0, 1.0, 0.0);
        for (original, x) in [(10, 0.0), (11, 1.0)] {
            let v = torso.push_vertex(original, Vertex::new(Point3::new(x, 0.0, 0.0), Point2::new(x, 0.5)));
            torso.created_edges.push(CreatedEdge {
                vertex: v,
                region: TextureRegion::Legs,
            });
        }
        let thigh = &mut groups[AnatomicalGroup::LeftHipToKnee.index()];
        let v = thigh.push_vertex(12, Vertex::new(Point3::new(0.5, 0.5, 0.0), Point2::origin()));
        thigh.created_edges.push(CreatedEdge {
            vertex: v,
            region: TextureRegion::Legs,
        });
        (groups, vec![[10, 11, 12], [10, 11, 99]])
    }

    #[test]
    fn test_build_from_front_cut() {
        let (front_groups, front_cuts) = cut_scan();
        let back_groups = empty_groups();
        let meshes = build_linking_meshes(
            LinkingSource {
                groups: &front_groups,
                cut_triangles: &front_cuts,
            },
            LinkingSource {
                groups: &back_groups,
                cut_triangles: &[],
            },
            &containers(),
        )
        .unwrap();

        assert_eq!(meshes.len(), 5);
        let legs = &meshes[TextureRegion::Legs.index()];
        assert_eq!(legs.vertex_count(), 3);
        assert_eq!(legs.front_vertex_count, 3);
        // The triangle touching the missing vertex 99 is not rebuilt
        assert_eq!(legs.mesh.faces, vec![[0, 1, 2]]);
        assert_relative_eq!(legs.mesh.vertices[1].position, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(legs.hooks_for_group(AnatomicalGroup::LowerTorso).count(), 2);
        assert!(meshes[TextureRegion::MainBody.index()].mesh.vertices.is_empty());
    }

    #[test]
    fn test_back_triangles_are_offset() {
        let (front_groups, front_cuts) = cut_scan();
        let (back_groups, back_cuts) = cut_scan();
        let meshes = build_linking_meshes(
            LinkingSource {
                groups: &front_groups,
                cut_triangles: &front_cuts,
            },
            LinkingSource {
                groups: &back_groups,
                cut_triangles: &back_cuts,
            },
            &containers(),
        )
        .unwrap();

        let legs = &meshes[TextureRegion::Legs.index()];
        assert_eq!(legs.vertex_count(), 6);
        assert_eq!(legs.mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
        assert!(legs.is_front_vertex(2));
        assert!(!legs.is_front_vertex(3));
    }

    #[test]
    fn test_refresh_follows_containers() {
        let (front_groups, front_cuts) = cut_scan();
        let back_groups = empty_groups();
        let mut poses = containers();
        let mut meshes = build_linking_meshes(
            LinkingSource {
                groups: &front_groups,
                cut_triangles: &front_cuts,
            },
            LinkingSource {
                groups: &back_groups,
                cut_triangles: &[],
            },
            &poses,
        )
        .unwrap();

        poses[AnatomicalGroup::LowerTorso.index()].position += Vector3::new(0.0, 0.0, 2.0);
        let legs = &mut meshes[TextureRegion::Legs.index()];
        legs.refresh(&poses).unwrap();

        assert_relative_eq!(legs.mesh.vertices[0].position.z, 2.0);
        // The thigh container did not move
        assert_relative_eq!(legs.mesh.vertices[2].position.z, 0.0);
    }

    #[test]
    fn test_container_count_checked() {
        let (mut front, _) = cut_scan();
        let mut meshes = build_linking_meshes(
            LinkingSource {
                groups: &front,
                cut_triangles: &[],
            },
            LinkingSource {
                groups: &front,
                cut_triangles: &[],
            },
            &containers(),
        )
        .unwrap();
        assert!(matches!(
            meshes[0].refresh(&[Pose::identity()]),
            Err(StitchError::GroupCount { .. })
        ));

        front.pop();
        let err = build_linking_meshes(
            LinkingSource {
                groups: &front,
                cut_triangles: &[],
            },
            LinkingSource {
                groups: &front,
                cut_triangles: &[],
            },
            &containers(),
        );
        assert!(matches!(err, Err(StitchError::GroupCount { what: "front scan", .. })));
    }
}
