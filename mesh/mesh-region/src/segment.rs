//! Splitting a scan mesh into anatomical group submeshes.

use hashbrown::HashSet;
use mesh_scan::ScannedEdges;
use mesh_types::{IndexedMesh, MeshTopology, Point2, Point3, Vertex};
use tracing::debug;

use crate::anatomy::{AnatomicalGroup, TextureRegion};
use crate::error::{RegionError, RegionResult};
use crate::nearest::assign_nearest_pois;
use crate::skeleton::{POI_COUNT, Poi, Skeleton};
use crate::submesh::{CreatedEdge, GroupSubmesh};

/// Parameters for segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentParams {
    /// Run nearest-POI assignment on the rayon pool. Default: true.
    pub parallel: bool,
}

impl Default for SegmentParams {
    fn default() -> Self {
        Self { parallel: true }
    }
}

impl SegmentParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-threaded segmentation.
    #[must_use]
    pub const fn sequential() -> Self {
        Self { parallel: false }
    }

    /// Sets whether nearest-POI assignment runs in parallel.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// One scan split into its 21 anatomical groups.
#[derive(Debug, Clone)]
pub struct SegmentedScan {
    /// One submesh per group, indexed by [`AnatomicalGroup::index`].
    pub groups: Vec<GroupSubmesh>,
    /// Nearest POI per scan vertex.
    pub closest_poi: Vec<Poi>,
    /// Scan triangles whose corners fell into different groups, as full-scan
    /// vertex indices.
    pub cut_triangles: Vec<[u32; 3]>,
    /// Texture coordinates of the vertices nearest each POI.
    pub poi_uvs: Vec<Vec<Point2<f64>>>,
}

impl SegmentedScan {
    /// Submesh of `group`.
    #[must_use]
    pub fn group(&self, group: AnatomicalGroup) -> &GroupSubmesh {
        &self.groups[group.index()]
    }

    /// Mutable submesh of `group`.
    pub fn group_mut(&mut self, group: AnatomicalGroup) -> &mut GroupSubmesh {
        &mut self.groups[group.index()]
    }

    /// Groups that received at least one vertex.
    pub fn non_empty_groups(&self) -> impl Iterator<Item = &GroupSubmesh> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    /// Texture coordinates of every vertex nearest a POI in `region`'s list.
    pub fn region_uvs(&self, region: TextureRegion) -> impl Iterator<Item = &Point2<f64>> {
        region
            .pois()
            .iter()
            .filter_map(|&p| self.poi_uvs.get(p))
            .flatten()
    }

    /// Total vertices across all groups.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(MeshTopology::vertex_count).sum()
    }
}

impl std::fmt::Display for SegmentedScan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Segment: {} vertices into {} groups, {} cut triangles",
            self.vertex_count(),
            self.non_empty_groups().count(),
            self.cut_triangles.len()
        )
    }
}

/// Splits a scan mesh into per-group submeshes.
///
/// Each vertex joins the group of its nearest POI, positioned relative to
/// that group's anchor POI. Triangles entirely inside one group are kept in
/// that group. Every other triangle is cut: its corners become created edges
/// of their own groups, tagged via [`TextureRegion::seam_tag`], and its
/// full-scan indices are kept in [`SegmentedScan::cut_triangles`]. A vertex
/// touched by several cut triangles keeps the tag of the first one.
///
/// # Errors
///
/// Returns [`RegionError::VertexCountMismatch`] if `edges` was computed for
/// a different mesh, or [`RegionError::InvalidVertexIndex`] for a face
/// referencing a missing vertex.
pub fn segment_scan(
    mesh: &IndexedMesh,
    edges: &ScannedEdges,
    skeleton: &Skeleton,
    params: &SegmentParams,
) -> RegionResult<SegmentedScan> {
    let vertex_count = mesh.vertices.len();
    if edges.flags().len() != vertex_count {
        return Err(RegionError::VertexCountMismatch {
            what: "scanned edges",
            expected: vertex_count,
            actual: edges.flags().len(),
        });
    }
    if let Some(&index) = mesh
        .faces
        .iter()
        .flatten()
        .find(|&&i| i as usize >= vertex_count)
    {
        return Err(RegionError::InvalidVertexIndex {
            index,
            vertex_count,
        });
    }

    let closest_poi = assign_nearest_pois(&mesh.positions(), skeleton, params.parallel);

    let mut groups: Vec<GroupSubmesh> = AnatomicalGroup::ALL
        .iter()
        .map(|&g| GroupSubmesh::new(g, skeleton.poi_position(g.anchor())))
        .collect();
    let mut poi_uvs = vec![Vec::new(); POI_COUNT];
    let mut vertex_group = Vec::with_capacity(vertex_count);
    let mut local = Vec::with_capacity(vertex_count);

    for (v, (vertex, &poi)) in mesh.vertices.iter().zip(&closest_poi).enumerate() {
        let group = AnatomicalGroup::of_poi(poi);
        let sub = &mut groups[group.index()];
        #[allow(clippy::cast_possible_truncation)]
        let original = v as u32;
        let relative = Point3::from(vertex.position - sub.origin);
        let l = sub.push_vertex(original, Vertex::new(relative, vertex.uv));
        if edges.contains(original) {
            sub.scanned_edges.push(l);
        }
        poi_uvs[poi.index()].push(vertex.uv);
        vertex_group.push(group);
        local.push(l);
    }

    let mut seen: Vec<HashSet<u32>> = vec![HashSet::new(); AnatomicalGroup::COUNT];
    let mut cut_triangles = Vec::new();

    for face in &mesh.faces {
        let [a, b, c] = face.map(|i| vertex_group[i as usize]);
        if a == b && b == c {
            groups[a.index()].mesh.faces.push(face.map(|i| local[i as usize]));
            continue;
        }

        cut_triangles.push(*face);
        let tag = TextureRegion::seam_tag([a, b, c].map(AnatomicalGroup::texture_region));
        for &corner in face {
            let group = vertex_group[corner as usize].index();
            let vertex = local[corner as usize];
            if seen[group].insert(vertex) {
                groups[group].created_edges.push(CreatedEdge {
                    vertex,
                    region: tag,
                });
            }
        }
    }

    for sub in &mut groups {
        sub.mesh.compute_normals();
    }

    let segmented = SegmentedScan {
        groups,
        closest_poi,
        cut_triangles,
        poi_uvs,
    };
    debug!(%segmented, "scan segmented");
    Ok(segmented)
}
