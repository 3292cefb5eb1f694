//! Flat-array packaging of a finished body for transport.
//!
//! A [`ScanPackage`] holds nothing but primitive arrays: positions, UVs,
//! triangle indices, hook data and raw RGBA bytes. The byte form is a
//! small header followed by the bincode-encoded package:
//!
//! 1. **Magic**: `BSP1` (4 bytes)
//! 2. **Version**: `u32` little-endian (4 bytes)
//! 3. **Payload**: bincode-encoded [`ScanPackage`]

use image::RgbaImage;
use mesh_region::{AnatomicalGroup, TextureRegion};
use mesh_stitch::{EdgeHook, LinkingMesh, StitchedGroupMesh};
use mesh_transform::Pose;
use mesh_types::{IndexedMesh, Point2, Point3, UnitQuaternion, Vertex};
use nalgebra::Quaternion;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SessionError, SessionResult};
use crate::scan::BodyScan;

/// Magic bytes opening a packaged body.
pub const PACKAGE_MAGIC: [u8; 4] = *b"BSP1";

/// Current package format version.
pub const PACKAGE_VERSION: u32 = 1;

/// Header size in bytes (magic + version).
pub const PACKAGE_HEADER_SIZE: usize = 8;

/// The meshes and textures a receiver rebuilds from a package.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSet {
    /// One mesh per group, with its container.
    pub groups: Vec<StitchedGroupMesh>,
    /// One linking mesh per region, with its hooks.
    pub linking: Vec<LinkingMesh>,
    /// One atlas image per region.
    pub textures: Vec<RgbaImage>,
}

/// One mesh as flat arrays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackedMesh {
    /// `x, y, z` per vertex.
    pub positions: Vec<f64>,
    /// `u, v` per vertex.
    pub uvs: Vec<f64>,
    /// Three vertex indices per triangle.
    pub triangles: Vec<u32>,
    /// Number of leading vertices from the front scan.
    pub front_vertex_count: u32,
}

impl PackedMesh {
    #[allow(clippy::cast_possible_truncation)]
    fn pack(mesh: &IndexedMesh, front_vertex_count: usize) -> Self {
        Self {
            positions: mesh
                .vertices
                .iter()
                .flat_map(|v| [v.position.x, v.position.y, v.position.z])
                .collect(),
            uvs: mesh.vertices.iter().flat_map(|v| [v.uv.x, v.uv.y]).collect(),
            triangles: mesh.faces.iter().flatten().copied().collect(),
            front_vertex_count: front_vertex_count as u32,
        }
    }

    fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    fn unpack(&self, what: &'static str) -> SessionResult<IndexedMesh> {
        let n = self.vertex_count();
        check_len(what, n * 3, self.positions.len())?;
        check_len(what, n * 2, self.uvs.len())?;
        check_len(what, self.triangles.len() / 3 * 3, self.triangles.len())?;
        if let Some(&bad) = self.triangles.iter().find(|&&i| i as usize >= n) {
            return Err(SessionError::PackageLayout {
                what: "triangle index",
                expected: n,
                actual: bad as usize,
            });
        }

        let mut mesh = IndexedMesh::with_capacity(n, self.triangles.len() / 3);
        for (p, uv) in self.positions.chunks_exact(3).zip(self.uvs.chunks_exact(2)) {
            mesh.vertices.push(Vertex::new(Point3::new(p[0], p[1], p[2]), Point2::new(uv[0], uv[1])));
        }
        mesh.faces = self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect();
        mesh.compute_normals();
        Ok(mesh)
    }
}

/// A finished body flattened to primitive arrays.
///
/// Per-group arrays are indexed by [`AnatomicalGroup::index`], per-region
/// arrays by [`TextureRegion::index`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanPackage {
    /// `x, y, z` of each group container.
    pub container_positions: Vec<f64>,
    /// `w, i, j, k` of each group container's rotation.
    pub container_rotations: Vec<f64>,
    /// Group meshes in container-local coordinates.
    pub groups: Vec<PackedMesh>,
    /// Seam triangles added to each group.
    pub seam_triangle_counts: Vec<u32>,
    /// Per group: container-local `x, y, z` of each hook riding on it.
    pub hook_positions: Vec<Vec<f64>>,
    /// Per group: linking region of each hook.
    pub hook_regions: Vec<Vec<u8>>,
    /// Per group: linking-mesh vertex index of each hook.
    pub hook_indices: Vec<Vec<u32>>,
    /// Per region: number of hooks, equal to its linking vertex count.
    pub region_hook_counts: Vec<u32>,
    /// Linking meshes in body coordinates.
    pub linking: Vec<PackedMesh>,
    /// Atlas image widths.
    pub texture_widths: Vec<u32>,
    /// Atlas image heights.
    pub texture_heights: Vec<u32>,
    /// Atlas images as row-major RGBA bytes.
    pub textures: Vec<Vec<u8>>,
}

impl ScanPackage {
    /// Flattens a finished body.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_body_scan(scan: &BodyScan) -> Self {
        let groups = &scan.body.groups;
        let mut package = Self {
            container_positions: groups
                .iter()
                .flat_map(|g| {
                    let p = g.container.position;
                    [p.x, p.y, p.z]
                })
                .collect(),
            container_rotations: groups
                .iter()
                .flat_map(|g| {
                    let q = g.container.rotation.quaternion();
                    [q.w, q.i, q.j, q.k]
                })
                .collect(),
            groups: groups.iter().map(|g| PackedMesh::pack(&g.mesh, g.front_vertex_count)).collect(),
            seam_triangle_counts: groups.iter().map(|g| g.seam_triangle_count as u32).collect(),
            hook_positions: vec![Vec::new(); groups.len()],
            hook_regions: vec![Vec::new(); groups.len()],
            hook_indices: vec![Vec::new(); groups.len()],
            region_hook_counts: scan.body.linking.iter().map(|l| l.hooks.len() as u32).collect(),
            linking: scan
                .body
                .linking
                .iter()
                .map(|l| PackedMesh::pack(&l.mesh, l.front_vertex_count))
                .collect(),
            texture_widths: scan.atlas.regions.iter().map(|r| r.image.width()).collect(),
            texture_heights: scan.atlas.regions.iter().map(|r| r.image.height()).collect(),
            textures: scan.atlas.regions.iter().map(|r| r.image.as_raw().clone()).collect(),
        };

        for hook in scan.body.linking.iter().flat_map(|l| &l.hooks) {
            let g = hook.group.index();
            package.hook_positions[g].extend([hook.local.x, hook.local.y, hook.local.z]);
            package.hook_regions[g].push(hook.region.index() as u8);
            package.hook_indices[g].push(hook.index);
        }
        package
    }

    /// Rebuilds the meshes, hooks and textures.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::PackageLayout`] if any array length or index
    /// disagrees with the counts it implies.
    pub fn to_mesh_set(&self) -> SessionResult<MeshSet> {
        let group_count = AnatomicalGroup::COUNT;
        let region_count = TextureRegion::COUNT;
        check_len("group meshes", group_count, self.groups.len())?;
        check_len("container positions", group_count * 3, self.container_positions.len())?;
        check_len("container rotations", group_count * 4, self.container_rotations.len())?;
        check_len("seam triangle counts", group_count, self.seam_triangle_counts.len())?;
        check_len("hook positions", group_count, self.hook_positions.len())?;
        check_len("hook regions", group_count, self.hook_regions.len())?;
        check_len("hook indices", group_count, self.hook_indices.len())?;
        check_len("region hook counts", region_count, self.region_hook_counts.len())?;
        check_len("linking meshes", region_count, self.linking.len())?;
        check_len("texture widths", region_count, self.texture_widths.len())?;
        check_len("texture heights", region_count, self.texture_heights.len())?;
        check_len("textures", region_count, self.textures.len())?;

        let mut groups = Vec::with_capacity(group_count);
        for (i, group) in AnatomicalGroup::ALL.iter().enumerate() {
            let p = &self.container_positions[i * 3..i * 3 + 3];
            let r = &self.container_rotations[i * 4..i * 4 + 4];
            let container = Pose::new(
                Point3::new(p[0], p[1], p[2]),
                UnitQuaternion::new_normalize(Quaternion::new(r[0], r[1], r[2], r[3])),
            );
            groups.push(StitchedGroupMesh {
                group: *group,
                container,
                mesh: self.groups[i].unpack("group mesh")?,
                front_vertex_count: self.groups[i].front_vertex_count as usize,
                seam_triangle_count: self.seam_triangle_counts[i] as usize,
            });
        }

        let mut hooks: Vec<Vec<Option<EdgeHook>>> = self
            .linking
            .iter()
            .map(|l| vec![None; l.vertex_count()])
            .collect();
        for (g, group) in AnatomicalGroup::ALL.iter().enumerate() {
            let (positions, regions, indices) =
                (&self.hook_positions[g], &self.hook_regions[g], &self.hook_indices[g]);
            check_len("hook regions", indices.len(), regions.len())?;
            check_len("hook positions", indices.len() * 3, positions.len())?;
            for ((&region, &index), local) in regions.iter().zip(indices).zip(positions.chunks_exact(3)) {
                let region = TextureRegion::from_index(usize::from(region)).ok_or(SessionError::PackageLayout {
                    what: "hook region",
                    expected: region_count,
                    actual: usize::from(region),
                })?;
                let slots = &mut hooks[region.index()];
                let len = slots.len();
                let slot = slots.get_mut(index as usize).ok_or(SessionError::PackageLayout {
                    what: "hook index",
                    expected: len,
                    actual: index as usize,
                })?;
                *slot = Some(EdgeHook {
                    group: *group,
                    region,
                    index,
                    local: Point3::new(local[0], local[1], local[2]),
                });
            }
        }

        let mut linking = Vec::with_capacity(region_count);
        for (r, (region, slots)) in TextureRegion::ALL.iter().zip(hooks).enumerate() {
            check_len("region hook counts", slots.len(), self.region_hook_counts[r] as usize)?;
            let filled = slots.len();
            let hooks: Vec<EdgeHook> = slots.into_iter().flatten().collect();
            check_len("linking hooks", filled, hooks.len())?;
            linking.push(LinkingMesh {
                region: *region,
                mesh: self.linking[r].unpack("linking mesh")?,
                front_vertex_count: self.linking[r].front_vertex_count as usize,
                hooks,
            });
        }

        let mut textures = Vec::with_capacity(region_count);
        for r in 0..region_count {
            let (w, h) = (self.texture_widths[r], self.texture_heights[r]);
            let image = RgbaImage::from_raw(w, h, self.textures[r].clone()).ok_or(SessionError::PackageLayout {
                what: "texture bytes",
                expected: w as usize * h as usize * 4,
                actual: self.textures[r].len(),
            })?;
            textures.push(image);
        }

        Ok(MeshSet {
            groups,
            linking,
            textures,
        })
    }

    /// Encodes the package with its header.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Serialize`] if bincode fails.
    pub fn to_bytes(&self) -> SessionResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(PACKAGE_HEADER_SIZE);
        bytes.extend_from_slice(&PACKAGE_MAGIC);
        bytes.extend_from_slice(&PACKAGE_VERSION.to_le_bytes());
        bincode::serialize_into(&mut bytes, self).map_err(|e| SessionError::Serialize(e.to_string()))?;
        debug!(bytes = bytes.len(), "Scan package encoded");
        Ok(bytes)
    }

    /// Decodes a package written by [`ScanPackage::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidMagic`],
    /// [`SessionError::UnsupportedVersion`] or [`SessionError::Deserialize`].
    pub fn from_bytes(bytes: &[u8]) -> SessionResult<Self> {
        if bytes.len() < PACKAGE_HEADER_SIZE {
            return Err(SessionError::Deserialize(format!(
                "{} bytes is shorter than the {PACKAGE_HEADER_SIZE}-byte header",
                bytes.len()
            )));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        if magic != PACKAGE_MAGIC {
            return Err(SessionError::InvalidMagic(magic));
        }
        let mut version = [0u8; 4];
        version.copy_from_slice(&bytes[4..8]);
        let version = u32::from_le_bytes(version);
        if version != PACKAGE_VERSION {
            return Err(SessionError::UnsupportedVersion(version));
        }
        bincode::deserialize(&bytes[PACKAGE_HEADER_SIZE..]).map_err(|e| SessionError::Deserialize(e.to_string()))
    }
}

fn check_len(what: &'static str, expected: usize, actual: usize) -> SessionResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(SessionError::PackageLayout {
            what,
            expected,
            actual,
        })
    }
}
