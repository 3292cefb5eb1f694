//! The finished, textured body.

use image::RgbaImage;
use mesh_atlas::{TextureAtlas, remap_mesh_uvs};
use mesh_region::{AnatomicalGroup, Skeleton, TextureRegion};
use mesh_stitch::{LinkingMesh, StitchedBody, StitchedGroupMesh};
use mesh_transform::Pose;
use mesh_types::MeshTopology;

use crate::error::SessionResult;
use crate::package::MeshSet;
use crate::report::PipelineReport;

/// A reconstructed body ready for skinning.
///
/// Group and linking meshes sample their region's atlas image: UVs have
/// been remapped so front vertices fall in the lower half and back
/// vertices in the upper half.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyScan {
    /// Stitched group and linking meshes.
    pub body: StitchedBody,
    /// One texture per region.
    pub atlas: TextureAtlas,
    /// Skeleton the group containers were placed on.
    pub skeleton: Skeleton,
    /// Stage reports of the session that built this body.
    pub report: PipelineReport,
}

impl BodyScan {
    /// Bundles the session outputs and remaps every UV into the atlas.
    pub(crate) fn assemble(
        mut body: StitchedBody,
        atlas: TextureAtlas,
        skeleton: Skeleton,
        report: PipelineReport,
    ) -> Self {
        for group in &mut body.groups {
            let region = atlas.region(group.group.texture_region());
            remap_mesh_uvs(region, &mut group.mesh, group.front_vertex_count);
        }
        for linking in &mut body.linking {
            remap_mesh_uvs(atlas.region(linking.region), &mut linking.mesh, linking.front_vertex_count);
        }
        Self {
            body,
            atlas,
            skeleton,
            report,
        }
    }

    /// Mesh of `group`.
    #[must_use]
    pub fn group(&self, group: AnatomicalGroup) -> &StitchedGroupMesh {
        self.body.group(group)
    }

    /// Linking mesh of `region`.
    #[must_use]
    pub fn linking_mesh(&self, region: TextureRegion) -> &LinkingMesh {
        self.body.linking_mesh(region)
    }

    /// Atlas image of `region`.
    #[must_use]
    pub fn texture(&self, region: TextureRegion) -> &RgbaImage {
        &self.atlas.region(region).image
    }

    /// Moves every group container onto `skeleton` and lets the linking
    /// meshes follow.
    ///
    /// # Errors
    ///
    /// Propagates [`mesh_stitch::StitchError`] from the linking refresh.
    pub fn apply_skeleton(&mut self, skeleton: &Skeleton) -> SessionResult<()> {
        for group in &mut self.body.groups {
            group.container = *skeleton.poi_pose(group.group.anchor());
        }
        let containers: Vec<Pose> = self.body.containers();
        for linking in &mut self.body.linking {
            linking.refresh(&containers)?;
        }
        self.skeleton = skeleton.clone();
        Ok(())
    }

    /// Total vertices across group and linking meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.body.vertex_count()
    }

    /// Total triangles across group and linking meshes.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.body.groups.iter().map(MeshTopology::face_count).sum::<usize>()
            + self.body.linking.iter().map(MeshTopology::face_count).sum::<usize>()
    }

    /// The meshes, containers and textures handed to transport.
    #[must_use]
    pub fn mesh_set(&self) -> MeshSet {
        MeshSet {
            groups: self.body.groups.clone(),
            linking: self.body.linking.clone(),
            textures: self.atlas.regions.iter().map(|r| r.image.clone()).collect(),
        }
    }
}

impl std::fmt::Display for BodyScan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BodyScan: {} vertices, {} triangles, {} groups, {} textures",
            self.vertex_count(),
            self.face_count(),
            self.body.groups.iter().filter(|g| g.vertex_count() > 0).count(),
            self.atlas.regions.len()
        )
    }
}
