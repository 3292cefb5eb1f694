//! Whole-body stitching of a front and back segmented scan.

use mesh_region::{AnatomicalGroup, GroupSubmesh, SegmentedScan, Skeleton, TextureRegion};
use mesh_transform::{Pose, Transform3D};
use mesh_types::MeshTopology;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::combine::{StitchedGroupMesh, combine_halves};
use crate::error::{StitchError, StitchResult};
use crate::linking::{LinkingMesh, LinkingSource, build_linking_meshes};
use crate::overlap::{align_by_centroids, place_back, remove_overlap};

/// Parameters for stitching.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchParams {
    /// Smoothing passes along each seam before zipping. Default: 3.
    pub smoothing_iterations: usize,
    /// Depth gap left between the head halves after centroid alignment, in
    /// metres. `None` skips head alignment. Default: `Some(0.15)`.
    pub head_depth_gap: Option<f64>,
    /// Turn about Y that brings the back scan into the front frame, in
    /// degrees. Default: 180.
    pub back_turn_degrees: f64,
    /// Stitch groups on the rayon pool. Default: true.
    pub parallel: bool,
}

impl Default for StitchParams {
    fn default() -> Self {
        Self {
            smoothing_iterations: 3,
            head_depth_gap: Some(0.15),
            back_turn_degrees: 180.0,
            parallel: true,
        }
    }
}

impl StitchParams {
    /// Creates new parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of seam smoothing passes.
    #[must_use]
    pub const fn with_smoothing_iterations(mut self, iterations: usize) -> Self {
        self.smoothing_iterations = iterations;
        self
    }

    /// Sets the head depth gap, or disables head alignment with `None`.
    #[must_use]
    pub const fn with_head_depth_gap(mut self, gap: Option<f64>) -> Self {
        self.head_depth_gap = gap;
        self
    }

    /// Sets the back-scan turn angle.
    #[must_use]
    pub const fn with_back_turn_degrees(mut self, degrees: f64) -> Self {
        self.back_turn_degrees = degrees;
        self
    }

    /// Sets whether groups are stitched in parallel.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// How far stitching got for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupStatus {
    /// Both seams were zipped.
    Stitched,
    /// The group has geometry but no seam triangles could be added (one
    /// half or every seam chain was empty).
    Partial,
    /// Neither scan has any vertices in this group.
    Empty,
}

/// Outcome of stitching one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStitchReport {
    /// The group.
    pub group: AnatomicalGroup,
    /// Outcome.
    pub status: GroupStatus,
    /// Front vertices removed as overlap.
    pub removed_front: usize,
    /// Back vertices removed as overlap.
    pub removed_back: usize,
    /// Seam triangles added.
    pub seam_triangles: usize,
}

/// A fully stitched body: one mesh per group plus the linking meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct StitchedBody {
    /// One stitched mesh per group, in group order.
    pub groups: Vec<StitchedGroupMesh>,
    /// One linking mesh per texture region, in region order.
    pub linking: Vec<LinkingMesh>,
    /// One report per group, in group order.
    pub reports: Vec<GroupStitchReport>,
}

impl StitchedBody {
    /// Stitched mesh of `group`.
    #[must_use]
    pub fn group(&self, group: AnatomicalGroup) -> &StitchedGroupMesh {
        &self.groups[group.index()]
    }

    /// Linking mesh of `region`.
    #[must_use]
    pub fn linking_mesh(&self, region: TextureRegion) -> &LinkingMesh {
        &self.linking[region.index()]
    }

    /// Container pose of every group, in group order.
    #[must_use]
    pub fn containers(&self) -> Vec<Pose> {
        self.groups.iter().map(|g| g.container).collect()
    }

    /// Moves `group`'s container and updates the linking meshes hooked to it.
    ///
    /// # Errors
    ///
    /// Propagates [`StitchError`] from [`LinkingMesh::refresh`].
    pub fn pose_group(&mut self, group: AnatomicalGroup, pose: Pose) -> StitchResult<()> {
        self.groups[group.index()].container = pose;
        let containers = self.containers();
        for mesh in &mut self.linking {
            mesh.refresh(&containers)?;
        }
        Ok(())
    }

    /// Number of groups with the given status.
    #[must_use]
    pub fn count_status(&self, status: GroupStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }

    /// Total vertices across group and linking meshes.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.groups.iter().map(MeshTopology::vertex_count).sum::<usize>()
            + self.linking.iter().map(MeshTopology::vertex_count).sum::<usize>()
    }
}

impl std::fmt::Display for StitchedBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let seams: usize = self.reports.iter().map(|r| r.seam_triangles).sum();
        let removed: usize = self
            .reports
            .iter()
            .map(|r| r.removed_front + r.removed_back)
            .sum();
        write!(
            f,
            "Stitch: {} stitched, {} partial, {} empty groups; {} seam triangles, {} overlap vertices removed",
            self.count_status(GroupStatus::Stitched),
            self.count_status(GroupStatus::Partial),
            self.count_status(GroupStatus::Empty),
            seams,
            removed
        )
    }
}

struct GroupStitch {
    mesh: StitchedGroupMesh,
    front: GroupSubmesh,
    back: GroupSubmesh,
    report: GroupStitchReport,
}

/// Stitches a segmented front and back scan into one body.
///
/// `skeleton` is the front scan's skeleton; each group's container is the
/// pose of its anchor POI. For every group the back half is turned into the
/// front frame, the head halves are aligned, overlap is removed from the
/// front then the back, and the halves are combined and zipped. Linking
/// meshes are then built from the surviving created edges of both scans.
///
/// Groups without geometry are kept as empty meshes and reported as
/// [`GroupStatus::Empty`].
///
/// # Errors
///
/// Returns [`StitchError::GroupCount`] if either scan does not hold all 21
/// groups, or [`StitchError::InvalidTurn`] for a non-finite turn angle.
pub fn stitch_body(
    front: &SegmentedScan,
    back: &SegmentedScan,
    skeleton: &Skeleton,
    params: &StitchParams,
) -> StitchResult<StitchedBody> {
    for (what, scan) in [("front scan", front), ("back scan", back)] {
        if scan.groups.len() != AnatomicalGroup::COUNT {
            return Err(StitchError::GroupCount {
                what,
                expected: AnatomicalGroup::COUNT,
                actual: scan.groups.len(),
            });
        }
    }
    if !params.back_turn_degrees.is_finite() {
        return Err(StitchError::InvalidTurn(params.back_turn_degrees));
    }
    let turn = Transform3D::rotation_y(params.back_turn_degrees.to_radians());

    let stitch = |group: &AnatomicalGroup| {
        stitch_group(
            front.group(*group),
            back.group(*group),
            *skeleton.poi_pose(group.anchor()),
            &turn,
            params,
        )
    };
    let stitched: Vec<GroupStitch> = if params.parallel {
        AnatomicalGroup::ALL
            .par_iter()
            .map(stitch)
            .collect::<StitchResult<_>>()?
    } else {
        AnatomicalGroup::ALL
            .iter()
            .map(stitch)
            .collect::<StitchResult<_>>()?
    };

    let mut groups = Vec::with_capacity(stitched.len());
    let mut fronts = Vec::with_capacity(stitched.len());
    let mut backs = Vec::with_capacity(stitched.len());
    let mut reports = Vec::with_capacity(stitched.len());
    for s in stitched {
        groups.push(s.mesh);
        fronts.push(s.front);
        backs.push(s.back);
        reports.push(s.report);
    }

    let containers: Vec<Pose> = groups.iter().map(|g| g.container).collect();
    let linking = build_linking_meshes(
        LinkingSource {
            groups: &fronts,
            cut_triangles: &front.cut_triangles,
        },
        LinkingSource {
            groups: &backs,
            cut_triangles: &back.cut_triangles,
        },
        &containers,
    )?;

    let body = StitchedBody {
        groups,
        linking,
        reports,
    };
    info!("{body}");
    Ok(body)
}

fn stitch_group(
    front: &GroupSubmesh,
    back: &GroupSubmesh,
    container: Pose,
    turn: &Transform3D,
    params: &StitchParams,
) -> StitchResult<GroupStitch> {
    let group = front.group;
    let mut front = front.clone();
    let mut back = back.clone();
    place_back(&mut back, front.origin, turn);

    if front.is_empty() && back.is_empty() {
        debug!(group = group.name(), "Group empty in both scans");
        return Ok(GroupStitch {
            mesh: StitchedGroupMesh::empty(group, container),
            front,
            back,
            report: GroupStitchReport {
                group,
                status: GroupStatus::Empty,
                removed_front: 0,
                removed_back: 0,
                seam_triangles: 0,
            },
        });
    }

    if group == AnatomicalGroup::Head && !front.is_empty() && !back.is_empty() {
        if let Some(gap) = params.head_depth_gap {
            let offset = align_by_centroids(&front, &mut back, gap);
            debug!(?offset, "Head halves aligned");
        }
    }

    let removed_front = remove_overlap(&mut front, &back)?;
    let removed_back = remove_overlap(&mut back, &front)?;

    let mesh = combine_halves(&front, &back, container, params.smoothing_iterations);
    let status = if mesh.seam_triangle_count > 0 {
        GroupStatus::Stitched
    } else {
        warn!(
            group = group.name(),
            front = front.vertex_count(),
            back = back.vertex_count(),
            "No seam triangles; group left open"
        );
        GroupStatus::Partial
    };

    let report = GroupStitchReport {
        group,
        status,
        removed_front,
        removed_back,
        seam_triangles: mesh.seam_triangle_count,
    };
    Ok(GroupStitch {
        mesh,
        front,
        back,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_region::{SegmentParams, segment_scan};
    use mesh_scan::ScannedEdges;
    use mesh_types::{IndexedMesh, Point2, Point3, Vector3, Vertex};

    /// A small square patch of `n` x `n` vertices centred on `centre`,
    /// facing the camera, with its outer ring as boundary.
    fn patch(centre: Point3<f64>, n: u32, spacing: f64) -> (IndexedMesh, ScannedEdges) {
        let mut mesh = IndexedMesh::new();
        let half = f64::from(n - 1) / 2.0;
        for i in 0..n * n {
            let (col, row) = (f64::from(i % n), f64::from(i / n));
            let offset = Vector3::new((col - half) * spacing, (row - half) * spacing, 0.0);
            mesh.vertices.push(Vertex::new(centre + offset, Point2::new(col / 10.0, row / 10.0)));
        }
        for row in 0..n - 1 {
            for col in 0..n - 1 {
                let c0 = row * n + col;
                mesh.faces.push([c0, c0 + 1, c0 + n]);
                mesh.faces.push([c0 + n, c0 + 1, c0 + n + 1]);
            }
        }
        let ring = (0..n * n).filter(|i| {
            let (col, row) = (i % n, i / n);
            col == 0 || row == 0 || col == n - 1 || row == n - 1
        });
        let edges = ScannedEdges::from_vertices((n * n) as usize, ring);
        (mesh, edges)
    }

    fn segmented(skeleton: &Skeleton, depth: f64) -> SegmentedScan {
        let anchor = skeleton.poi_position(AnatomicalGroup::UpperTorso.anchor());
        let (mesh, edges) = patch(anchor + Vector3::new(0.0, 0.0, depth), 5, 0.01);
        segment_scan(&mesh, &edges, skeleton, &SegmentParams::sequential()).unwrap()
    }

    #[test]
    fn test_stitch_single_group() {
        let skeleton = Skeleton::reference();
        let front = segmented(&skeleton, -0.05);
        let back = segmented(&skeleton, -0.05);
        let params = StitchParams::new().with_parallel(false);
        let body = stitch_body(&front, &back, &skeleton, &params).unwrap();

        assert_eq!(body.groups.len(), AnatomicalGroup::COUNT);
        assert_eq!(body.linking.len(), TextureRegion::COUNT);
        let report = &body.reports[AnatomicalGroup::UpperTorso.index()];
        assert_eq!(report.status, GroupStatus::Stitched);
        assert!(report.seam_triangles > 0);
        assert_eq!(body.count_status(GroupStatus::Empty), AnatomicalGroup::COUNT - 1);

        let torso = body.group(AnatomicalGroup::UpperTorso);
        assert_eq!(torso.container, *skeleton.poi_pose(AnatomicalGroup::UpperTorso.anchor()));
        assert!(torso.mesh.faces.iter().flatten().all(|&v| (v as usize) < torso.vertex_count()));
        assert!(body.to_string().starts_with("Stitch: 1 stitched"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let skeleton = Skeleton::reference();
        let front = segmented(&skeleton, -0.05);
        let back = segmented(&skeleton, -0.05);
        let a = stitch_body(&front, &back, &skeleton, &StitchParams::new()).unwrap();
        let b = stitch_body(&front, &back, &skeleton, &StitchParams::new().with_parallel(false)).unwrap();
        assert_eq!(a.reports, b.reports);
        for (ga, gb) in a.groups.iter().zip(&b.groups) {
            assert_eq!(ga.mesh.faces, gb.mesh.faces);
        }
    }

    #[test]
    fn test_rejects_short_scan() {
        let skeleton = Skeleton::reference();
        let front = segmented(&skeleton, 0.0);
        let mut back = front.clone();
        back.groups.truncate(3);
        assert!(matches!(
            stitch_body(&front, &back, &skeleton, &StitchParams::new()),
            Err(StitchError::GroupCount { what: "back scan", .. })
        ));
        let params = StitchParams::new().with_back_turn_degrees(f64::NAN);
        assert!(matches!(
            stitch_body(&front, &front, &skeleton, &params),
            Err(StitchError::InvalidTurn(_))
        ));
    }

    #[test]
    fn test_pose_group_moves_hooks() {
        let skeleton = Skeleton::reference();
        let front = segmented(&skeleton, 0.0);
        let back = segmented(&skeleton, 0.0);
        let mut body = stitch_body(&front, &back, &skeleton, &StitchParams::new()).unwrap();
        let moved = Pose::at(Point3::new(5.0, 5.0, 5.0));
        body.pose_group(AnatomicalGroup::UpperTorso, moved).unwrap();
        assert_eq!(body.group(AnatomicalGroup::UpperTorso).container, moved);
    }
}
