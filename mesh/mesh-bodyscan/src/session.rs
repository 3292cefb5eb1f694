//! The two-capture reconstruction session.
//!
//! A session walks one front and one back capture through the pipeline:
//!
//! 1. [`select_front`](ReconstructionSession::select_front)
//! 2. [`select_back`](ReconstructionSession::select_back)
//! 3. [`reconstruct`](ReconstructionSession::reconstruct) - mask denoising and lattice triangulation
//! 4. [`segment`](ReconstructionSession::segment) - anatomical groups
//! 5. [`stitch`](ReconstructionSession::stitch) - overlap removal, zipping, linking meshes
//! 6. [`build_atlas`](ReconstructionSession::build_atlas) - per-region textures
//!
//! Each step needs the one before it. Re-running a step discards the
//! results of every later step. [`finish`](ReconstructionSession::finish)
//! assembles the [`BodyScan`].

use mesh_atlas::{ScanTexture, TextureAtlas, build_atlas};
use mesh_region::{SegmentedScan, Skeleton, segment_scan};
use mesh_scan::{
    DepthLattice, LatticeMesh, MaskDenoiseResult, RasterMask, ScannedEdges, denoise_mask,
    find_scanned_edges, reconstruct_lattice,
};
use mesh_stitch::{GroupStatus, StitchedBody, stitch_body};
use mesh_types::MeshTopology;
use tracing::{info, warn};

use crate::error::{SessionError, SessionResult};
use crate::params::BodyScanParams;
use crate::report::{PipelineReport, Side, Stage, StageReport, StageStatus};
use crate::scan::BodyScan;
use crate::snapshot::ScanSnapshot;

/// A value for each capture.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontBack<T> {
    /// Front capture.
    pub front: T,
    /// Back capture.
    pub back: T,
}

impl<T> FrontBack<T> {
    /// The value for `side`.
    #[must_use]
    pub const fn get(&self, side: Side) -> &T {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }
}

/// A capture copied into the session and turned to face the camera frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedScan {
    /// Which capture this is.
    pub side: Side,
    /// Capture time key.
    pub timestamp: u64,
    /// Depth samples; back scans have mirrored UVs.
    pub lattice: DepthLattice,
    /// Body mask before denoising.
    pub body_mask: RasterMask,
    /// Colour texture; back scans are turned 180 degrees.
    pub texture: ScanTexture,
    /// Skeleton; back scans are rebuilt from the front skeleton's offsets.
    pub skeleton: Skeleton,
}

/// Output of the reconstruction stage for one capture.
#[derive(Debug, Clone)]
pub struct ReconstructedScan {
    /// Triangulated lattice and its denoised mask.
    pub lattice_mesh: LatticeMesh,
    /// Boundary vertices of the surface.
    pub edges: ScannedEdges,
    /// Texture with a denoised colour mask.
    pub texture: ScanTexture,
    /// Body mask denoising summary.
    pub body_denoise: MaskDenoiseResult,
    /// Colour mask denoising summary.
    pub colour_denoise: MaskDenoiseResult,
}

/// State of one front/back reconstruction.
#[derive(Debug, Clone, Default)]
pub struct ReconstructionSession {
    params: BodyScanParams,
    front: Option<PreparedScan>,
    back: Option<PreparedScan>,
    reconstructed: Option<FrontBack<ReconstructedScan>>,
    segmented: Option<FrontBack<SegmentedScan>>,
    body: Option<StitchedBody>,
    atlas: Option<TextureAtlas>,
    report: PipelineReport,
}

impl ReconstructionSession {
    /// A session with no captures selected.
    #[must_use]
    pub fn new(params: BodyScanParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Session parameters.
    #[must_use]
    pub const fn params(&self) -> &BodyScanParams {
        &self.params
    }

    /// Reports of every stage run so far.
    #[must_use]
    pub const fn report(&self) -> &PipelineReport {
        &self.report
    }

    /// The selected front capture.
    #[must_use]
    pub const fn front(&self) -> Option<&PreparedScan> {
        self.front.as_ref()
    }

    /// The selected back capture.
    #[must_use]
    pub const fn back(&self) -> Option<&PreparedScan> {
        self.back.as_ref()
    }

    /// Reconstructed surfaces, once [`Stage::Reconstruct`] has run.
    #[must_use]
    pub const fn reconstructed(&self) -> Option<&FrontBack<ReconstructedScan>> {
        self.reconstructed.as_ref()
    }

    /// Segmented scans, once [`Stage::Segment`] has run.
    #[must_use]
    pub const fn segmented(&self) -> Option<&FrontBack<SegmentedScan>> {
        self.segmented.as_ref()
    }

    /// Stitched body, once [`Stage::Stitch`] has run.
    #[must_use]
    pub const fn body(&self) -> Option<&StitchedBody> {
        self.body.as_ref()
    }

    /// Texture atlas, once [`Stage::Atlas`] has run.
    #[must_use]
    pub const fn atlas(&self) -> Option<&TextureAtlas> {
        self.atlas.as_ref()
    }

    /// True if `stage` has run and not been discarded since.
    #[must_use]
    pub const fn is_done(&self, stage: Stage) -> bool {
        match stage {
            Stage::SelectFront => self.front.is_some(),
            Stage::SelectBack => self.back.is_some(),
            Stage::Reconstruct => self.reconstructed.is_some(),
            Stage::Segment => self.segmented.is_some(),
            Stage::Stitch => self.body.is_some(),
            Stage::Atlas => self.atlas.is_some(),
        }
    }

    /// Chooses the front capture and discards everything built so far.
    ///
    /// A capture without a skeleton falls back to the reference pose and
    /// the stage is reported as degraded.
    pub fn select_front(&mut self, snapshot: &ScanSnapshot) {
        self.discard_from(Stage::SelectFront);
        let (skeleton, tracked) = skeleton_or_reference(snapshot, Side::Front);

        let prepared = PreparedScan {
            side: Side::Front,
            timestamp: snapshot.timestamp,
            lattice: snapshot.lattice.clone(),
            body_mask: snapshot.body_mask.clone(),
            texture: snapshot.texture.clone(),
            skeleton,
        };
        self.record(selection_report(Stage::SelectFront, &prepared, tracked));
        self.front = Some(prepared);
    }

    /// Chooses the back capture and turns it into the front frame.
    ///
    /// UVs are mirrored, the texture is rotated by 180 degrees and the
    /// skeleton is rebuilt with offsets from the front skeleton. Later
    /// stages are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingStage`] without a front capture and
    /// [`SessionError::ShapeMismatch`] if the lattices differ in size.
    pub fn select_back(&mut self, snapshot: &ScanSnapshot) -> SessionResult<()> {
        let front = self.front.as_ref().ok_or(SessionError::MissingStage {
            stage: Stage::SelectBack,
            missing: Stage::SelectFront,
        })?;
        if snapshot.dimensions() != front.lattice.dimensions() {
            return Err(SessionError::ShapeMismatch {
                what: "back lattice",
                expected: front.lattice.dimensions(),
                actual: snapshot.dimensions(),
            });
        }

        let (skeleton, tracked) = skeleton_or_reference(snapshot, Side::Back);
        let skeleton = skeleton.reversed(&front.skeleton.reverse_offsets());
        let mut lattice = snapshot.lattice.clone();
        lattice.mirror_uvs();

        let prepared = PreparedScan {
            side: Side::Back,
            timestamp: snapshot.timestamp,
            lattice,
            body_mask: snapshot.body_mask.clone(),
            texture: snapshot.texture.rotated_180(),
            skeleton,
        };
        self.discard_from(Stage::SelectBack);
        self.record(selection_report(Stage::SelectBack, &prepared, tracked));
        self.back = Some(prepared);
        Ok(())
    }

    /// Denoises both masks of each capture and triangulates the lattices.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingStage`] unless both captures are
    /// selected, or a wrapped [`mesh_scan::ScanError`] if a mask does not
    /// fit its lattice.
    pub fn reconstruct(&mut self) -> SessionResult<()> {
        self.require(Stage::Reconstruct)?;
        let (Some(front), Some(back)) = (&self.front, &self.back) else {
            return Err(self.missing(Stage::Reconstruct));
        };

        let (front, front_report) = reconstruct_side(front, &self.params)?;
        let (back, back_report) = reconstruct_side(back, &self.params)?;
        self.discard_from(Stage::Reconstruct);
        self.record(front_report);
        self.record(back_report);
        self.reconstructed = Some(FrontBack { front, back });
        Ok(())
    }

    /// Splits both surfaces into anatomical groups using each capture's
    /// skeleton.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingStage`] before reconstruction, or a
    /// wrapped [`mesh_region::RegionError`].
    pub fn segment(&mut self) -> SessionResult<()> {
        self.require(Stage::Segment)?;
        let (Some(front), Some(back), Some(surfaces)) = (&self.front, &self.back, &self.reconstructed)
        else {
            return Err(self.missing(Stage::Segment));
        };

        let mut reports = Vec::with_capacity(2);
        let mut segment = |prepared: &PreparedScan, surface: &ReconstructedScan| {
            let scan = segment_scan(
                &surface.lattice_mesh.mesh,
                &surface.edges,
                &prepared.skeleton,
                &self.params.segment,
            )?;
            let status = if scan.non_empty_groups().next().is_some() {
                StageStatus::Completed
            } else {
                warn!(side = %prepared.side, "Segmentation left every group empty");
                StageStatus::Skipped
            };
            reports.push(StageReport::for_side(Stage::Segment, prepared.side, status, scan.to_string()));
            Ok::<_, SessionError>(scan)
        };
        let segmented = FrontBack {
            front: segment(front, &surfaces.front)?,
            back: segment(back, &surfaces.back)?,
        };

        self.discard_from(Stage::Segment);
        for report in reports {
            self.record(report);
        }
        self.segmented = Some(segmented);
        Ok(())
    }

    /// Stitches the segmented halves into one body.
    ///
    /// Group containers follow the front skeleton.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingStage`] before segmentation, or a
    /// wrapped [`mesh_stitch::StitchError`].
    pub fn stitch(&mut self) -> SessionResult<()> {
        self.require(Stage::Stitch)?;
        let (Some(front), Some(segmented)) = (&self.front, &self.segmented) else {
            return Err(self.missing(Stage::Stitch));
        };

        let body = stitch_body(&segmented.front, &segmented.back, &front.skeleton, &self.params.stitch)?;
        let status = if body.count_status(GroupStatus::Empty) == body.groups.len() {
            StageStatus::Skipped
        } else if body.count_status(GroupStatus::Partial) > 0 {
            StageStatus::Degraded
        } else {
            StageStatus::Completed
        };

        self.discard_from(Stage::Stitch);
        self.record(StageReport::new(Stage::Stitch, status, body.to_string()));
        self.body = Some(body);
        Ok(())
    }

    /// Builds the per-region texture atlas from both denoised textures.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingStage`] before stitching, or a
    /// wrapped [`mesh_atlas::AtlasError`].
    pub fn build_atlas(&mut self) -> SessionResult<()> {
        self.require(Stage::Atlas)?;
        let (Some(surfaces), Some(segmented)) = (&self.reconstructed, &self.segmented) else {
            return Err(self.missing(Stage::Atlas));
        };

        let atlas = build_atlas(
            &surfaces.front.texture,
            &segmented.front,
            &surfaces.back.texture,
            &segmented.back,
            &self.params.atlas,
        )?;
        let blank = atlas.blank_regions().count();
        let status = match blank {
            0 => StageStatus::Completed,
            n if n == atlas.regions.len() => StageStatus::Skipped,
            _ => StageStatus::Degraded,
        };

        self.discard_from(Stage::Atlas);
        self.record(StageReport::new(
            Stage::Atlas,
            status,
            format!("{} regions, {blank} without colour", atlas.regions.len()),
        ));
        self.atlas = Some(atlas);
        Ok(())
    }

    /// Assembles the finished body with UVs remapped into the atlas.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingStage`] before the atlas is built.
    pub fn finish(&self) -> SessionResult<BodyScan> {
        let (Some(front), Some(body), Some(atlas)) = (&self.front, &self.body, &self.atlas) else {
            return Err(self.missing(Stage::Atlas));
        };
        let scan = BodyScan::assemble(body.clone(), atlas.clone(), front.skeleton.clone(), self.report.clone());
        info!(
            vertices = scan.vertex_count(),
            triangles = scan.face_count(),
            issues = self.report.has_issues(),
            "Body scan finished"
        );
        Ok(scan)
    }

    /// Runs every stage after the selections and finishes.
    ///
    /// # Errors
    ///
    /// Propagates the first stage error.
    pub fn run(&mut self) -> SessionResult<BodyScan> {
        self.reconstruct()?;
        self.segment()?;
        self.stitch()?;
        self.build_atlas()?;
        self.finish()
    }

    fn require(&self, stage: Stage) -> SessionResult<()> {
        match stage.prerequisite() {
            Some(missing) if !self.is_done(missing) => Err(SessionError::MissingStage { stage, missing }),
            _ => Ok(()),
        }
    }

    /// Error naming the earliest stage that has not run.
    fn missing(&self, stage: Stage) -> SessionError {
        let missing = Stage::ALL
            .into_iter()
            .take_while(|&s| s < stage)
            .find(|&s| !self.is_done(s))
            .unwrap_or(stage);
        SessionError::MissingStage { stage, missing }
    }

    fn discard_from(&mut self, stage: Stage) {
        if stage <= Stage::SelectFront {
            self.front = None;
        }
        if stage <= Stage::SelectBack {
            self.back = None;
        }
        if stage <= Stage::Reconstruct {
            self.reconstructed = None;
        }
        if stage <= Stage::Segment {
            self.segmented = None;
        }
        if stage <= Stage::Stitch {
            self.body = None;
        }
        self.atlas = None;
        self.report.discard_from(stage);
    }

    fn record(&mut self, report: StageReport) {
        info!("{report}");
        self.report.record(report);
    }
}

/// Runs a whole session on one front and one back capture.
///
/// # Errors
///
/// Propagates the first stage error.
pub fn reconstruct_body(
    front: &ScanSnapshot,
    back: &ScanSnapshot,
    params: &BodyScanParams,
) -> SessionResult<BodyScan> {
    let mut session = ReconstructionSession::new(params.clone());
    session.select_front(front);
    session.select_back(back)?;
    session.run()
}

fn skeleton_or_reference(snapshot: &ScanSnapshot, side: Side) -> (Skeleton, bool) {
    snapshot.skeleton.clone().map_or_else(
        || {
            warn!(%side, timestamp = snapshot.timestamp, "No skeleton tracked; using reference pose");
            (Skeleton::reference(), false)
        },
        |s| (s, true),
    )
}

fn selection_report(stage: Stage, prepared: &PreparedScan, tracked: bool) -> StageReport {
    let (w, h) = prepared.lattice.dimensions();
    let mut detail = format!(
        "capture {}: {w}x{h} lattice, {} body samples",
        prepared.timestamp,
        prepared.body_mask.unmasked_count()
    );
    let status = if tracked {
        StageStatus::Completed
    } else {
        detail.push_str(", reference skeleton");
        StageStatus::Degraded
    };
    StageReport::for_side(stage, prepared.side, status, detail)
}

fn reconstruct_side(
    prepared: &PreparedScan,
    params: &BodyScanParams,
) -> SessionResult<(ReconstructedScan, StageReport)> {
    let mut mask = prepared.body_mask.clone();
    let body_denoise = denoise_mask(&mut mask, &params.denoise);
    let lattice_mesh = reconstruct_lattice(&prepared.lattice, &mask)?;
    let edges = find_scanned_edges(&lattice_mesh);

    let mut texture = prepared.texture.clone();
    let colour_denoise = texture.denoise_mask(&params.denoise);

    let vertices = lattice_mesh.mesh.vertex_count();
    let detail = format!(
        "{vertices} vertices, {} triangles, {} boundary, {} mask cells removed",
        lattice_mesh.mesh.face_count(),
        edges.len(),
        body_denoise.removed()
    );
    let status = if vertices == 0 {
        warn!(side = %prepared.side, "No body samples survived denoising");
        StageStatus::Skipped
    } else if colour_denoise.unmasked_after == 0 {
        warn!(side = %prepared.side, "Colour mask is empty after denoising");
        StageStatus::Degraded
    } else {
        StageStatus::Completed
    };

    let scan = ReconstructedScan {
        lattice_mesh,
        edges,
        texture,
        body_denoise,
        colour_denoise,
    };
    Ok((scan, StageReport::for_side(Stage::Reconstruct, prepared.side, status, detail)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use mesh_region::AnatomicalGroup;
    use mesh_scan::{DepthSample, MaskDenoiseParams};
    use mesh_types::{Point2, Point3, Vector3};

    /// A `n` x `n` lattice of body samples in front of the upper torso.
    fn snapshot(timestamp: u64, n: usize, skeleton: Option<Skeleton>) -> ScanSnapshot {
        let anchor = Skeleton::reference().poi_position(AnatomicalGroup::UpperTorso.anchor());
        let half = (n - 1) as f64 / 2.0;
        let samples = (0..n * n)
            .map(|i| {
                let (col, row) = ((i % n) as f64, (i / n) as f64);
                let offset = Vector3::new((col - half) * 0.01, (row - half) * 0.01, -0.05);
                DepthSample::new(anchor + offset, Point2::new(col / n as f64, row / n as f64), true)
            })
            .collect();
        let lattice = DepthLattice::new(n, n, samples).unwrap();
        ScanSnapshot::new(timestamp, lattice, ScanTexture::solid(16, 16, Rgba([200, 120, 90, 255])), skeleton)
    }

    fn params() -> BodyScanParams {
        BodyScanParams::sequential().with_denoise(MaskDenoiseParams::none())
    }

    #[test]
    fn test_stages_need_prerequisites() {
        let mut session = ReconstructionSession::new(params());
        let err = session.select_back(&snapshot(2, 5, None)).unwrap_err();
        assert_eq!(
            err,
            SessionError::MissingStage {
                stage: Stage::SelectBack,
                missing: Stage::SelectFront
            }
        );

        session.select_front(&snapshot(1, 5, None));
        assert!(matches!(
            session.segment(),
            Err(SessionError::MissingStage {
                missing: Stage::Reconstruct,
                ..
            })
        ));
        assert!(matches!(
            session.finish(),
            Err(SessionError::MissingStage {
                missing: Stage::SelectBack,
                ..
            })
        ));
    }

    #[test]
    fn test_back_must_match_front() {
        let mut session = ReconstructionSession::new(params());
        session.select_front(&snapshot(1, 5, Some(Skeleton::reference())));
        let err = session.select_back(&snapshot(2, 4, None)).unwrap_err();
        assert!(matches!(err, SessionError::ShapeMismatch { what: "back lattice", .. }));
        assert!(!session.is_done(Stage::SelectBack));
    }

    #[test]
    fn test_missing_skeleton_is_degraded() {
        let mut session = ReconstructionSession::new(params());
        session.select_front(&snapshot(1, 5, None));
        assert_eq!(session.report().status(Stage::SelectFront), Some(StageStatus::Degraded));
        assert_eq!(session.front().unwrap().skeleton, Skeleton::reference());

        session.select_front(&snapshot(3, 5, Some(Skeleton::reference())));
        assert_eq!(session.report().status(Stage::SelectFront), Some(StageStatus::Completed));
        assert_eq!(session.report().stages.len(), 1);
        assert_eq!(session.front().unwrap().timestamp, 3);
    }

    #[test]
    fn test_back_is_turned() {
        let front = snapshot(1, 5, Some(Skeleton::reference()));
        let back = snapshot(2, 5, Some(Skeleton::reference()));
        let mut session = ReconstructionSession::new(params());
        session.select_front(&front);
        session.select_back(&back).unwrap();

        let prepared = session.back().unwrap();
        assert_eq!(prepared.side, Side::Back);
        assert_eq!(prepared.texture, back.texture.rotated_180());
        let uv = prepared.lattice.samples()[0].uv;
        assert!((uv.x - (1.0 - back.lattice.samples()[0].uv.x)).abs() < 1e-12);
    }

    #[test]
    fn test_run_builds_body() {
        let skeleton = Some(Skeleton::reference());
        let scan = reconstruct_body(&snapshot(1, 5, skeleton.clone()), &snapshot(2, 5, skeleton), &params()).unwrap();

        assert!(scan.report.is_complete());
        assert_eq!(scan.report.reports_for(Stage::Reconstruct).count(), 2);
        assert_eq!(scan.report.status(Stage::Reconstruct), Some(StageStatus::Completed));
        assert!(scan.vertex_count() > 0);
        assert_eq!(scan.body.groups.len(), AnatomicalGroup::COUNT);
        assert!(scan.to_string().starts_with("BodyScan: "));
    }

    #[test]
    fn test_rerun_discards_later_stages() {
        let skeleton = Some(Skeleton::reference());
        let mut session = ReconstructionSession::new(params());
        session.select_front(&snapshot(1, 5, skeleton.clone()));
        session.select_back(&snapshot(2, 5, skeleton)).unwrap();
        session.run().unwrap();
        assert!(session.is_done(Stage::Atlas));

        session.reconstruct().unwrap();
        assert!(session.is_done(Stage::Reconstruct));
        assert!(!session.is_done(Stage::Segment));
        assert!(!session.is_done(Stage::Atlas));
        assert_eq!(session.report().status(Stage::Stitch), None);
        assert!(session.finish().is_err());
    }
}
