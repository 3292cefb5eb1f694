//! Per-stage status reporting.

use std::fmt;

/// Pipeline stages, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// A front capture was chosen.
    SelectFront,
    /// A back capture was chosen and turned around.
    SelectBack,
    /// Masks denoised and lattices triangulated.
    Reconstruct,
    /// Meshes split into anatomical groups.
    Segment,
    /// Front and back groups joined.
    Stitch,
    /// Region textures cropped and joined.
    Atlas,
}

impl Stage {
    /// Every stage, in order.
    pub const ALL: [Self; 6] = [
        Self::SelectFront,
        Self::SelectBack,
        Self::Reconstruct,
        Self::Segment,
        Self::Stitch,
        Self::Atlas,
    ];

    /// The stage that must have run before this one.
    #[must_use]
    pub const fn prerequisite(self) -> Option<Self> {
        match self {
            Self::SelectFront => None,
            Self::SelectBack => Some(Self::SelectFront),
            Self::Reconstruct => Some(Self::SelectBack),
            Self::Segment => Some(Self::Reconstruct),
            Self::Stitch => Some(Self::Segment),
            Self::Atlas => Some(Self::Stitch),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SelectFront => "front selection",
            Self::SelectBack => "back selection",
            Self::Reconstruct => "reconstruction",
            Self::Segment => "segmentation",
            Self::Stitch => "stitching",
            Self::Atlas => "texture atlas",
        })
    }
}

/// Which capture a report or scan belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Subject facing the camera.
    Front,
    /// Subject facing away.
    Back,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Front => "front",
            Self::Back => "back",
        })
    }
}

/// Outcome of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageStatus {
    /// Ran with nothing unusual.
    Completed,
    /// Ran, but some groups, regions or inputs fell back to defaults.
    Degraded,
    /// Had nothing to work on.
    Skipped,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Completed => "completed",
            Self::Degraded => "degraded",
            Self::Skipped => "skipped",
        })
    }
}

/// Report of one stage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    /// The stage.
    pub stage: Stage,
    /// Capture the stage ran on, if it runs once per side.
    pub side: Option<Side>,
    /// Outcome.
    pub status: StageStatus,
    /// Human-readable summary.
    pub detail: String,
}

impl StageReport {
    /// A report for a stage that runs once per session.
    #[must_use]
    pub fn new(stage: Stage, status: StageStatus, detail: impl Into<String>) -> Self {
        Self {
            stage,
            side: None,
            status,
            detail: detail.into(),
        }
    }

    /// A report for one side of a per-side stage.
    #[must_use]
    pub fn for_side(stage: Stage, side: Side, status: StageStatus, detail: impl Into<String>) -> Self {
        Self {
            side: Some(side),
            ..Self::new(stage, status, detail)
        }
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "{} ({side}): {}", self.stage, self.status)?,
            None => write!(f, "{}: {}", self.stage, self.status)?,
        }
        if !self.detail.is_empty() {
            write!(f, " - {}", self.detail)?;
        }
        Ok(())
    }
}

/// Reports of every stage run so far, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Stage reports.
    pub stages: Vec<StageReport>,
}

impl PipelineReport {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage report.
    pub fn record(&mut self, report: StageReport) {
        self.stages.push(report);
    }

    /// Drops the reports of `stage` and every later stage.
    pub fn discard_from(&mut self, stage: Stage) {
        self.stages.retain(|r| r.stage < stage);
    }

    /// Reports of `stage`.
    pub fn reports_for(&self, stage: Stage) -> impl Iterator<Item = &StageReport> {
        self.stages.iter().filter(move |r| r.stage == stage)
    }

    /// Worst status recorded for `stage`, if it ran.
    #[must_use]
    pub fn status(&self, stage: Stage) -> Option<StageStatus> {
        self.reports_for(stage).map(|r| r.status).max()
    }

    /// True if every stage has run.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        Stage::ALL.iter().all(|&s| self.status(s).is_some())
    }

    /// True if any stage reported something other than [`StageStatus::Completed`].
    #[must_use]
    pub fn has_issues(&self) -> bool {
        self.stages.iter().any(|r| r.status != StageStatus::Completed)
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Body scan pipeline:")?;
        for report in &self.stages {
            writeln!(f, "  {report}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_order() {
        assert!(Stage::SelectFront < Stage::Atlas);
        assert_eq!(Stage::Segment.prerequisite(), Some(Stage::Reconstruct));
        assert_eq!(Stage::SelectFront.prerequisite(), None);
    }

    #[test]
    fn test_worst_status_wins() {
        let mut report = PipelineReport::new();
        report.record(StageReport::for_side(
            Stage::Reconstruct,
            Side::Front,
            StageStatus::Completed,
            "",
        ));
        report.record(StageReport::for_side(
            Stage::Reconstruct,
            Side::Back,
            StageStatus::Degraded,
            "no vertices",
        ));
        assert_eq!(report.status(Stage::Reconstruct), Some(StageStatus::Degraded));
        assert_eq!(report.status(Stage::Stitch), None);
        assert!(report.has_issues());
        assert!(!report.is_complete());
    }

    #[test]
    fn test_discard_from() {
        let mut report = PipelineReport::new();
        for stage in Stage::ALL {
            report.record(StageReport::new(stage, StageStatus::Completed, ""));
        }
        assert!(report.is_complete());
        report.discard_from(Stage::Segment);
        assert_eq!(report.stages.len(), 3);
        assert_eq!(report.status(Stage::Segment), None);
    }

    #[test]
    fn test_display() {
        let line = StageReport::for_side(Stage::Reconstruct, Side::Back, StageStatus::Degraded, "no vertices");
        assert_eq!(line.to_string(), "reconstruction (back): degraded - no vertices");
        let line = StageReport::new(Stage::Stitch, StageStatus::Completed, "");
        assert_eq!(line.to_string(), "stitching: completed");
    }
}
