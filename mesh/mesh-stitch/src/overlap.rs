//! Overlap removal between the front and back halves of a group.
//!
//! Both halves must be expressed relative to the same origin (the group's
//! anchor POI in the front skeleton). The split plane passes through that
//! origin, perpendicular to the axis along which the two halves' centroids
//! differ most.

use mesh_region::GroupSubmesh;
use mesh_transform::Transform3D;
use mesh_types::{IndexedMesh, Point3, Vector3};
use tracing::debug;

use crate::error::StitchResult;

/// Axis-aligned plane through the group origin separating two halves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitPlane {
    /// 0 = X, 1 = Y, 2 = Z.
    pub axis: usize,
    /// Sign of the centroid difference along `axis`; 0 if they coincide.
    pub sign: f64,
}

impl SplitPlane {
    /// Plane for `current` given the half it may overlap.
    ///
    /// Ties between axes go to the lowest axis index.
    #[must_use]
    pub fn from_centroids(current: &Point3<f64>, counter: &Point3<f64>) -> Self {
        let diff = current - counter;
        let mut axis = 0;
        for i in 1..3 {
            if diff[i].abs() > diff[axis].abs() {
                axis = i;
            }
        }
        Self {
            axis,
            sign: sign_of(diff[axis]),
        }
    }

    /// True if `point` lies on the counter half's side of the plane.
    #[must_use]
    pub fn is_overlap(&self, point: &Point3<f64>) -> bool {
        point[self.axis] * self.sign < 0.0
    }
}

/// Like `f64::signum` but 0 for zero.
fn sign_of(value: f64) -> f64 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Flags the vertices of `current` that cross into `counter`'s half.
///
/// An empty `counter` has its centroid at the origin.
#[must_use]
pub fn identify_overlap(current: &IndexedMesh, counter: &IndexedMesh) -> Vec<bool> {
    let plane = SplitPlane::from_centroids(&current.centroid(), &counter.centroid());
    current
        .vertices
        .iter()
        .map(|v| plane.is_overlap(&v.position))
        .collect()
}

/// Removes the part of `current` that overlaps `counter`.
///
/// Returns the number of vertices removed. All of `current`'s index tables
/// are rewritten together; vertices left bordering the removed region become
/// scanned edges.
///
/// # Errors
///
/// Propagates [`mesh_region::RegionError`] from the submesh compaction.
pub fn remove_overlap(current: &mut GroupSubmesh, counter: &GroupSubmesh) -> StitchResult<usize> {
    let flags = identify_overlap(&current.mesh, &counter.mesh);
    let remap = current.remove_vertices(&flags)?;
    current.mesh.compute_normals();
    let removed = remap.removed_count();
    debug!(
        group = current.group.name(),
        removed,
        kept = remap.kept_count(),
        "Overlap removed"
    );
    Ok(removed)
}

/// Moves a back-scan half into the front half's frame.
///
/// Vertices are turned by `turn` about the back origin, then re-anchored at
/// `front_origin`.
pub fn place_back(back: &mut GroupSubmesh, front_origin: Point3<f64>, turn: &Transform3D) {
    turn.apply_to_mesh(&mut back.mesh);
    back.origin = front_origin;
}

/// Shifts `back` so its centroid matches `front`'s, leaving `depth_gap`
/// between them along Z.
///
/// Returns the applied offset.
pub fn align_by_centroids(
    front: &GroupSubmesh,
    back: &mut GroupSubmesh,
    depth_gap: f64,
) -> Vector3<f64> {
    let mut offset = front.mesh.centroid() - back.mesh.centroid();
    offset.z += depth_gap;
    back.translate(offset);
    offset
}
