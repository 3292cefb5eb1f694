//! Position + rotation pairs and parent/child composition.

use crate::{Transform3D, TransformError, TransformResult};
use nalgebra::{Point3, UnitQuaternion, Vector3};

/// A rigid placement: rotate about the local origin, then move to `position`.
///
/// Group containers, joints and bones are all described by a `Pose`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Translation of the local origin.
    pub position: Point3<f64>,
    /// Orientation of the local axes.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Create a pose.
    #[must_use]
    pub const fn new(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Pose at the origin with no rotation.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }

    /// Pose with translation only.
    #[must_use]
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, UnitQuaternion::identity())
    }

    /// Local-to-parent transform.
    #[must_use]
    pub fn to_transform(&self) -> Transform3D {
        Transform3D::from_rotation(&self.rotation)
            .then(&Transform3D::from_translation(self.position.coords))
    }

    /// Map a local point into the parent frame.
    #[must_use]
    pub fn transform_point(&self, local: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * local.coords
    }

    /// Map a parent-frame point into this pose's local frame.
    #[must_use]
    pub fn inverse_transform_point(&self, parent: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (parent - self.position))
    }

    /// Pose of `child` (expressed in this pose's frame) in the parent frame.
    #[must_use]
    pub fn compose(&self, child: &Self) -> Self {
        Self {
            position: self.transform_point(&child.position),
            rotation: self.rotation * child.rotation,
        }
    }
}

/// Compose a root-first chain of poses into a single local-to-world transform.
///
/// `chain[0]` is the outermost parent; the last entry is the innermost child.
///
/// # Errors
///
/// Returns [`TransformError::EmptyChain`] if `chain` is empty.
pub fn compose_chain(chain: &[Pose]) -> TransformResult<Transform3D> {
    let (root, rest) = chain.split_first().ok_or(TransformError::EmptyChain)?;
    let world = rest.iter().fold(*root, |acc, child| acc.compose(child));
    Ok(world.to_transform())
}

/// Rotation that pitches about X by `pitch`, then yaws about Y by `yaw` (radians).
///
/// Equivalent to a Y·X·Z Euler rotation with zero roll.
#[must_use]
pub fn rotation_from_yaw_pitch(yaw: f64, pitch: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw)
        * UnitQuaternion::from_axis_angle(&Vector3::x_axis(), pitch)
}

/// Yaw (rotation about Y, radians) of a Y·X·Z Euler decomposition.
#[must_use]
pub fn yaw_of(rotation: &UnitQuaternion<f64>) -> f64 {
    let m = rotation.to_rotation_matrix();
    m[(0, 2)].atan2(m[(2, 2)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn inverse_transform_round_trips() {
        let pose = Pose::new(
            Point3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        );
        let local = Point3::new(0.3, -0.2, 0.5);
        let back = pose.inverse_transform_point(&pose.transform_point(&local));

        assert_relative_eq!(back.x, local.x, epsilon = 1e-10);
        assert_relative_eq!(back.y, local.y, epsilon = 1e-10);
        assert_relative_eq!(back.z, local.z, epsilon = 1e-10);
    }

    #[test]
    fn to_transform_matches_transform_point() {
        let pose = Pose::new(
            Point3::new(-1.0, 0.5, 2.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), FRAC_PI_4),
        );
        let p = Point3::new(1.0, 1.0, 1.0);
        let a = pose.transform_point(&p);
        let b = pose.to_transform().transform_point(&p);

        assert_relative_eq!(a.x, b.x, epsilon = 1e-10);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-10);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-10);
    }

    #[test]
    fn chain_applies_parent_rotation_to_child_offset() {
        let parent = Pose::new(
            Point3::new(0.0, 1.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), PI),
        );
        let child = Pose::at(Point3::new(1.0, 0.0, 0.0));

        let world = compose_chain(&[parent, child]).unwrap();
        let p = world.transform_point(&Point3::origin());

        assert_relative_eq!(p.x, -1.0, epsilon = 1e-10);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn empty_chain_is_an_error() {
        assert!(matches!(compose_chain(&[]), Err(TransformError::EmptyChain)));
    }

    #[test]
    fn yaw_of_recovers_yaw() {
        let q = rotation_from_yaw_pitch(0.7, 0.3);
        assert_relative_eq!(yaw_of(&q), 0.7, epsilon = 1e-10);
    }
}
