//! Tracked body skeletons: 25 joints, 24 derived bones, 49 points of interest.
//!
//! Bones are never tracked directly. Each bone sits halfway between a fixed
//! pair of joints, is scaled to half the pair's distance along its local Y
//! axis, and is oriented so that local Y points from the second joint
//! towards the first.

use mesh_transform::{Pose, rotation_from_yaw_pitch, yaw_of};
use mesh_types::{Point3, Vector3};

use crate::error::{RegionError, RegionResult};

/// Number of tracked joints.
pub const JOINT_COUNT: usize = 25;

/// Number of derived bones.
pub const BONE_COUNT: usize = 24;

/// Number of points of interest (joints then bones).
pub const POI_COUNT: usize = JOINT_COUNT + BONE_COUNT;

/// Radius-like thickness applied to the X and Z scale of every bone.
pub const BONE_THICKNESS: f64 = 0.0125;

/// Joint pair `(a, b)` per bone; the bone points from `b` to `a`.
pub const BONE_JOINTS: [(usize, usize); BONE_COUNT] = [
    (1, 0),
    (2, 20),
    (3, 2),
    (4, 20),
    (5, 4),
    (6, 5),
    (7, 6),
    (8, 20),
    (9, 8),
    (10, 9),
    (11, 10),
    (12, 0),
    (13, 12),
    (14, 13),
    (15, 14),
    (16, 0),
    (17, 16),
    (18, 17),
    (19, 18),
    (20, 1),
    (21, 7),
    (22, 7),
    (23, 11),
    (24, 11),
];

/// Joint order after swapping left and right for a back scan.
pub const REVERSE_JOINT_ORDER: [usize; JOINT_COUNT] = [
    0, 1, 2, 3, 8, 9, 10, 11, 4, 5, 6, 7, 16, 17, 18, 19, 12, 13, 14, 15, 20, 23, 24, 21, 22,
];

/// Joints on the body's midline, spine base first.
const CENTRE_JOINTS: [usize; 5] = [0, 1, 20, 2, 3];

/// Head and neck joints carry no usable yaw, so spinal bones borrow it.
const fn spinal_yaw_joint(bone: usize) -> Option<usize> {
    match bone {
        0 => Some(0),
        1 => Some(20),
        2 => Some(2),
        19 => Some(1),
        _ => None,
    }
}

/// Tracked joints, in sensor order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Joint {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl Joint {
    /// Every joint, in index order.
    pub const ALL: [Self; JOINT_COUNT] = [
        Self::SpineBase,
        Self::SpineMid,
        Self::Neck,
        Self::Head,
        Self::ShoulderLeft,
        Self::ElbowLeft,
        Self::WristLeft,
        Self::HandLeft,
        Self::ShoulderRight,
        Self::ElbowRight,
        Self::WristRight,
        Self::HandRight,
        Self::HipLeft,
        Self::KneeLeft,
        Self::AnkleLeft,
        Self::FootLeft,
        Self::HipRight,
        Self::KneeRight,
        Self::AnkleRight,
        Self::FootRight,
        Self::SpineShoulder,
        Self::HandTipLeft,
        Self::ThumbLeft,
        Self::HandTipRight,
        Self::ThumbRight,
    ];

    /// Position in [`Joint::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Joint from its index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Joint name, e.g. `"ShoulderLeft"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpineBase => "SpineBase",
            Self::SpineMid => "SpineMid",
            Self::Neck => "Neck",
            Self::Head => "Head",
            Self::ShoulderLeft => "ShoulderLeft",
            Self::ElbowLeft => "ElbowLeft",
            Self::WristLeft => "WristLeft",
            Self::HandLeft => "HandLeft",
            Self::ShoulderRight => "ShoulderRight",
            Self::ElbowRight => "ElbowRight",
            Self::WristRight => "WristRight",
            Self::HandRight => "HandRight",
            Self::HipLeft => "HipLeft",
            Self::KneeLeft => "KneeLeft",
            Self::AnkleLeft => "AnkleLeft",
            Self::FootLeft => "FootLeft",
            Self::HipRight => "HipRight",
            Self::KneeRight => "KneeRight",
            Self::AnkleRight => "AnkleRight",
            Self::FootRight => "FootRight",
            Self::SpineShoulder => "SpineShoulder",
            Self::HandTipLeft => "HandTipLeft",
            Self::ThumbLeft => "ThumbLeft",
            Self::HandTipRight => "HandTipRight",
            Self::ThumbRight => "ThumbRight",
        }
    }
}

/// Name of bone `index`, e.g. `"SpineMidToSpineBase"`.
#[must_use]
pub fn bone_name(index: usize) -> Option<String> {
    let &(a, b) = BONE_JOINTS.get(index)?;
    Some(format!("{}To{}", Joint::ALL[a].name(), Joint::ALL[b].name()))
}

/// A point of interest: a joint (`0..25`) or a bone (`25..49`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Poi(u8);

impl Poi {
    /// POI from a flat index.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::InvalidPoi`] for `index >= 49`.
    pub fn new(index: usize) -> RegionResult<Self> {
        u8::try_from(index)
            .ok()
            .filter(|&i| usize::from(i) < POI_COUNT)
            .map(Self)
            .ok_or(RegionError::InvalidPoi { index })
    }

    /// Caller guarantees `raw < 49`.
    pub(crate) const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// POI of a joint.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn joint(joint: Joint) -> Self {
        Self(joint as u8)
    }

    /// POI of bone `index`, if `index < 24`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn bone(index: usize) -> Option<Self> {
        if index < BONE_COUNT {
            Some(Self((JOINT_COUNT + index) as u8))
        } else {
            None
        }
    }

    /// Flat index `0..49`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The joint, if this POI is one.
    #[must_use]
    pub fn as_joint(self) -> Option<Joint> {
        Joint::from_index(self.index())
    }

    /// Bone index `0..24`, if this POI is a bone.
    #[must_use]
    pub const fn as_bone(self) -> Option<usize> {
        self.index().checked_sub(JOINT_COUNT)
    }

    /// Iterator over all 49 POIs.
    #[allow(clippy::cast_possible_truncation)]
    pub fn all() -> impl Iterator<Item = Self> {
        (0..POI_COUNT).map(|i| Self(i as u8))
    }
}

/// Offsets captured from a front skeleton, used to rebuild a back skeleton.
///
/// Every offset is mirrored in X and Z so that it can be applied directly to
/// a skeleton seen from behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseOffsets {
    /// Hip average to spine base.
    pub hip_to_spine_base: Vector3<f64>,
    /// Spine base to spine mid, spine shoulder, neck and head.
    pub spine: [Vector3<f64>; 4],
    /// Left ankle to left foot.
    pub left_foot: Vector3<f64>,
    /// Right ankle to right foot.
    pub right_foot: Vector3<f64>,
}

fn mirror_xz(v: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(-v.x, v.y, -v.z)
}

/// A posed skeleton with derived bones.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    joints: [Pose; JOINT_COUNT],
    bones: [Pose; BONE_COUNT],
    bone_scales: [Vector3<f64>; BONE_COUNT],
}

impl Skeleton {
    /// Build a skeleton from 25 joint poses and derive its bones.
    ///
    /// Joints reported behind the camera (negative depth) are clamped to a
    /// depth of 1 meter.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::JointCount`] unless exactly 25 joints are given.
    pub fn from_joints(joints: &[Pose]) -> RegionResult<Self> {
        let mut poses: [Pose; JOINT_COUNT] =
            joints.try_into().map_err(|_| RegionError::JointCount {
                expected: JOINT_COUNT,
                actual: joints.len(),
            })?;
        for pose in &mut poses {
            if pose.position.z < 0.0 {
                pose.position.z = 1.0;
            }
        }
        let mut skeleton = Self {
            joints: poses,
            bones: [Pose::identity(); BONE_COUNT],
            bone_scales: [Vector3::zeros(); BONE_COUNT],
        };
        skeleton.derive_bones();
        Ok(skeleton)
    }

    /// Build a skeleton from joint positions with identity rotations.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::JointCount`] unless exactly 25 positions are given.
    pub fn from_joint_positions(positions: &[Point3<f64>]) -> RegionResult<Self> {
        let poses: Vec<Pose> = positions.iter().map(|&p| Pose::at(p)).collect();
        Self::from_joints(&poses)
    }

    /// A standing reference pose two meters from the camera, arms spread.
    ///
    /// Used when the tracker reports no body for a capture.
    #[must_use]
    pub fn reference() -> Self {
        const POSITIONS: [[f64; 3]; JOINT_COUNT] = [
            [0.0, 0.0, 2.0],
            [0.0, 0.3, 2.0],
            [0.0, 0.6, 2.0],
            [0.0, 0.75, 2.0],
            [-0.18, 0.52, 2.0],
            [-0.45, 0.52, 2.0],
            [-0.7, 0.52, 2.0],
            [-0.78, 0.52, 2.0],
            [0.18, 0.52, 2.0],
            [0.45, 0.52, 2.0],
            [0.7, 0.52, 2.0],
            [0.78, 0.52, 2.0],
            [-0.1, -0.05, 2.0],
            [-0.1, -0.5, 2.0],
            [-0.1, -0.9, 2.0],
            [-0.1, -0.95, 1.9],
            [0.1, -0.05, 2.0],
            [0.1, -0.5, 2.0],
            [0.1, -0.9, 2.0],
            [0.1, -0.95, 1.9],
            [0.0, 0.52, 2.0],
            [-0.86, 0.52, 2.0],
            [-0.8, 0.56, 2.0],
            [0.86, 0.52, 2.0],
            [0.8, 0.56, 2.0],
        ];
        let mut skeleton = Self {
            joints: POSITIONS.map(|[x, y, z]| Pose::at(Point3::new(x, y, z))),
            bones: [Pose::identity(); BONE_COUNT],
            bone_scales: [Vector3::zeros(); BONE_COUNT],
        };
        skeleton.derive_bones();
        skeleton
    }

    fn derive_bones(&mut self) {
        for (i, &(a, b)) in BONE_JOINTS.iter().enumerate() {
            let joint_a = self.joints[a].position;
            let joint_b = self.joints[b].position;
            let diff = joint_a - joint_b;

            let pitch = diff.x.hypot(diff.z).atan2(diff.y);
            let yaw = spinal_yaw_joint(i)
                .map_or_else(|| diff.x.atan2(diff.z), |j| yaw_of(&self.joints[j].rotation));

            self.bones[i] = Pose::new(joint_b + diff / 2.0, rotation_from_yaw_pitch(yaw, pitch));
            self.bone_scales[i] = Vector3::new(BONE_THICKNESS, diff.norm() / 2.0, BONE_THICKNESS);
        }
    }

    /// Pose of a joint.
    #[must_use]
    pub const fn joint(&self, joint: Joint) -> &Pose {
        &self.joints[joint as usize]
    }

    /// All joint poses.
    #[must_use]
    pub const fn joints(&self) -> &[Pose; JOINT_COUNT] {
        &self.joints
    }

    /// All bone poses.
    #[must_use]
    pub const fn bones(&self) -> &[Pose; BONE_COUNT] {
        &self.bones
    }

    /// All bone scales.
    #[must_use]
    pub const fn bone_scales(&self) -> &[Vector3<f64>; BONE_COUNT] {
        &self.bone_scales
    }

    /// Pose of any POI.
    #[must_use]
    pub fn poi_pose(&self, poi: Poi) -> &Pose {
        match poi.as_bone() {
            Some(bone) => &self.bones[bone],
            None => &self.joints[poi.index()],
        }
    }

    /// Position of any POI.
    #[must_use]
    pub fn poi_position(&self, poi: Poi) -> Point3<f64> {
        self.poi_pose(poi).position
    }

    /// Positions of all 49 POIs, joints first.
    #[must_use]
    pub fn poi_positions(&self) -> Vec<Point3<f64>> {
        self.joints
            .iter()
            .chain(&self.bones)
            .map(|p| p.position)
            .collect()
    }

    fn hip_average(&self) -> Point3<f64> {
        let left = self.joints[Joint::HipLeft.index()].position;
        let right = self.joints[Joint::HipRight.index()].position;
        nalgebra::center(&left, &right)
    }

    /// Offsets of this (front) skeleton, mirrored for use on a back scan.
    #[must_use]
    pub fn reverse_offsets(&self) -> ReverseOffsets {
        let j = |i: usize| self.joints[i].position;
        let base = j(0);
        ReverseOffsets {
            hip_to_spine_base: mirror_xz(base - self.hip_average()),
            spine: [1, 2, 3, 4].map(|k| mirror_xz(j(CENTRE_JOINTS[k]) - base)),
            left_foot: mirror_xz(j(15) - j(14)),
            right_foot: mirror_xz(j(19) - j(18)),
        }
    }

    /// Rebuild this skeleton as seen from behind.
    ///
    /// The sensor tracks a back-facing body poorly along the spine and at the
    /// feet, so those joints are replaced with offsets taken from the front
    /// skeleton. Left and right joint positions are then swapped and the
    /// bones re-derived. Joint rotations keep their sensor order.
    #[must_use]
    pub fn reversed(&self, offsets: &ReverseOffsets) -> Self {
        let mut positions: [Point3<f64>; JOINT_COUNT] = self.joints.map(|p| p.position);

        let base = self.hip_average() + offsets.hip_to_spine_base;
        positions[CENTRE_JOINTS[0]] = base;
        for (k, offset) in offsets.spine.iter().enumerate() {
            positions[CENTRE_JOINTS[k + 1]] = base + offset;
        }
        positions[15] = positions[14] + offsets.left_foot;
        positions[19] = positions[18] + offsets.right_foot;

        let mut joints = self.joints;
        for (joint, &source) in joints.iter_mut().zip(&REVERSE_JOINT_ORDER) {
            joint.position = positions[source];
        }

        let mut reversed = Self {
            joints,
            bones: self.bones,
            bone_scales: self.bone_scales,
        };
        reversed.derive_bones();
        reversed
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_joint_and_bone_names() {
        assert_eq!(Joint::ALL[20].name(), "SpineShoulder");
        assert_eq!(Joint::from_index(7), Some(Joint::HandLeft));
        assert_eq!(bone_name(0).as_deref(), Some("SpineMidToSpineBase"));
        assert_eq!(bone_name(19).as_deref(), Some("SpineShoulderToSpineMid"));
        assert_eq!(bone_name(22).as_deref(), Some("HandTipRightToHandRight"));
        assert_eq!(bone_name(24), None);
    }

    #[test]
    fn test_poi_indexing() {
        assert!(Poi::new(48).is_ok());
        assert_eq!(Poi::new(49), Err(RegionError::InvalidPoi { index: 49 }));
        assert_eq!(Poi::joint(Joint::Head).index(), 3);
        assert_eq!(Poi::bone(0).map(Poi::index), Some(25));
        assert_eq!(Poi::bone(3).and_then(Poi::as_bone), Some(3));
        assert_eq!(Poi::joint(Joint::Head).as_bone(), None);
        assert_eq!(Poi::all().count(), POI_COUNT);
    }

    #[test]
    fn test_wrong_joint_count() {
        let err = Skeleton::from_joint_positions(&[Point3::origin(); 3]).unwrap_err();
        assert_eq!(
            err,
            RegionError::JointCount {
                expected: 25,
                actual: 3
            }
        );
    }

    #[test]
    fn test_negative_depth_clamped() {
        let mut positions = Skeleton::reference().poi_positions();
        positions.truncate(JOINT_COUNT);
        positions[5].z = -0.3;
        let skeleton = Skeleton::from_joint_positions(&positions).unwrap();
        assert_relative_eq!(skeleton.joint(Joint::ElbowLeft).position.z, 1.0);
    }

    #[test]
    fn test_bone_midpoint_and_scale() {
        let skeleton = Skeleton::reference();
        // Bone 12: KneeLeft -> HipLeft
        let bone = skeleton.bones()[12];
        assert_relative_eq!(bone.position, Point3::new(-0.1, -0.275, 2.0), epsilon = 1e-12);
        assert_relative_eq!(skeleton.bone_scales()[12].y, 0.225, epsilon = 1e-12);
        assert_relative_eq!(skeleton.bone_scales()[12].x, BONE_THICKNESS);
    }

    #[test]
    fn test_bone_axis_points_along_joint_pair() {
        let skeleton = Skeleton::reference();
        for (i, &(a, b)) in BONE_JOINTS.iter().enumerate() {
            if spinal_yaw_joint(i).is_some() {
                continue;
            }
            let diff = skeleton.joints()[a].position - skeleton.joints()[b].position;
            let axis = skeleton.bones()[i].rotation * Vector3::y();
            assert_relative_eq!(axis, diff.normalize(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_reverse_swaps_left_and_right() {
        let front = Skeleton::reference();
        let offsets = front.reverse_offsets();
        let back = front.reversed(&offsets);

        let left_elbow = back.joint(Joint::ElbowLeft).position;
        assert_relative_eq!(left_elbow, front.joint(Joint::ElbowRight).position);
        let left_thumb = back.joint(Joint::ThumbLeft).position;
        assert_relative_eq!(left_thumb, front.joint(Joint::ThumbRight).position);
    }

    #[test]
    fn test_reverse_offsets_mirror_depth() {
        let front = Skeleton::reference();
        let offsets = front.reverse_offsets();
        // Foot sits 5cm below and 10cm in front of the ankle
        assert_relative_eq!(offsets.left_foot, Vector3::new(0.0, -0.05, 0.1), epsilon = 1e-12);

        let back = front.reversed(&offsets);
        let foot = back.joint(Joint::FootRight).position;
        let ankle = back.joint(Joint::AnkleRight).position;
        assert_relative_eq!(foot - ankle, Vector3::new(0.0, -0.05, 0.1), epsilon = 1e-12);
    }

    #[test]
    fn test_reverse_rebuilds_spine_from_hips() {
        let front = Skeleton::reference();
        let back = front.reversed(&front.reverse_offsets());
        // Reference hips are centred under the spine, so the spine stays put
        assert_relative_eq!(
            back.joint(Joint::Head).position,
            front.joint(Joint::Head).position,
            epsilon = 1e-12
        );
        assert_eq!(back.poi_positions().len(), POI_COUNT);
    }
}
