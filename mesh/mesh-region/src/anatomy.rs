//! Fixed anatomical lookup tables.
//!
//! Every POI belongs to exactly one of 21 [`AnatomicalGroup`]s, and every
//! group belongs to one of 5 [`TextureRegion`]s used for atlas packing.

use crate::skeleton::{JOINT_COUNT, POI_COUNT, Poi};

/// POI index -> group index.
const POI_GROUPS: [u8; POI_COUNT] = [
    0, 12, 1, 1, 2, 3, 4, 4, 5, 6, 7, 7, 0, 8, 9, 9, 0, 10, 11, 11, 12, 4, 4, 7, 7, // joints
    0, 12, 1, 12, 13, 14, 4, 12, 15, 16, 7, 0, 17, 18, 9, 0, 19, 20, 11, 12, 4, 4, 7, 7, // bones
];

/// Group index -> the POI whose position anchors the group.
const GROUP_POIS: [u8; AnatomicalGroup::COUNT] = [
    25, 27, 4, 5, 31, 8, 9, 35, 13, 39, 17, 43, 44, 29, 30, 33, 34, 37, 38, 41, 42,
];

/// Group index -> texture region index.
const GROUP_REGIONS: [u8; AnatomicalGroup::COUNT] =
    [0, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4, 4, 0, 2, 2, 3, 3, 4, 4, 4, 4];

const JOINT_VERTICAL: [bool; JOINT_COUNT] = [
    true, true, true, true, false, false, false, false, false, false, false, false, true, true,
    true, true, true, true, true, true, true, false, false, false, false,
];

const BONE_VERTICAL: [bool; POI_COUNT - JOINT_COUNT] = [
    true, true, true, false, false, false, false, false, false, false, false, true, true, true,
    true, true, true, true, true, true, false, false, false, false,
];

/// True if the body part around `poi` is oriented vertically when standing.
#[must_use]
pub fn poi_is_vertical(poi: Poi) -> bool {
    match poi.as_bone() {
        Some(bone) => BONE_VERTICAL[bone],
        None => JOINT_VERTICAL[poi.index()],
    }
}

/// One of 21 body parts a scan is split into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum AnatomicalGroup {
    LowerTorso,
    Head,
    LeftShoulder,
    LeftElbow,
    LeftHand,
    RightShoulder,
    RightElbow,
    RightHand,
    LeftKnee,
    LeftFoot,
    RightKnee,
    RightFoot,
    UpperTorso,
    LeftShoulderToElbow,
    LeftElbowToHand,
    RightShoulderToElbow,
    RightElbowToHand,
    LeftHipToKnee,
    LeftKneeToAnkle,
    RightHipToKnee,
    RightKneeToAnkle,
}

impl AnatomicalGroup {
    /// Number of groups.
    pub const COUNT: usize = 21;

    /// Every group, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::LowerTorso,
        Self::Head,
        Self::LeftShoulder,
        Self::LeftElbow,
        Self::LeftHand,
        Self::RightShoulder,
        Self::RightElbow,
        Self::RightHand,
        Self::LeftKnee,
        Self::LeftFoot,
        Self::RightKnee,
        Self::RightFoot,
        Self::UpperTorso,
        Self::LeftShoulderToElbow,
        Self::LeftElbowToHand,
        Self::RightShoulderToElbow,
        Self::RightElbowToHand,
        Self::LeftHipToKnee,
        Self::LeftKneeToAnkle,
        Self::RightHipToKnee,
        Self::RightKneeToAnkle,
    ];

    /// Position in [`AnatomicalGroup::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Group from its index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The group a POI belongs to.
    #[must_use]
    pub fn of_poi(poi: Poi) -> Self {
        Self::ALL[usize::from(POI_GROUPS[poi.index()])]
    }

    /// The POI whose position anchors this group.
    #[must_use]
    pub const fn anchor(self) -> Poi {
        Poi::from_raw(GROUP_POIS[self.index()])
    }

    /// Texture region this group is packed into.
    #[must_use]
    pub fn texture_region(self) -> TextureRegion {
        TextureRegion::ALL[usize::from(GROUP_REGIONS[self.index()])]
    }

    /// True if the group's seam runs vertically (sort seam vertices by Y).
    #[must_use]
    pub fn is_vertical(self) -> bool {
        poi_is_vertical(self.anchor())
    }

    /// Group name, e.g. `"LeftElbow"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LowerTorso => "LowerTorso",
            Self::Head => "Head",
            Self::LeftShoulder => "LeftShoulder",
            Self::LeftElbow => "LeftElbow",
            Self::LeftHand => "LeftHand",
            Self::RightShoulder => "RightShoulder",
            Self::RightElbow => "RightElbow",
            Self::RightHand => "RightHand",
            Self::LeftKnee => "LeftKnee",
            Self::LeftFoot => "LeftFoot",
            Self::RightKnee => "RightKnee",
            Self::RightFoot => "RightFoot",
            Self::UpperTorso => "UpperTorso",
            Self::LeftShoulderToElbow => "LeftShoulderToElbow",
            Self::LeftElbowToHand => "LeftElbowToHand",
            Self::RightShoulderToElbow => "RightShoulderToElbow",
            Self::RightElbowToHand => "RightElbowToHand",
            Self::LeftHipToKnee => "LeftHipToKnee",
            Self::LeftKneeToAnkle => "LeftKneeToAnkle",
            Self::RightHipToKnee => "RightHipToKnee",
            Self::RightKneeToAnkle => "RightKneeToAnkle",
        }
    }
}

/// Coarse texture atlas regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TextureRegion {
    /// Torso, hips and shoulders.
    MainBody,
    /// Head and neck.
    HeadAndNeck,
    /// Left arm and hand.
    LeftArm,
    /// Right arm and hand.
    RightArm,
    /// Both legs and feet.
    Legs,
}

impl TextureRegion {
    /// Number of regions.
    pub const COUNT: usize = 5;

    /// Every region, in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::MainBody,
        Self::HeadAndNeck,
        Self::LeftArm,
        Self::RightArm,
        Self::Legs,
    ];

    /// Position in [`TextureRegion::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Region from its index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Region name, e.g. `"MainBody"`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MainBody => "MainBody",
            Self::HeadAndNeck => "HeadAndNeck",
            Self::LeftArm => "LeftArm",
            Self::RightArm => "RightArm",
            Self::Legs => "Legs",
        }
    }

    /// POIs whose texture footprint defines this region's atlas bounds.
    ///
    /// Shoulder bones appear in both the main body and their arm.
    #[must_use]
    pub const fn pois(self) -> &'static [usize] {
        match self {
            Self::MainBody => &[0, 1, 12, 16, 20, 25, 26, 28, 36, 40, 44, 32],
            Self::HeadAndNeck => &[2, 3, 26, 27],
            Self::LeftArm => &[4, 5, 6, 7, 21, 22, 28, 29, 30, 31, 45, 46],
            Self::RightArm => &[8, 9, 10, 11, 23, 24, 32, 33, 34, 35, 47, 48],
            Self::Legs => &[12, 13, 14, 15, 16, 17, 18, 19, 37, 38, 40, 41, 42, 43],
        }
    }

    /// Groups packed into this region, in group order.
    pub fn groups(self) -> impl Iterator<Item = AnatomicalGroup> {
        AnatomicalGroup::ALL
            .into_iter()
            .filter(move |g| g.texture_region() == self)
    }

    /// Seam tag for a cut triangle whose corners lie in `regions`.
    ///
    /// A triangle inside one region keeps it. A torso/leg seam (exactly the
    /// main body and legs) is tagged as legs. Anything else falls back to the
    /// main body.
    #[must_use]
    pub fn seam_tag(regions: [Self; 3]) -> Self {
        let [a, b, c] = regions;
        if a == b && b == c {
            return a;
        }
        let torso_or_legs = regions
            .iter()
            .all(|&r| r == Self::MainBody || r == Self::Legs);
        if torso_or_legs && regions.contains(&Self::MainBody) && regions.contains(&Self::Legs) {
            Self::Legs
        } else {
            Self::MainBody
        }
    }
}
