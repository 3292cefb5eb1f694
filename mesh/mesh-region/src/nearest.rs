//! Nearest point-of-interest assignment.

use mesh_types::Point3;
use rayon::prelude::*;

use crate::skeleton::{Poi, Skeleton};

/// Index and distance of the first minimum in `points` relative to `p`.
fn first_nearest<'a>(
    p: &Point3<f64>,
    points: impl Iterator<Item = &'a Point3<f64>>,
) -> Option<(usize, f64)> {
    points
        .map(|q| nalgebra::distance(p, q))
        .enumerate()
        .fold(None, |best, (i, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })
}

/// The POI nearest to `point`.
///
/// The closest joint and the closest bone are found separately, each taking
/// the first minimum on ties. The bone is chosen only when it is strictly
/// closer than the joint.
#[must_use]
pub fn nearest_poi(point: &Point3<f64>, skeleton: &Skeleton) -> Poi {
    let joint = first_nearest(point, skeleton.joints().iter().map(|p| &p.position));
    let bone = first_nearest(point, skeleton.bones().iter().map(|p| &p.position));

    match (joint, bone) {
        (Some((_, jd)), Some((bi, bd))) if bd < jd => Poi::bone(bi),
        (Some((ji, _)), _) => Poi::new(ji).ok(),
        (None, Some((bi, _))) => Poi::bone(bi),
        (None, None) => None,
    }
    .unwrap_or_else(|| Poi::from_raw(0))
}

/// Assigns every point to its nearest POI.
///
/// With `parallel` set the work is spread across the rayon pool; the result
/// is identical either way.
#[must_use]
pub fn assign_nearest_pois(points: &[Point3<f64>], skeleton: &Skeleton, parallel: bool) -> Vec<Poi> {
    if parallel {
        points.par_iter().map(|p| nearest_poi(p, skeleton)).collect()
    } else {
        points.iter().map(|p| nearest_poi(p, skeleton)).collect()
    }
}

/// Distance from `point` to every POI, joints first.
#[must_use]
pub fn poi_distances(point: &Point3<f64>, skeleton: &Skeleton) -> Vec<f64> {
    skeleton
        .poi_positions()
        .iter()
        .map(|q| nalgebra::distance(point, q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skeleton::Joint;

    #[test]
    fn test_point_on_joint() {
        let skeleton = Skeleton::reference();
        let head = skeleton.joint(Joint::Head).position;
        assert_eq!(nearest_poi(&head, &skeleton), Poi::joint(Joint::Head));
    }

    #[test]
    fn test_point_on_bone_midpoint() {
        let skeleton = Skeleton::reference();
        let forearm = skeleton.bones()[5].position;
        assert_eq!(nearest_poi(&forearm, &skeleton), Poi::bone(5).unwrap());
    }

    #[test]
    fn test_joint_wins_tie_with_bone() {
        let mut positions: Vec<_> = Skeleton::reference().joints().iter().map(|p| p.position).collect();
        // Move every joint far away except two whose bone midpoint we probe
        for (i, p) in positions.iter_mut().enumerate() {
            *p = Point3::new(100.0 + i as f64, 0.0, 1.0);
        }
        positions[Joint::SpineBase.index()] = Point3::new(0.0, 0.0, 1.0);
        positions[Joint::SpineMid.index()] = Point3::new(0.0, 2.0, 1.0);
        let skeleton = Skeleton::from_joint_positions(&positions).unwrap();

        // Equidistant (1.0) from SpineBase and from the SpineMid->SpineBase bone midpoint
        let probe = Point3::new(0.0, 0.0, 1.0) + nalgebra::Vector3::new(0.0, 0.5, 0.866_025_403_784_438_6);
        let d_joint = nalgebra::distance(&probe, &positions[0]);
        let d_bone = nalgebra::distance(&probe, &skeleton.bones()[0].position);
        assert!((d_joint - d_bone).abs() < 1e-12);
        assert_eq!(nearest_poi(&probe, &skeleton), Poi::joint(Joint::SpineBase));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let skeleton = Skeleton::reference();
        let points: Vec<_> = (0..200)
            .map(|i| {
                let t = f64::from(i) / 200.0;
                Point3::new(t * 2.0 - 1.0, t * 1.8 - 1.0, 2.0)
            })
            .collect();
        assert_eq!(
            assign_nearest_pois(&points, &skeleton, true),
            assign_nearest_pois(&points, &skeleton, false)
        );
    }

    #[test]
    fn test_poi_distances_len() {
        let skeleton = Skeleton::reference();
        assert_eq!(poi_distances(&Point3::origin(), &skeleton).len(), 49);
    }
}
