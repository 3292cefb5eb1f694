//! Explicit transform composition for placing scan geometry.
//!
//! Scan groups are positioned by plain transform values instead of a live
//! scene graph:
//! - [`Transform3D`] - 4×4 affine transform with composition
//! - [`Pose`] - position + rotation, the value stored per group container
//! - [`compose_chain`] - root-first parent/child composition to local-to-world
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with zero engine dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_transform::{Pose, Transform3D, compose_chain};
//! use mesh_types::Point3;
//! use nalgebra::UnitQuaternion;
//!
//! let container = Pose::new(Point3::new(0.0, 1.0, 0.0), UnitQuaternion::identity());
//! let child = Pose::new(Point3::new(1.0, 0.0, 0.0), UnitQuaternion::identity());
//!
//! let world = compose_chain(&[container, child]).unwrap();
//! let p = world.transform_point(&Point3::origin());
//! assert_eq!(p, Point3::new(1.0, 1.0, 0.0));
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod pose;
mod transform;

pub use error::{TransformError, TransformResult};
pub use pose::{Pose, compose_chain, rotation_from_yaw_pitch, yaw_of};
pub use transform::Transform3D;
