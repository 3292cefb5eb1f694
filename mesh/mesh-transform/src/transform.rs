//! 3D transformation matrix operations.

use mesh_types::IndexedMesh;
use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};

/// A 3D transformation represented as a 4x4 matrix.
///
/// Used to move group geometry between group-local, container-local and
/// world (front camera) space.
///
/// # Example
///
/// ```
/// use mesh_transform::Transform3D;
/// use mesh_types::Point3;
///
/// let turn = Transform3D::rotation_y(std::f64::consts::PI);
/// let lift = Transform3D::translation(0.0, 1.0, 0.0);
/// let combined = turn.then(&lift);
///
/// let p = combined.transform_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((p.x + 1.0).abs() < 1e-10);
/// assert!((p.y - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    /// The 4x4 transformation matrix in column-major order.
    matrix: Matrix4<f64>,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform3D {
    /// Create the identity transformation (no change).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Create a translation transformation.
    #[must_use]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vector3::new(tx, ty, tz)),
        }
    }

    /// Create a translation from a vector.
    #[must_use]
    pub fn from_translation(v: Vector3<f64>) -> Self {
        Self::translation(v.x, v.y, v.z)
    }

    /// Create a rotation from a unit quaternion.
    #[must_use]
    pub fn from_rotation(rotation: &UnitQuaternion<f64>) -> Self {
        Self {
            matrix: rotation.to_homogeneous(),
        }
    }

    /// Create a rotation around the Y (vertical) axis.
    ///
    /// # Arguments
    ///
    /// * `angle` - Rotation angle in radians
    #[must_use]
    pub fn rotation_y(angle: f64) -> Self {
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        #[rustfmt::skip]
        let matrix = Matrix4::new(
             cos_a, 0.0, sin_a, 0.0,
               0.0, 1.0,   0.0, 0.0,
            -sin_a, 0.0, cos_a, 0.0,
               0.0, 0.0,   0.0, 1.0,
        );
        Self { matrix }
    }

    /// Compose this transformation with another (self then other).
    ///
    /// The result applies `self` first, then `other`.
    #[must_use]
    pub fn then(&self, other: &Self) -> Self {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Transform a point (applies translation).
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    /// Transform a direction vector (ignores translation).
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.matrix.transform_vector(vector)
    }

    /// Apply this transformation to all vertex positions of a mesh in place.
    ///
    /// Normals are rotated with the upper 3×3 block and renormalized;
    /// texture coordinates are untouched.
    pub fn apply_to_mesh(&self, mesh: &mut IndexedMesh) {
        for vertex in &mut mesh.vertices {
            vertex.position = self.transform_point(&vertex.position);
            if let Some(n) = vertex.normal {
                vertex.normal = self.transform_vector(&n).try_normalize(f64::EPSILON);
            }
        }
    }
}
