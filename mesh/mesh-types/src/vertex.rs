//! Vertex type.

use nalgebra::{Point2, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scanned surface point with its texture coordinate.
///
/// Every vertex produced by the depth camera carries a UV into the colour
/// raster of the same capture. The normal is optional and is filled in by
/// [`IndexedMesh::compute_normals`](crate::IndexedMesh::compute_normals).
///
/// # Example
///
/// ```
/// use mesh_types::{Point2, Point3, Vertex};
///
/// let v = Vertex::new(Point3::new(1.0, 2.0, 3.0), Point2::new(0.25, 0.75));
/// assert_eq!(v.position.x, 1.0);
/// assert_eq!(v.uv.y, 0.75);
/// assert!(v.normal.is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Texture coordinate into the owning scan's colour raster.
    pub uv: Point2<f64>,

    /// Unit normal, if computed.
    pub normal: Option<Vector3<f64>>,
}

impl Vertex {
    /// Create a vertex with position and texture coordinate.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>, uv: Point2<f64>) -> Self {
        Self {
            position,
            uv,
            normal: None,
        }
    }

    /// Create a vertex from raw coordinates with a zero texture coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let v = Vertex::from_coords(1.0, 2.0, 3.0);
    /// assert_eq!(v.position.z, 3.0);
    /// assert_eq!(v.uv.x, 0.0);
    /// ```
    #[inline]
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z), Point2::origin())
    }
}
