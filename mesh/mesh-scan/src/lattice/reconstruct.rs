//! Marching-squares triangulation of a masked depth lattice.

use mesh_types::{IndexedMesh, Vertex};
use tracing::debug;

use super::DepthLattice;
use crate::error::{ScanError, ScanResult};
use crate::mask::RasterMask;

/// A triangle mesh built from a depth lattice, with lattice lookups.
#[derive(Debug, Clone)]
pub struct LatticeMesh {
    /// The reconstructed surface.
    pub mesh: IndexedMesh,
    /// Vertex index per lattice cell (`None` for masked cells), row-major.
    pub lattice_to_vertex: Vec<Option<u32>>,
    /// Lattice cell (flat index) per vertex.
    pub vertex_to_lattice: Vec<usize>,
    /// The mask the mesh was built from.
    pub mask: RasterMask,
}

impl LatticeMesh {
    /// Lattice width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.mask.width()
    }

    /// Lattice height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.mask.height()
    }

    /// Vertex emitted for lattice cell `(x, y)`, if any.
    #[must_use]
    pub fn vertex_at(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width() && y < self.height() {
            self.lattice_to_vertex[self.mask.index(x, y)]
        } else {
            None
        }
    }

    /// Lattice coordinate `(x, y)` of a vertex.
    #[must_use]
    pub fn lattice_coord(&self, vertex: u32) -> Option<(usize, usize)> {
        let flat = *self.vertex_to_lattice.get(vertex as usize)?;
        Some((flat % self.width(), flat / self.width()))
    }
}

/// Triangulates every unmasked lattice cell.
///
/// Vertices are emitted in row-major order for unmasked cells only. For each
/// 2x2 block with corners `c0 = (x, y)`, `c1 = (x+1, y)`, `c2 = (x, y+1)`,
/// `c3 = (x+1, y+1)`:
///
/// - all four unmasked: triangles `[c0, c1, c2]` and `[c2, c1, c3]`
/// - exactly three: one triangle from the present corners, in corner order
/// - otherwise: nothing
///
/// # Errors
///
/// Returns [`ScanError::ShapeMismatch`] if the mask and lattice dimensions
/// differ.
#[allow(clippy::cast_possible_truncation)]
pub fn reconstruct_lattice(lattice: &DepthLattice, mask: &RasterMask) -> ScanResult<LatticeMesh> {
    mask.check_dimensions("body mask", lattice.dimensions())?;
    let (width, height) = lattice.dimensions();

    let mut mesh = IndexedMesh::with_capacity(mask.unmasked_count(), 0);
    let mut lattice_to_vertex = vec![None; width * height];
    let mut vertex_to_lattice = Vec::with_capacity(mask.unmasked_count());

    for (flat, sample) in lattice.samples().iter().enumerate() {
        if mask.cells()[flat].is_unmasked() {
            lattice_to_vertex[flat] = Some(mesh.vertices.len() as u32);
            vertex_to_lattice.push(flat);
            mesh.vertices.push(Vertex::new(sample.position, sample.uv));
        }
    }

    for y in 0..height.saturating_sub(1) {
        for x in 0..width.saturating_sub(1) {
            let corners = [
                lattice_to_vertex[mask.index(x, y)],
                lattice_to_vertex[mask.index(x + 1, y)],
                lattice_to_vertex[mask.index(x, y + 1)],
                lattice_to_vertex[mask.index(x + 1, y + 1)],
            ];
            match corners {
                [Some(c0), Some(c1), Some(c2), Some(c3)] => {
                    mesh.faces.push([c0, c1, c2]);
                    mesh.faces.push([c2, c1, c3]);
                }
                _ => {
                    let present: Vec<u32> = corners.iter().flatten().copied().collect();
                    if let [a, b, c] = present[..] {
                        mesh.faces.push([a, b, c]);
                    }
                }
            }
        }
    }

    mesh.compute_normals();
    debug!(
        vertices = mesh.vertices.len(),
        faces = mesh.faces.len(),
        "lattice reconstructed"
    );

    Ok(LatticeMesh {
        mesh,
        lattice_to_vertex,
        vertex_to_lattice,
        mask: mask.clone(),
    })
}
