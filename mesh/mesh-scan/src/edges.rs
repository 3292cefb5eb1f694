//! Scan boundary ("scanned edge") detection.

use tracing::debug;

use crate::lattice::LatticeMesh;

/// Vertices lying on the boundary of the scanned surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedEdges {
    /// Boundary vertices on the first or last lattice row, ascending.
    pub outer_rows: Vec<u32>,
    /// Boundary vertices on every other row, ascending.
    pub inner_rows: Vec<u32>,
    is_edge: Vec<bool>,
}

impl ScannedEdges {
    /// Boundary set over `vertex_count` vertices from an explicit list.
    ///
    /// Out-of-range indices are ignored. Every vertex is filed under
    /// [`ScannedEdges::inner_rows`].
    #[must_use]
    pub fn from_vertices(vertex_count: usize, vertices: impl IntoIterator<Item = u32>) -> Self {
        let mut is_edge = vec![false; vertex_count];
        for v in vertices {
            if let Some(flag) = is_edge.get_mut(v as usize) {
                *flag = true;
            }
        }
        #[allow(clippy::cast_possible_truncation)]
        let inner_rows = (0..vertex_count)
            .filter(|&v| is_edge[v])
            .map(|v| v as u32)
            .collect();
        Self {
            outer_rows: Vec::new(),
            inner_rows,
            is_edge,
        }
    }

    /// True if `vertex` is a boundary vertex.
    #[must_use]
    pub fn contains(&self, vertex: u32) -> bool {
        self.is_edge.get(vertex as usize).copied().unwrap_or(false)
    }

    /// Per-vertex boundary flags.
    #[must_use]
    pub fn flags(&self) -> &[bool] {
        &self.is_edge
    }

    /// Number of boundary vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.outer_rows.len() + self.inner_rows.len()
    }

    /// True if there are no boundary vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All boundary vertices: outer rows first, then inner rows.
    ///
    /// This order is informal; consumers that need a spatial order sort it
    /// themselves.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.outer_rows.iter().chain(&self.inner_rows).copied()
    }
}

/// Finds every vertex with fewer than 8 unmasked 8-neighbours.
#[must_use]
pub fn find_scanned_edges(lattice_mesh: &LatticeMesh) -> ScannedEdges {
    let mask = &lattice_mesh.mask;
    let last_row = lattice_mesh.height().saturating_sub(1);
    let mut edges = ScannedEdges {
        is_edge: vec![false; lattice_mesh.vertex_to_lattice.len()],
        ..ScannedEdges::default()
    };

    for (vertex, &flat) in lattice_mesh.vertex_to_lattice.iter().enumerate() {
        let (x, y) = (flat % mask.width(), flat / mask.width());
        if mask.count_unmasked_neighbours(x, y) >= 8 {
            continue;
        }
        #[allow(clippy::cast_possible_truncation)]
        let v = vertex as u32;
        edges.is_edge[vertex] = true;
        if y == 0 || y == last_row {
            edges.outer_rows.push(v);
        } else {
            edges.inner_rows.push(v);
        }
    }

    debug!(count = edges.len(), "scanned edges found");
    edges
}
