//! Index compaction tables.

/// Old-to-new vertex index table produced when vertices are removed.
///
/// Entry `i` is `Some(new_index)` for a surviving vertex and `None` for a
/// removed one. Surviving vertices keep their relative order, so new indices
/// are dense and ascending.
///
/// # Example
///
/// ```
/// use mesh_types::IndexRemap;
///
/// let remap = IndexRemap::from_removed(&[false, true, false, false]);
/// assert_eq!(remap.get(0), Some(0));
/// assert_eq!(remap.get(1), None);
/// assert_eq!(remap.get(3), Some(2));
/// assert_eq!(remap.kept_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexRemap {
    table: Vec<Option<u32>>,
    kept: usize,
}

impl IndexRemap {
    /// Build a table from a per-vertex removal mask.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // mesh indices are u32
    pub fn from_removed(removed: &[bool]) -> Self {
        let mut next = 0u32;
        let table = removed
            .iter()
            .map(|&gone| {
                if gone {
                    None
                } else {
                    let index = next;
                    next += 1;
                    Some(index)
                }
            })
            .collect();
        Self {
            table,
            kept: next as usize,
        }
    }

    /// Identity table over `len` vertices.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self::from_removed(&vec![false; len])
    }

    /// New index for `old`, or `None` if it was removed or is out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, old: u32) -> Option<u32> {
        self.table.get(old as usize).copied().flatten()
    }

    /// True if `old` was removed.
    #[inline]
    #[must_use]
    pub fn is_removed(&self, old: u32) -> bool {
        self.get(old).is_none()
    }

    /// Remap a face; `None` if any corner was removed.
    #[inline]
    #[must_use]
    pub fn remap_face(&self, face: [u32; 3]) -> Option<[u32; 3]> {
        Some([self.get(face[0])?, self.get(face[1])?, self.get(face[2])?])
    }

    /// Number of vertices before compaction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if the table covers no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Number of surviving vertices.
    #[must_use]
    pub const fn kept_count(&self) -> usize {
        self.kept
    }

    /// Number of removed vertices.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.table.len() - self.kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_keeps_everything() {
        let remap = IndexRemap::identity(4);
        assert_eq!(remap.kept_count(), 4);
        assert_eq!(remap.removed_count(), 0);
        assert_eq!(remap.get(3), Some(3));
    }

    #[test]
    fn remap_face_drops_faces_touching_removed() {
        let remap = IndexRemap::from_removed(&[false, true, false, false]);
        assert_eq!(remap.remap_face([0, 2, 3]), Some([0, 1, 2]));
        assert_eq!(remap.remap_face([0, 1, 2]), None);
    }

    #[test]
    fn out_of_range_is_removed() {
        let remap = IndexRemap::from_removed(&[false]);
        assert!(remap.is_removed(5));
    }
}
