/// Static visibility (BSP + PVS) collaborator.
///
/// The sphere tree does not build or own level geometry. A precomputed
/// BSP tree with a potentially-visible-set table is consumed through this
/// narrow query interface to cull terminals hidden behind static walls.

use glam::Vec3;
use crate::math::BoundingSphere;

/// Index of a BSP leaf
pub type LeafId = u32;

/// Read-only access to a BSP tree's leaves and PVS table.
///
/// PVS rows are bit arrays: leaf `l` is visible from a row when
/// `row[l >> 3] & (1 << (l & 7)) != 0` (see [`pvs_bit`]).
pub trait StaticVisTree {
    /// Empty leaf containing `point`, or `None` when the point lies in
    /// solid space or outside the tree.
    fn find_leaf(&self, point: Vec3) -> Option<LeafId>;

    /// Append every empty leaf overlapped by `sphere` to `leaves`.
    ///
    /// With `restrict_leaf`, only leaves potentially visible from that leaf
    /// are reported (used for point lights, which cannot illuminate leaves
    /// they cannot see).
    fn find_leaves(&self, sphere: &BoundingSphere, restrict_leaf: Option<LeafId>, leaves: &mut Vec<LeafId>);

    /// Concatenated PVS rows of every leaf
    fn pvs_data(&self) -> &[u8];

    /// Byte offset of `leaf`'s row inside [`pvs_data`](Self::pvs_data)
    fn visibility_offset(&self, leaf: LeafId) -> Option<usize>;

    /// PVS row of `leaf`
    fn leaf_pvs(&self, leaf: LeafId) -> Option<&[u8]> {
        let offset = self.visibility_offset(leaf)?;
        self.pvs_data().get(offset..)
    }
}

/// Test the visibility bit of `leaf` in a PVS row. Bits past the end of
/// the row read as not visible.
#[inline]
pub fn pvs_bit(row: &[u8], leaf: LeafId) -> bool {
    row.get((leaf >> 3) as usize)
        .is_some_and(|byte| byte & (1 << (leaf & 7)) != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pvs_bit() {
        let row = [0b0000_0101u8, 0b1000_0000];
        assert!(pvs_bit(&row, 0));
        assert!(!pvs_bit(&row, 1));
        assert!(pvs_bit(&row, 2));
        assert!(pvs_bit(&row, 15));
        assert!(!pvs_bit(&row, 14));
        assert!(!pvs_bit(&row, 64));
    }

    struct TwoRows;

    impl StaticVisTree for TwoRows {
        fn find_leaf(&self, _point: Vec3) -> Option<LeafId> {
            Some(0)
        }
        fn find_leaves(&self, _: &BoundingSphere, _: Option<LeafId>, leaves: &mut Vec<LeafId>) {
            leaves.push(1);
        }
        fn pvs_data(&self) -> &[u8] {
            &[0b01, 0b10]
        }
        fn visibility_offset(&self, leaf: LeafId) -> Option<usize> {
            (leaf < 2).then_some(leaf as usize)
        }
    }

    #[test]
    fn test_leaf_pvs_slices_from_offset() {
        let tree = TwoRows;
        assert_eq!(tree.leaf_pvs(1), Some(&[0b10u8][..]));
        assert!(pvs_bit(tree.leaf_pvs(0).unwrap(), 0));
        assert_eq!(tree.leaf_pvs(5), None);
    }
}
