/// Hierarchical visibility walk.
///
/// Classifies the tree against a view volume, refines terminals with the
/// static PVS when one is available, and reports only the transitions
/// since the previous walk for the same visibility set.
///
/// Per-node states (per set):
/// - superspheres: `Hidden` (stops the walk once settled), `Partial`
///   (children are tested), `Inside` (children inherit without a test)
/// - terminals: entering `Partial`/`Inside` from `Hidden`/`Unclassified`
///   registers the object, leaving them for `Hidden` unregisters it

use crate::camera::{ViewVolume, VolumeClass};
use crate::error::{Error, Result};
use crate::engine_err;
use super::node::{NodeFlags, SphereNode, VisibilityState};
use super::pvs::{pvs_bit, StaticVisTree};
use super::sphere_tree::{SphereTree, SOURCE};
use super::visibility::{SharedVisibilitySet, VisibilitySet};

/// Static visibility data resolved once per walk
struct PvsQuery<'a> {
    tree: &'a dyn StaticVisTree,
    /// PVS row of the leaf the viewer stands in
    source_row: &'a [u8],
}

struct CullContext<'a> {
    volume: &'a dyn ViewVolume,
    set_index: usize,
    pvs: Option<PvsQuery<'a>>,
}

impl<K: Copy + 'static> SphereTree<K> {
    /// Classify every node against `volume` and report visibility changes
    /// to `set`.
    ///
    /// The set only hears about transitions: an object registered on a
    /// previous walk and still visible is not registered again.
    ///
    /// PVS refinement applies when the tree has a static vis tree and the
    /// viewer stands in one of its empty leaves.
    ///
    /// # Arguments
    ///
    /// * `volume` - View volume (camera frustum, light volume, ...)
    /// * `set` - A visibility set previously passed to `add_visibility_set`
    pub fn compute_visibility(
        &mut self,
        volume: &dyn ViewVolume,
        set: &SharedVisibilitySet<K>,
    ) -> Result<()> {
        let Some(set_index) = self.visibility_set_index(set) else {
            return Err(engine_err!(SOURCE, Error::UnknownVisibilitySet));
        };
        let Ok(mut receiver) = set.try_borrow_mut() else {
            return Err(engine_err!(SOURCE, Error::VisibilitySetBusy));
        };

        let static_vis_tree = self.static_vis_tree.clone();
        let pvs = static_vis_tree.as_deref().and_then(|tree| {
            let source_leaf = tree.find_leaf(volume.position())?;
            let source_row = tree.leaf_pvs(source_leaf)?;
            Some(PvsQuery { tree, source_row })
        });

        let context = CullContext { volume, set_index, pvs };
        self.classify_node(self.root.index, &context, &mut *receiver, VolumeClass::Intersect);
        Ok(())
    }

    /// `inherited` is the parent's classification; only `Intersect` forces
    /// a test of this node's own sphere. The root is never tested: its
    /// bounds are fixed and need not enclose every sphere.
    ///
    /// A terminal going from `Unclassified` to `Hidden` is not reported;
    /// sets only hear about objects they were told were visible.
    fn classify_node(
        &mut self,
        index: u32,
        context: &CullContext<'_>,
        receiver: &mut dyn VisibilitySet<K>,
        inherited: VolumeClass,
    ) {
        let node = &mut self.pool[index];
        let mut class = match inherited {
            _ if node.is_root() => VolumeClass::Intersect,
            VolumeClass::Intersect => {
                context.volume.classify_sphere(node.sphere.center, node.sphere.radius)
            }
            settled => settled,
        };

        let slot = context.set_index;
        let previous = node.visibility[slot];

        if node.is_super_sphere() {
            let next = match class {
                VolumeClass::Outside if previous == VisibilityState::Hidden => return,
                VolumeClass::Outside => VisibilityState::Hidden,
                VolumeClass::Inside => VisibilityState::Inside,
                VolumeClass::Intersect => VisibilityState::Partial,
            };
            node.visibility[slot] = next;

            // Newly hidden superspheres still visit their children so
            // registered terminals get unregistered
            let mut child = node.first_child;
            while let Some(child_index) = child {
                child = self.pool[child_index].next_sibling;
                self.classify_node(child_index, context, receiver, class);
            }
            return;
        }

        if class != VolumeClass::Outside {
            if let Some(pvs) = &context.pvs {
                if !potentially_visible(node, pvs) {
                    class = VolumeClass::Outside;
                }
            }
        }

        let Some(object) = node.user_data else {
            return;
        };
        match class {
            VolumeClass::Outside => {
                if previous != VisibilityState::Hidden {
                    node.visibility[slot] = VisibilityState::Hidden;
                    if previous.is_visible() {
                        receiver.unregister_visibility(object);
                    }
                }
            }
            VolumeClass::Inside => {
                if previous != VisibilityState::Inside {
                    node.visibility[slot] = VisibilityState::Inside;
                    if previous != VisibilityState::Partial {
                        receiver.register_visibility(object);
                    }
                }
            }
            VolumeClass::Intersect => {
                if previous != VisibilityState::Partial {
                    node.visibility[slot] = VisibilityState::Partial;
                    if previous != VisibilityState::Inside {
                        receiver.register_visibility(object);
                    }
                }
            }
        }
    }
}

/// Whether any leaf the terminal overlaps is in the viewer's PVS row.
///
/// Refreshes the cached leaf list first if the sphere moved. A terminal
/// overlapping no empty leaf is left to the volume test alone.
fn potentially_visible<K>(node: &mut SphereNode<K>, pvs: &PvsQuery<'_>) -> bool {
    if node.flags.contains(NodeFlags::UPDATE_LEAVES) {
        node.flags.remove(NodeFlags::UPDATE_LEAVES);
        let restrict_leaf = node.leaf_restriction.and_then(|point| pvs.tree.find_leaf(point));
        let SphereNode { sphere, leaves, .. } = &mut *node;
        leaves.clear();
        pvs.tree.find_leaves(sphere, restrict_leaf, leaves);
    }

    node.leaves.is_empty() || node.leaves.iter().any(|&leaf| pvs_bit(pvs.source_row, leaf))
}
