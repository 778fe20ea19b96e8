/// Sphere tree node: terminal leaf or supersphere.
///
/// Nodes live in the tree's NodePool and refer to each other by pool
/// index. Children of a node form an intrusive doubly-linked list
/// (`first_child` / `next_sibling` / `prev_sibling`); the parent owns the
/// existence of its subtree.

use bitflags::bitflags;
use glam::Vec3;
use crate::math::BoundingSphere;
use super::fifo::QueueTicket;
use super::pvs::LeafId;

bitflags! {
    /// Structural state of a node.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        /// Bounds a set of child nodes; allocated and freed by the tree
        const SUPER_SPHERE  = 0x01;
        /// The single root supersphere
        const ROOT_NODE     = 0x08;
        /// Bounds must be refreshed from the children
        const RECOMPUTE     = 0x10;
        /// Node waits to be placed in the hierarchy
        const INTEGRATE     = 0x20;
        /// Wraps one caller-owned object
        const TERMINAL      = 0x40;
        /// Cached PVS leaves are stale
        const UPDATE_LEAVES = 0x80;
    }
}

/// Per-(node, visibility set) classification remembered between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    /// Never classified (or reset after a structural change)
    #[default]
    Unclassified,
    /// Outside the view volume
    Hidden,
    /// Straddles the view volume
    Partial,
    /// Entirely inside the view volume
    Inside,
}

impl VisibilityState {
    /// Whether a terminal in this state is registered with its set
    pub fn is_visible(self) -> bool {
        matches!(self, VisibilityState::Partial | VisibilityState::Inside)
    }
}

/// Kind of a node, as exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    SuperSphere,
    Terminal,
}

pub(crate) struct SphereNode<K> {
    pub sphere: BoundingSphere,
    pub flags: NodeFlags,
    pub parent: Option<u32>,
    pub first_child: Option<u32>,
    pub next_sibling: Option<u32>,
    pub prev_sibling: Option<u32>,
    pub child_count: u32,
    /// Squared distance the center may drift from the parent's center
    /// before the node pierces the parent.
    pub binding_distance: f32,
    pub user_data: Option<K>,
    /// One slot per registered visibility set
    pub visibility: Vec<VisibilityState>,
    /// PVS leaves overlapped by the sphere; valid while UPDATE_LEAVES is clear
    pub leaves: Vec<LeafId>,
    /// Restricts the PVS leaf search to the leaf containing this point
    pub leaf_restriction: Option<Vec3>,
    pub recompute_ticket: Option<QueueTicket>,
    pub integrate_ticket: Option<QueueTicket>,
}

impl<K> SphereNode<K> {
    pub fn new(sphere: BoundingSphere, flags: NodeFlags, user_data: Option<K>, set_count: usize) -> Self {
        Self {
            sphere,
            flags,
            parent: None,
            first_child: None,
            next_sibling: None,
            prev_sibling: None,
            child_count: 0,
            binding_distance: 0.0,
            user_data,
            visibility: vec![VisibilityState::Unclassified; set_count],
            leaves: Vec::new(),
            leaf_restriction: None,
            recompute_ticket: None,
            integrate_ticket: None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.flags.contains(NodeFlags::ROOT_NODE) {
            NodeKind::Root
        } else if self.flags.contains(NodeFlags::TERMINAL) {
            NodeKind::Terminal
        } else {
            NodeKind::SuperSphere
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.flags.contains(NodeFlags::TERMINAL)
    }

    pub fn is_super_sphere(&self) -> bool {
        self.flags.contains(NodeFlags::SUPER_SPHERE)
    }

    pub fn is_root(&self) -> bool {
        self.flags.contains(NodeFlags::ROOT_NODE)
    }

    /// Squared distance this node may move from `parent_sphere`'s center
    /// and still be enclosed by it.
    pub fn compute_binding_distance(&mut self, parent_sphere: &BoundingSphere) {
        let slack = parent_sphere.radius - self.sphere.radius;
        self.binding_distance = if slack <= 0.0 { 0.0 } else { slack * slack };
    }

    pub fn reset_visibility(&mut self) {
        self.visibility.fill(VisibilityState::Unclassified);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(radius: f32, flags: NodeFlags) -> SphereNode<u32> {
        SphereNode::new(BoundingSphere::new(Vec3::ZERO, radius), flags, None, 2)
    }

    #[test]
    fn test_kind_from_flags() {
        assert_eq!(node(1.0, NodeFlags::TERMINAL).kind(), NodeKind::Terminal);
        assert_eq!(node(1.0, NodeFlags::SUPER_SPHERE).kind(), NodeKind::SuperSphere);
        assert_eq!(
            node(1.0, NodeFlags::SUPER_SPHERE | NodeFlags::ROOT_NODE).kind(),
            NodeKind::Root,
        );
    }

    #[test]
    fn test_binding_distance_is_squared_slack() {
        let mut child = node(1.0, NodeFlags::TERMINAL);
        child.compute_binding_distance(&BoundingSphere::new(Vec3::ZERO, 4.0));
        assert!((child.binding_distance - 9.0).abs() < 1e-6);

        // A child bigger than its parent has no slack at all
        child.compute_binding_distance(&BoundingSphere::new(Vec3::ZERO, 0.5));
        assert_eq!(child.binding_distance, 0.0);
    }

    #[test]
    fn test_new_node_has_one_state_per_set() {
        let n = node(1.0, NodeFlags::TERMINAL);
        assert_eq!(n.visibility, vec![VisibilityState::Unclassified; 2]);
    }

    #[test]
    fn test_reset_visibility() {
        let mut n = node(1.0, NodeFlags::TERMINAL);
        n.visibility[1] = VisibilityState::Inside;
        n.reset_visibility();
        assert!(n.visibility.iter().all(|s| *s == VisibilityState::Unclassified));
        assert!(!VisibilityState::Hidden.is_visible());
        assert!(VisibilityState::Partial.is_visible());
    }
}
