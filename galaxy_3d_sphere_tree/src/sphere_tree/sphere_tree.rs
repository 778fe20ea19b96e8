/// SphereTree: dynamic hierarchy of bounding spheres.
///
/// Layout: one root supersphere, superspheres grouping nearby terminals,
/// and terminals wrapping caller objects. New and moved terminals are
/// parked under the root and placed by `process`, which also refreshes
/// the bounds of superspheres whose children changed.
///
/// All nodes live in a fixed-capacity NodePool reserved at construction.
/// Handles are generational, so a handle to a removed sphere is rejected
/// instead of silently reaching whatever node reused the slot.

use std::rc::Rc;
use glam::Vec3;
use crate::error::{Error, Result};
use crate::math::BoundingSphere;
use crate::utils::{NodePool, PoolId};
use crate::{engine_bail, engine_debug, engine_err, engine_error, engine_info, engine_trace, engine_warn};
use super::config::SphereTreeConfig;
use super::fifo::WorkQueue;
use super::node::{NodeFlags, NodeKind, SphereNode, VisibilityState};
use super::pvs::{LeafId, StaticVisTree};
use super::visibility::SharedVisibilitySet;

pub(super) const SOURCE: &str = "galaxy3d::SphereTree";

/// Stable reference to a node of a SphereTree.
///
/// Invalidated when the node is removed (by the caller for terminals, by
/// the tree for superspheres).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SphereHandle(PoolId);

/// What `recompute` left behind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RecomputeOutcome {
    /// Node still has children
    Keep,
    /// Node has no children left and should be removed
    Empty,
}

/// Dynamic bounding-sphere hierarchy.
///
/// `K` is the caller's object key (entity id, slotmap key, ...). It is
/// handed back to visibility sets on every visibility transition.
///
/// Mutation (`add_sphere`, `update_sphere`, `process`, ...) and queries
/// (`compute_visibility`) all take `&mut self`, so a visibility walk can
/// never observe a half-processed hierarchy.
pub struct SphereTree<K> {
    pub(super) pool: NodePool<SphereNode<K>>,
    pub(super) root: PoolId,
    /// Nodes waiting to be placed in the hierarchy
    integration_fifo: WorkQueue,
    /// Superspheres whose bounds must be refreshed
    recompute_fifo: WorkQueue,
    /// Registered visibility sets; index = per-node state slot
    pub(super) sets: Vec<SharedVisibilitySet<K>>,
    pub(super) static_vis_tree: Option<Rc<dyn StaticVisTree>>,
    config: SphereTreeConfig,
    terminal_count: u32,
}

impl<K: Copy + 'static> SphereTree<K> {
    /// Create an empty tree holding only the root.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacity, leaf size, padding and root radius
    /// * `static_vis_tree` - Optional BSP/PVS data for occlusion by static geometry
    pub fn new(
        config: SphereTreeConfig,
        static_vis_tree: Option<Rc<dyn StaticVisTree>>,
    ) -> Result<Self> {
        config.validate().map_err(|err| engine_err!(SOURCE, err))?;

        let capacity = config.node_capacity();
        let mut pool = NodePool::with_capacity(capacity);
        let root_node = SphereNode::new(
            BoundingSphere::new(Vec3::ZERO, config.root_radius),
            NodeFlags::SUPER_SPHERE | NodeFlags::ROOT_NODE,
            None,
            0,
        );
        let root = pool
            .alloc(root_node)
            .map_err(|_| engine_err!(SOURCE, Error::PoolExhausted { capacity }))?;

        engine_info!(
            SOURCE,
            "Sphere tree created: {} spheres max ({} nodes), leaf size {}, padding {}{}",
            config.max_spheres,
            capacity,
            config.max_leaf_size,
            config.padding,
            if static_vis_tree.is_some() { ", PVS enabled" } else { "" }
        );

        Ok(Self {
            pool,
            root,
            integration_fifo: WorkQueue::with_capacity(capacity),
            recompute_fifo: WorkQueue::with_capacity(capacity),
            sets: Vec::new(),
            static_vis_tree,
            config,
            terminal_count: 0,
        })
    }

    /// Create a tree with `SphereTreeConfig::default()` and no PVS data
    pub fn with_defaults() -> Result<Self> {
        Self::new(SphereTreeConfig::default(), None)
    }

    // ===== SPHERES =====

    /// Add a terminal sphere for `user_data`.
    ///
    /// The sphere is parked under the root until the next `process` call
    /// places it. Fails with `PoolExhausted` once `max_spheres` terminals
    /// are alive.
    pub fn add_sphere(&mut self, bounds: BoundingSphere, user_data: K) -> Result<SphereHandle> {
        validate_bounds(&bounds)?;
        let capacity = self.pool.capacity();
        if self.terminal_count >= self.config.max_spheres {
            return Err(engine_err!(SOURCE, Error::PoolExhausted { capacity }));
        }

        let node = SphereNode::new(
            bounds,
            NodeFlags::TERMINAL | NodeFlags::UPDATE_LEAVES,
            Some(user_data),
            self.sets.len(),
        );
        let id = self
            .pool
            .alloc(node)
            .map_err(|_| engine_err!(SOURCE, Error::PoolExhausted { capacity }))?;

        self.terminal_count += 1;
        self.add_integrate(id.index);
        Ok(SphereHandle(id))
    }

    /// Remove a terminal sphere.
    ///
    /// The object is unregistered from every set it is visible in, pending
    /// work for the node is cancelled, and a supersphere left without
    /// children is removed with it. Removing the root is ignored.
    ///
    /// Fails with `VisibilitySetBusy`, leaving the tree untouched, while
    /// one of those sets is borrowed.
    pub fn remove_sphere(&mut self, handle: SphereHandle) -> Result<()> {
        let index = self.live_index(handle)?;
        let node = &self.pool[index];
        if node.is_root() {
            engine_warn!(SOURCE, "Ignoring request to remove the root sphere");
            return Ok(());
        }
        if !node.is_terminal() {
            engine_bail!(SOURCE, "{:?} is a supersphere; superspheres are managed by the tree", handle);
        }
        self.ensure_sets_free(index)?;
        self.remove_node(index);
        Ok(())
    }

    /// Move and optionally resize a terminal sphere.
    ///
    /// While the sphere stays within its binding distance the hierarchy is
    /// left alone (a resize still queues the parent for recompute).
    /// Otherwise it is detached, the parent is queued for recompute, and
    /// the sphere waits under the root for the next `process`.
    pub fn update_sphere(
        &mut self,
        handle: SphereHandle,
        center: Vec3,
        radius: Option<f32>,
    ) -> Result<()> {
        let index = self.live_index(handle)?;
        let node = &mut self.pool[index];
        if !node.is_terminal() {
            engine_bail!(SOURCE, "{:?} is not a terminal sphere", handle);
        }
        let bounds = BoundingSphere::new(center, radius.unwrap_or(node.sphere.radius));
        validate_bounds(&bounds)?;

        let resized = bounds.radius != node.sphere.radius;
        node.sphere = bounds;
        node.flags.insert(NodeFlags::UPDATE_LEAVES);

        if node.flags.contains(NodeFlags::INTEGRATE) {
            return Ok(());
        }
        let Some(parent) = node.parent else {
            return Ok(());
        };

        let parent_sphere = self.pool[parent].sphere;
        let node = &mut self.pool[index];
        if resized {
            node.compute_binding_distance(&parent_sphere);
        }

        if center.distance_squared(parent_sphere.center) >= node.binding_distance {
            self.queue_recompute(parent);
            self.unlink(index);
            self.add_integrate(index);
        } else if resized {
            self.queue_recompute(parent);
        }
        Ok(())
    }

    /// Queue a supersphere for recompute at the next `process`.
    pub fn add_recompute(&mut self, handle: SphereHandle) -> Result<()> {
        let index = self.live_index(handle)?;
        if self.pool[index].is_terminal() {
            engine_bail!(SOURCE, "{:?} is a terminal sphere; only superspheres are recomputed", handle);
        }
        self.queue_recompute(index);
        Ok(())
    }

    /// Run the deferred work queued since the last call.
    ///
    /// Recomputes run first, then integrations. Each queue is drained up to
    /// the number of entries it held when its pass started.
    pub fn process(&mut self) -> Result<()> {
        let recompute_budget = self.recompute_fifo.len();
        let mut pruned = 0usize;
        for _ in 0..recompute_budget {
            let Some(index) = self.recompute_fifo.pop() else {
                break;
            };
            self.pool[index].recompute_ticket = None;
            if self.recompute(index) == RecomputeOutcome::Empty {
                self.remove_node(index);
                pruned += 1;
            }
        }

        let integrate_budget = self.integration_fifo.len();
        let max_leaf_size = self.config.max_leaf_size;
        for _ in 0..integrate_budget {
            let Some(index) = self.integration_fifo.pop() else {
                break;
            };
            self.pool[index].integrate_ticket = None;
            self.integrate(index, self.root.index, max_leaf_size)?;
        }

        if recompute_budget + integrate_budget > 0 {
            engine_trace!(
                SOURCE,
                "process: {} recomputed ({} pruned), {} integrated, {} nodes",
                recompute_budget, pruned, integrate_budget, self.pool.len()
            );
        }
        Ok(())
    }

    // ===== VISIBILITY SETS =====

    /// Register a visibility set and return its index.
    ///
    /// Every node gets a fresh `Unclassified` state for the set. Adding a
    /// set twice returns the existing index.
    pub fn add_visibility_set(&mut self, set: SharedVisibilitySet<K>) -> usize {
        if let Some(index) = self.visibility_set_index(&set) {
            engine_warn!(SOURCE, "Visibility set already registered at index {}", index);
            return index;
        }
        self.sets.push(set);
        for (_, node) in self.pool.iter_mut() {
            node.visibility.push(VisibilityState::Unclassified);
        }
        engine_debug!(SOURCE, "Visibility set {} added", self.sets.len() - 1);
        self.sets.len() - 1
    }

    /// Unregister a visibility set.
    ///
    /// Sets registered after it shift down by one index. Objects are not
    /// unregistered from the removed set; the caller owns it.
    pub fn remove_visibility_set(&mut self, set: &SharedVisibilitySet<K>) -> Result<()> {
        let Some(index) = self.visibility_set_index(set) else {
            return Err(engine_err!(SOURCE, Error::UnknownVisibilitySet));
        };
        self.sets.remove(index);
        for (_, node) in self.pool.iter_mut() {
            node.visibility.remove(index);
        }
        engine_debug!(SOURCE, "Visibility set {} removed", index);
        Ok(())
    }

    /// Index of `set`, if registered
    pub fn visibility_set_index(&self, set: &SharedVisibilitySet<K>) -> Option<usize> {
        self.sets.iter().position(|registered| Rc::ptr_eq(registered, set))
    }

    pub fn visibility_set_count(&self) -> usize {
        self.sets.len()
    }

    /// Forget the node's visibility in every set.
    ///
    /// A terminal is unregistered from the sets it is visible in. The node
    /// and its ancestors go back to `Unclassified`, so the next query
    /// re-evaluates them from scratch.
    pub fn invalidate_visibility(&mut self, handle: SphereHandle) -> Result<()> {
        let index = self.live_index(handle)?;
        if self.pool[index].is_terminal() {
            self.ensure_sets_free(index)?;
            self.unregister_everywhere(index);
        }
        self.reset_branch_visibility(index);
        Ok(())
    }

    /// Restrict the PVS leaf search of a sphere to the leaf containing
    /// `point` (typically a point light's position), or lift the restriction.
    pub fn set_leaf_restriction(&mut self, handle: SphereHandle, point: Option<Vec3>) -> Result<()> {
        let index = self.live_index(handle)?;
        let node = &mut self.pool[index];
        node.leaf_restriction = point;
        node.flags.insert(NodeFlags::UPDATE_LEAVES);
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn config(&self) -> &SphereTreeConfig {
        &self.config
    }

    pub fn root(&self) -> SphereHandle {
        SphereHandle(self.root)
    }

    /// Whether `handle` refers to a live node of this tree
    pub fn contains(&self, handle: SphereHandle) -> bool {
        self.pool.contains(handle.0)
    }

    pub fn kind(&self, handle: SphereHandle) -> Option<NodeKind> {
        self.node(handle).map(SphereNode::kind)
    }

    pub fn sphere(&self, handle: SphereHandle) -> Option<BoundingSphere> {
        self.node(handle).map(|node| node.sphere)
    }

    pub fn parent(&self, handle: SphereHandle) -> Option<SphereHandle> {
        let parent = self.node(handle)?.parent?;
        self.handle_of(parent)
    }

    /// Children of a node, most recently attached first
    pub fn children(&self, handle: SphereHandle) -> Vec<SphereHandle> {
        let mut children = Vec::new();
        let Some(node) = self.node(handle) else {
            return children;
        };
        let mut child = node.first_child;
        while let Some(index) = child {
            children.extend(self.handle_of(index));
            child = self.pool[index].next_sibling;
        }
        children
    }

    pub fn user_data(&self, handle: SphereHandle) -> Option<K> {
        self.node(handle)?.user_data
    }

    /// Replace the object carried by a terminal.
    ///
    /// Sets the old object is visible in are told it left, and the new
    /// object is registered in its place.
    pub fn set_user_data(&mut self, handle: SphereHandle, user_data: K) -> Result<()> {
        let index = self.live_index(handle)?;
        if !self.pool[index].is_terminal() {
            engine_bail!(SOURCE, "{:?} is not a terminal sphere", handle);
        }
        self.ensure_sets_free(index)?;
        self.unregister_everywhere(index);
        let node = &mut self.pool[index];
        node.user_data = Some(user_data);
        for (set, state) in self.sets.iter().zip(&node.visibility) {
            if !state.is_visible() {
                continue;
            }
            if let Ok(mut set) = set.try_borrow_mut() {
                set.register_visibility(user_data);
            }
        }
        Ok(())
    }

    /// Classification of a node for the set at `set_index`
    pub fn visibility_state(&self, handle: SphereHandle, set_index: usize) -> Option<VisibilityState> {
        self.node(handle)?.visibility.get(set_index).copied()
    }

    /// PVS leaves cached for a node during the last query that needed them
    pub fn cached_leaves(&self, handle: SphereHandle) -> Option<&[LeafId]> {
        self.node(handle).map(|node| node.leaves.as_slice())
    }

    /// Handles of every live node, root included
    pub fn handles(&self) -> impl Iterator<Item = SphereHandle> + '_ {
        self.pool
            .iter()
            .filter_map(|(index, _)| self.pool.id(index))
            .map(SphereHandle)
    }

    /// Live nodes (root, superspheres and terminals)
    pub fn node_count(&self) -> usize {
        self.pool.len()
    }

    /// Total node slots reserved at construction
    pub fn capacity(&self) -> usize {
        self.pool.capacity()
    }

    pub fn terminal_count(&self) -> usize {
        self.terminal_count as usize
    }

    pub fn pending_integrations(&self) -> usize {
        self.integration_fifo.len()
    }

    pub fn pending_recomputes(&self) -> usize {
        self.recompute_fifo.len()
    }

    // ===== INTERNAL: HANDLES =====

    fn node(&self, handle: SphereHandle) -> Option<&SphereNode<K>> {
        self.pool.get(handle.0)
    }

    fn handle_of(&self, index: u32) -> Option<SphereHandle> {
        self.pool.id(index).map(SphereHandle)
    }

    fn live_index(&self, handle: SphereHandle) -> Result<u32> {
        if !self.pool.contains(handle.0) {
            engine_bail!(SOURCE, "{:?} does not refer to a live sphere", handle);
        }
        Ok(handle.0.index)
    }

    // ===== INTERNAL: STRUCTURE =====

    /// Park a node under the root and queue it for integration
    fn add_integrate(&mut self, index: u32) {
        self.add_child(self.root.index, index);
        let ticket = self.integration_fifo.push(index);
        let node = &mut self.pool[index];
        node.flags.insert(NodeFlags::INTEGRATE);
        node.integrate_ticket = Some(ticket);
    }

    /// Queue a supersphere for recompute. A node without children is
    /// removed on the spot instead.
    pub(super) fn queue_recompute(&mut self, index: u32) {
        let node = &self.pool[index];
        if node.flags.contains(NodeFlags::RECOMPUTE) {
            return;
        }
        if node.child_count == 0 {
            self.remove_node(index);
            return;
        }
        let ticket = self.recompute_fifo.push(index);
        let node = &mut self.pool[index];
        node.flags.insert(NodeFlags::RECOMPUTE);
        node.recompute_ticket = Some(ticket);
    }

    /// Place `index` under the best supersphere among the children of
    /// `super_sphere`, growing one or creating one as needed.
    ///
    /// 1. Closest supersphere already enclosing the node: join it.
    /// 2. Otherwise the one needing the least growth, if the grown radius
    ///    stays within `node_size`: grow it and join.
    /// 3. Otherwise a new supersphere around the node.
    pub(super) fn integrate(&mut self, index: u32, super_sphere: u32, node_size: f32) -> Result<()> {
        let padding = self.config.padding;
        let sphere = self.pool[index].sphere;

        let mut enclosing: Option<(u32, f32)> = None;
        let mut growing: Option<(u32, f32)> = None;
        let mut search = self.pool[super_sphere].first_child;
        while let Some(candidate) = search {
            let node = &self.pool[candidate];
            search = node.next_sibling;
            if !node.is_super_sphere() || node.child_count == 0 {
                continue;
            }

            let distance_sq = sphere.center.distance_squared(node.sphere.center);
            match enclosing {
                Some((_, best_sq)) => {
                    if distance_sq < best_sq && distance_sq.sqrt() + sphere.radius <= node.sphere.radius {
                        enclosing = Some((candidate, distance_sq));
                    }
                }
                None => {
                    let growth = distance_sq.sqrt() + sphere.radius - node.sphere.radius;
                    if growth < growing.map_or(f32::MAX, |(_, best)| best) {
                        if growth < 0.0 {
                            enclosing = Some((candidate, distance_sq));
                        } else {
                            growing = Some((candidate, growth));
                        }
                    }
                }
            }
        }

        let grown = growing
            .map(|(target, growth)| (target, growth + self.pool[target].sphere.radius + padding))
            .filter(|&(_, new_size)| new_size <= node_size);

        let parent = if let Some((target, _)) = enclosing {
            self.unlink(index);
            self.add_child(target, index);
            target
        } else if let Some((target, new_size)) = grown {
            self.unlink(index);
            self.pool[target].sphere.radius = new_size;
            self.add_child(target, index);
            target
        } else {
            debug_assert!(self.pool[super_sphere].is_root(), "new superspheres hang off the root");
            let capacity = self.pool.capacity();
            let node = SphereNode::new(
                BoundingSphere::new(sphere.center, sphere.radius + padding),
                NodeFlags::SUPER_SPHERE,
                None,
                self.sets.len(),
            );
            let target = match self.pool.alloc(node) {
                Ok(id) => id.index,
                Err(_) => {
                    // Leave the node queued so a later pass can retry
                    let ticket = self.integration_fifo.push(index);
                    self.pool[index].integrate_ticket = Some(ticket);
                    return Err(engine_err!(SOURCE, Error::PoolExhausted { capacity }));
                }
            };
            self.unlink(index);
            self.add_child(target, index);
            self.add_child(super_sphere, target);
            target
        };

        self.recompute(parent);
        self.rebind_children(parent);
        self.pool[index].flags.remove(NodeFlags::INTEGRATE);
        Ok(())
    }

    /// Refresh a supersphere's bounds from its children.
    ///
    /// The candidate sphere is centered on the children's centroid and
    /// padded around the farthest child. Bounds only ever grow: if the
    /// candidate is not larger than the current radius the node keeps its
    /// current center and radius, which already enclose every child.
    pub(super) fn recompute(&mut self, index: u32) -> RecomputeOutcome {
        let node = &self.pool[index];
        let Some(first_child) = node.first_child else {
            return RecomputeOutcome::Empty;
        };
        let is_root = node.is_root();
        self.clear_recompute(index);
        if is_root {
            return RecomputeOutcome::Keep;
        }

        let mut sum = Vec3::ZERO;
        let mut count = 0u32;
        let mut child = Some(first_child);
        while let Some(c) = child {
            sum += self.pool[c].sphere.center;
            count += 1;
            child = self.pool[c].next_sibling;
        }

        let mut candidate = BoundingSphere::new(sum / count as f32, 0.0);
        let mut child = Some(first_child);
        while let Some(c) = child {
            let child_sphere = self.pool[c].sphere;
            candidate.radius = candidate.radius.max(candidate.enclosing_radius(&child_sphere));
            child = self.pool[c].next_sibling;
        }
        candidate.radius += self.config.padding;

        let node = &mut self.pool[index];
        if candidate.radius <= node.sphere.radius {
            return RecomputeOutcome::Keep;
        }
        node.sphere = candidate;

        self.rebind_children(index);
        self.reset_branch_visibility(index);
        RecomputeOutcome::Keep
    }

    /// Refresh the binding distance of every child against the node's
    /// current bounds
    fn rebind_children(&mut self, index: u32) {
        let parent_sphere = self.pool[index].sphere;
        let mut child = self.pool[index].first_child;
        while let Some(c) = child {
            let child_node = &mut self.pool[c];
            child_node.compute_binding_distance(&parent_sphere);
            child = child_node.next_sibling;
        }
    }

    /// Drop the RECOMPUTE flag and any queue entry still pending for it
    fn clear_recompute(&mut self, index: u32) {
        let node = &mut self.pool[index];
        node.flags.remove(NodeFlags::RECOMPUTE);
        if let Some(ticket) = node.recompute_ticket.take() {
            self.recompute_fifo.cancel(ticket);
        }
    }

    /// Free a non-root node. Its children must already be detached.
    pub(super) fn remove_node(&mut self, index: u32) {
        if self.pool[index].is_root() {
            return;
        }
        if self.pool[index].is_terminal() {
            self.unregister_everywhere(index);
            self.terminal_count -= 1;
        }
        self.unlink(index);
        self.pool.free(index);
    }

    /// Detach a node from its parent and cancel its queued work.
    fn unlink(&mut self, index: u32) {
        let node = &mut self.pool[index];
        let recompute = node.recompute_ticket.take();
        let integrate = node.integrate_ticket.take();
        let parent = node.parent.take();
        if recompute.is_some() {
            node.flags.remove(NodeFlags::RECOMPUTE);
        }
        if integrate.is_some() {
            node.flags.remove(NodeFlags::INTEGRATE);
        }

        if let Some(ticket) = recompute {
            self.recompute_fifo.cancel(ticket);
        }
        if let Some(ticket) = integrate {
            self.integration_fifo.cancel(ticket);
        }
        if let Some(parent) = parent {
            self.remove_child(parent, index);
        }
    }

    fn add_child(&mut self, parent: u32, child: u32) {
        let first = self.pool[parent].first_child;
        let child_node = &mut self.pool[child];
        debug_assert!(child_node.parent.is_none(), "node {} already has a parent", child);
        child_node.parent = Some(parent);
        child_node.prev_sibling = None;
        child_node.next_sibling = first;
        if let Some(first) = first {
            self.pool[first].prev_sibling = Some(child);
        }

        let parent_node = &mut self.pool[parent];
        parent_node.first_child = Some(child);
        parent_node.child_count += 1;
        self.reset_branch_visibility(parent);
    }

    /// Splice `child` out of `parent`'s child list. A non-root supersphere
    /// left empty is removed immediately.
    fn remove_child(&mut self, parent: u32, child: u32) {
        let child_node = &mut self.pool[child];
        let prev = child_node.prev_sibling.take();
        let next = child_node.next_sibling.take();
        match prev {
            Some(prev) => self.pool[prev].next_sibling = next,
            None => self.pool[parent].first_child = next,
        }
        if let Some(next) = next {
            self.pool[next].prev_sibling = prev;
        }

        let parent_node = &mut self.pool[parent];
        debug_assert!(parent_node.child_count > 0, "child count underflow on node {}", parent);
        parent_node.child_count -= 1;
        if parent_node.child_count == 0 && !parent_node.is_root() {
            self.remove_node(parent);
        }
    }

    /// Reset the visibility states of a node and all its ancestors
    fn reset_branch_visibility(&mut self, index: u32) {
        let mut current = Some(index);
        while let Some(index) = current {
            let node = &mut self.pool[index];
            node.reset_visibility();
            current = node.parent;
        }
    }

    /// Fail with `VisibilitySetBusy` if a set the node is visible in is
    /// currently borrowed
    fn ensure_sets_free(&self, index: u32) -> Result<()> {
        let node = &self.pool[index];
        let busy = self
            .sets
            .iter()
            .zip(&node.visibility)
            .position(|(set, state)| state.is_visible() && set.try_borrow_mut().is_err());
        if let Some(set_index) = busy {
            engine_error!(SOURCE, "Visibility set {} busy; node {} left unchanged", set_index, index);
            return Err(Error::VisibilitySetBusy);
        }
        Ok(())
    }

    /// Tell every set the terminal is visible in that it no longer is.
    /// Callers check `ensure_sets_free` first.
    fn unregister_everywhere(&self, index: u32) {
        let node = &self.pool[index];
        let Some(object) = node.user_data else {
            return;
        };
        for (set, state) in self.sets.iter().zip(&node.visibility) {
            if !state.is_visible() {
                continue;
            }
            if let Ok(mut set) = set.try_borrow_mut() {
                set.unregister_visibility(object);
            }
        }
    }
}

fn validate_bounds(bounds: &BoundingSphere) -> Result<()> {
    if !bounds.center.is_finite() || !bounds.radius.is_finite() || bounds.radius < 0.0 {
        return Err(engine_err!(SOURCE, Error::InvalidBounds(format!(
            "center {:?}, radius {}", bounds.center, bounds.radius
        ))));
    }
    Ok(())
}

#[cfg(test)]
#[path = "sphere_tree_tests.rs"]
mod tests;
