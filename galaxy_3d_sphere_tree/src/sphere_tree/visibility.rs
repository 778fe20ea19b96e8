/// Visibility sets: per-camera/per-light receivers of visibility events.
///
/// A visibility set is owned by the caller and shared with the tree. The
/// tree only ever calls `register_visibility` / `unregister_visibility`
/// with the user data of terminal nodes, and only when a terminal's
/// classification for that set changes.

use std::cell::RefCell;
use std::hash::Hash;
use std::rc::Rc;
use rustc_hash::FxHashSet;

/// Receiver of visibility transitions for one view (camera, light, ...).
pub trait VisibilitySet<K> {
    /// `object` became (partially) visible in this set
    fn register_visibility(&mut self, object: K);

    /// `object` is no longer visible in this set
    fn unregister_visibility(&mut self, object: K);
}

/// Visibility set shared between the caller and the tree.
///
/// Identity is the allocation: the tree compares sets with `Rc::ptr_eq`.
pub type SharedVisibilitySet<K> = Rc<RefCell<dyn VisibilitySet<K>>>;

/// Visibility set backed by a hash set of object keys.
#[derive(Debug, Clone)]
pub struct ObjectVisibilitySet<K> {
    objects: FxHashSet<K>,
}

impl<K: Copy + Eq + Hash> ObjectVisibilitySet<K> {
    pub fn new() -> Self {
        Self { objects: FxHashSet::default() }
    }

    /// Wrap a new empty set for sharing with a SphereTree
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn contains(&self, object: K) -> bool {
        self.objects.contains(&object)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.objects.iter().copied()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for ObjectVisibilitySet<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash> VisibilitySet<K> for ObjectVisibilitySet<K> {
    fn register_visibility(&mut self, object: K) {
        self.objects.insert(object);
    }

    fn unregister_visibility(&mut self, object: K) {
        self.objects.remove(&object);
    }
}
