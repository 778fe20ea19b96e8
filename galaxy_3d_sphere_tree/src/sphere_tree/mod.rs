//! Sphere tree module: dynamic bounding-sphere hierarchy for visibility.
//!
//! Terminal spheres wrap caller objects; superspheres group nearby
//! terminals under a single root. Structural work is deferred to
//! `SphereTree::process`, and each visibility query walks the tree to
//! report per-object visibility transitions to a visibility set.

mod config;
mod culler;
mod fifo;
mod node;
mod pvs;
mod sphere_tree;
mod visibility;

pub use config::SphereTreeConfig;
pub use node::{NodeKind, VisibilityState};
pub use pvs::{pvs_bit, LeafId, StaticVisTree};
pub use sphere_tree::{SphereHandle, SphereTree};
pub use visibility::{ObjectVisibilitySet, SharedVisibilitySet, VisibilitySet};
