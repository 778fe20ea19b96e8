/// View volumes for hierarchical sphere culling.

use glam::Vec3;

/// Result of a 3-way volume/sphere classification.
///
/// - `Outside` → the whole subtree under the sphere can be skipped
/// - `Inside` → descendants inherit the result without being tested
/// - `Intersect` → each child needs its own test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeClass {
    /// Sphere is entirely outside the volume
    Outside,
    /// Sphere is entirely inside the volume
    Inside,
    /// Sphere straddles at least one boundary plane
    Intersect,
}

/// Anything a visibility query can be run against (camera frustum, light
/// volume, ...).
pub trait ViewVolume {
    /// Classify a world-space sphere against the volume.
    fn classify_sphere(&self, center: Vec3, radius: f32) -> VolumeClass;

    /// Viewer origin. Used to find the source leaf for PVS lookups.
    fn position(&self) -> Vec3;
}
