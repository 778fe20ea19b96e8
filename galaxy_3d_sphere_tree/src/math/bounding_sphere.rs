/// Bounding sphere: world-space center and radius.
///
/// The sphere tree stores one per node. Terminal spheres come from the
/// caller; supersphere bounds are derived from their children.

use glam::Vec3;

/// A sphere in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center point
    pub center: Vec3,
    /// Radius (>= 0)
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Test if `other` lies entirely within this sphere.
    ///
    /// `epsilon` absorbs float error from centroid/radius arithmetic.
    pub fn contains(&self, other: &BoundingSphere, epsilon: f32) -> bool {
        self.center.distance(other.center) + other.radius <= self.radius + epsilon
    }

    /// Test if the two spheres overlap or touch.
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let reach = self.radius + other.radius;
        self.center.distance_squared(other.center) <= reach * reach
    }

    /// Radius this sphere would need, keeping its center, to enclose `other`.
    pub fn enclosing_radius(&self, other: &BoundingSphere) -> f32 {
        self.center.distance(other.center) + other.radius
    }
}

impl Default for BoundingSphere {
    fn default() -> Self {
        Self { center: Vec3::ZERO, radius: 0.0 }
    }
}
