/// Frustum: six clipping planes plus the viewer position.
///
/// Each plane is a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing unit normal
/// - D is the signed distance
/// - A point P is inside the frustum if dot(plane, P_homogeneous) >= 0 for all planes
///
/// The viewer position is carried alongside the planes because PVS
/// refinement needs the leaf the viewer stands in.

use glam::{Mat4, Vec3, Vec4};
use super::view_volume::{ViewVolume, VolumeClass};

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes for culling.
///
/// Works with both perspective and orthographic projections.
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// Frustum planes: left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
    /// Viewer origin in world space
    pub position: Vec3,
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Uses the Gribb & Hartmann method. `position` is the eye point the
    /// view matrix was built from.
    pub fn from_view_projection(vp: &Mat4, position: Vec3) -> Self {
        let m = vp.to_cols_array_2d();
        let row = |r: usize| Vec4::new(m[0][r], m[1][r], m[2][r], m[3][r]);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Self::from_planes([r3 + r0, r3 - r0, r3 + r1, r3 - r1, r3 + r2, r3 - r2], position)
    }

    /// Build a frustum from raw inward-facing planes (normalized here).
    pub fn from_planes(mut planes: [Vec4; 6], position: Vec3) -> Self {
        for plane in &mut planes {
            let normal_len = plane.truncate().length();
            if normal_len > 0.0 {
                *plane /= normal_len;
            }
        }
        Self { planes, position }
    }

    /// Signed distance from `point` to plane `index` (positive = inside).
    pub fn plane_distance(&self, index: usize, point: Vec3) -> f32 {
        let plane = self.planes[index];
        plane.truncate().dot(point) + plane.w
    }

    /// Classify a sphere against the frustum (3-way test).
    ///
    /// - Center further than `radius` behind any plane → `Outside` (early out)
    /// - Within `radius` of any plane → at least `Intersect`
    /// - Otherwise → `Inside`
    pub fn classify_sphere(&self, center: Vec3, radius: f32) -> VolumeClass {
        let mut result = VolumeClass::Inside;

        for index in 0..self.planes.len() {
            let distance = self.plane_distance(index, center);
            if distance < -radius {
                return VolumeClass::Outside;
            }
            if distance < radius {
                result = VolumeClass::Intersect;
            }
        }

        result
    }
}

impl ViewVolume for Frustum {
    fn classify_sphere(&self, center: Vec3, radius: f32) -> VolumeClass {
        Frustum::classify_sphere(self, center, radius)
    }

    fn position(&self) -> Vec3 {
        self.position
    }
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
