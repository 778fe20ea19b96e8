//! Math primitives shared by the sphere tree and its collaborators.

mod bounding_sphere;

pub use bounding_sphere::BoundingSphere;
