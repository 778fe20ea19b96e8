//! Camera module: view volumes used to classify bounding spheres.
//!
//! The tree never builds or stores a view volume; the caller hands one to
//! each visibility query. `Frustum` is the stock implementation.

mod frustum;
mod view_volume;

pub use frustum::{
    Frustum,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
pub use view_volume::{ViewVolume, VolumeClass};
