/*!
# Galaxy 3D Sphere Tree

Dynamic bounding-sphere hierarchy for visibility determination.

Objects are wrapped in terminal spheres and grouped under superspheres as
they move. Each frame, the tree is classified against a view volume (and
optionally a static BSP/PVS), and only the objects whose visibility changed
are reported to the caller's visibility sets.

## Architecture

- **SphereTree**: node pool, deferred integration/recompute queues, visibility walk
- **ViewVolume**: anything spheres can be classified against (`Frustum` provided)
- **VisibilitySet**: receiver of register/unregister events, one per view
- **StaticVisTree**: read-only BSP leaf and PVS queries for static occlusion

## Frame loop

```ignore
tree.update_sphere(handle, new_center, None)?;  // as objects move
tree.process()?;                                 // once per frame, before queries
tree.compute_visibility(&frustum, &camera_set)?; // once per view
```
*/

// Internal modules
mod error;
pub mod log;
pub mod camera;
pub mod math;
pub mod sphere_tree;
pub mod utils;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Sphere tree
    pub use crate::sphere_tree::{SphereTree, SphereHandle, SphereTreeConfig};

    // Logging sub-module (types and controls, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, set_min_severity, min_severity,
        };
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // Camera sub-module (view volumes)
    pub mod camera {
        pub use crate::camera::*;
    }

    // Math sub-module
    pub mod math {
        pub use crate::math::*;
    }

    // Sphere tree sub-module with all visibility types
    pub mod sphere_tree {
        pub use crate::sphere_tree::*;
    }

    // Utilities sub-module
    pub mod utils {
        pub use crate::utils::*;
    }
}

// Re-export math library at crate root
pub use glam;
