//! Error types for the Galaxy3D sphere tree
//!
//! Structural preconditions (capacity, handle validity, set registration)
//! are reported through this enum instead of aborting the frame.

use std::fmt;

/// Result type for sphere tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Sphere tree errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Construction parameters are unusable (zero capacity, negative padding, ...)
    InvalidConfig(String),

    /// The fixed node pool cannot hold another sphere
    PoolExhausted {
        /// Total node capacity of the pool
        capacity: usize,
    },

    /// A handle does not refer to a live node of this tree
    InvalidHandle(String),

    /// A sphere has a negative or non-finite radius, or a non-finite center
    InvalidBounds(String),

    /// The visibility set was never added to the tree (or was removed)
    UnknownVisibilitySet,

    /// The visibility set is already borrowed elsewhere
    VisibilitySetBusy,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::PoolExhausted { capacity } => {
                write!(f, "Node pool exhausted (capacity {})", capacity)
            }
            Error::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
            Error::InvalidBounds(msg) => write!(f, "Invalid bounds: {}", msg),
            Error::UnknownVisibilitySet => write!(f, "Visibility set is not registered"),
            Error::VisibilitySetBusy => write!(f, "Visibility set is already borrowed"),
        }
    }
}

impl std::error::Error for Error {}

/// Log an error through `engine_error!` and evaluate to it.
///
/// ```ignore
/// return Err(engine_err!("galaxy3d::SphereTree", Error::UnknownVisibilitySet));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $err:expr) => {{
        let err = $err;
        $crate::engine_error!($source, "{}", err);
        err
    }};
}

/// Log a message and return `Err(Error::InvalidHandle(message))` from the
/// enclosing function.
///
/// ```ignore
/// engine_bail!("galaxy3d::SphereTree", "handle {:?} is stale", handle);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        return Err($crate::galaxy3d::Error::InvalidHandle(message));
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
