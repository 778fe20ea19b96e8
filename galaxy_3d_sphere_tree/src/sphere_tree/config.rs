/// Construction parameters for a SphereTree.

use crate::error::{Error, Result};

/// Sizing and tuning of a sphere tree. Fixed for the tree's lifetime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereTreeConfig {
    /// Maximum number of terminal spheres. The node pool reserves
    /// `max_spheres * 2 + 1` slots (terminals, superspheres and the root).
    pub max_spheres: u32,
    /// Largest radius a supersphere may grow to when absorbing a neighbour.
    pub max_leaf_size: f32,
    /// Slack added around children when sizing a supersphere.
    pub padding: f32,
    /// Radius of the root sphere (centered on the origin).
    pub root_radius: f32,
}

impl SphereTreeConfig {
    pub fn new(max_spheres: u32, max_leaf_size: f32, padding: f32) -> Self {
        Self { max_spheres, max_leaf_size, padding, ..Self::default() }
    }

    /// Number of pool slots this configuration needs
    pub fn node_capacity(&self) -> usize {
        self.max_spheres as usize * 2 + 1
    }

    /// Check the configuration for unusable values
    pub fn validate(&self) -> Result<()> {
        if self.max_spheres == 0 {
            return Err(Error::InvalidConfig("max_spheres must be > 0".to_string()));
        }
        if self.max_spheres > u32::MAX / 2 - 1 {
            return Err(Error::InvalidConfig(format!(
                "max_spheres {} exceeds the addressable node range", self.max_spheres
            )));
        }
        if !(self.max_leaf_size.is_finite() && self.max_leaf_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "max_leaf_size must be a positive finite value (got {})", self.max_leaf_size
            )));
        }
        if !(self.padding.is_finite() && self.padding >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "padding must be a non-negative finite value (got {})", self.padding
            )));
        }
        if !(self.root_radius.is_finite() && self.root_radius > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "root_radius must be a positive finite value (got {})", self.root_radius
            )));
        }
        Ok(())
    }
}

impl Default for SphereTreeConfig {
    fn default() -> Self {
        Self {
            max_spheres: 4096,
            max_leaf_size: 32.0,
            padding: 1.0,
            root_radius: 65536.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SphereTreeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_node_capacity() {
        assert_eq!(SphereTreeConfig::new(4, 10.0, 1.0).node_capacity(), 9);
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let config = SphereTreeConfig::new(0, 10.0, 1.0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_sizes() {
        assert!(SphereTreeConfig::new(4, 0.0, 1.0).validate().is_err());
        assert!(SphereTreeConfig::new(4, f32::NAN, 1.0).validate().is_err());
        assert!(SphereTreeConfig::new(4, 10.0, -1.0).validate().is_err());
        let config = SphereTreeConfig { root_radius: 0.0, ..SphereTreeConfig::default() };
        assert!(config.validate().is_err());
    }
}
