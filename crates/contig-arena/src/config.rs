//! Arena configuration parameters.

use crate::error::ConfigError;

/// Configuration for an [`MdArena`](crate::MdArena).
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Maximum number of concurrently live rank 2..=4 arrays.
    ///
    /// Default: 150. Rank-1 arrays never occupy a registry slot. Freed
    /// slots are reused, so this bounds live arrays, not arrays ever made.
    pub registry_capacity: usize,
}

impl ArenaConfig {
    /// Default registry capacity.
    pub const DEFAULT_REGISTRY_CAPACITY: usize = 150;

    /// Create a config with the given registry capacity.
    pub fn new(registry_capacity: usize) -> Self {
        Self { registry_capacity }
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.registry_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if u32::try_from(self.registry_capacity).is_err() {
            return Err(ConfigError::CapacityTooLarge {
                capacity: self.registry_capacity,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_REGISTRY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_150() {
        let config = ArenaConfig::default();
        assert_eq!(config.registry_capacity, 150);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn zero_capacity_rejected() {
        assert_eq!(ArenaConfig::new(0).validate(), Err(ConfigError::ZeroCapacity));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_capacity_rejected() {
        let capacity = u32::MAX as usize + 1;
        assert_eq!(
            ArenaConfig::new(capacity).validate(),
            Err(ConfigError::CapacityTooLarge { capacity })
        );
    }
}
