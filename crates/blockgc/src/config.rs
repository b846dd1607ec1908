//! Engine configuration.

use crate::error::ConfigError;
use crate::pool::DEFAULT_TOTAL_BLOCKS;

/// Young objects older than this many collections move to Middle.
pub const DEFAULT_YOUNG_PROMOTION_AGE: u64 = 1;

/// Middle objects older than this many collections move to Old.
pub const DEFAULT_MIDDLE_PROMOTION_AGE: u64 = 2;

/// Configuration for an [`Engine`](crate::Engine).
///
/// An object's *age* at a collection is the number of collections since the
/// last one that examined it. A survivor is promoted when its age is strictly
/// greater than the promotion age of its generation.
///
/// # Example
///
/// ```
/// use blockgc::{Engine, EngineConfig};
///
/// let config = EngineConfig::new().total_blocks(16);
/// let engine: Engine<&str> = Engine::with_config(config).unwrap();
/// assert_eq!(engine.stats().total_blocks, 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of blocks in the pool.
    pub total_blocks: usize,
    /// Promotion age threshold for Young objects.
    pub young_promotion_age: u64,
    /// Promotion age threshold for Middle objects.
    pub middle_promotion_age: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            total_blocks: DEFAULT_TOTAL_BLOCKS,
            young_promotion_age: DEFAULT_YOUNG_PROMOTION_AGE,
            middle_promotion_age: DEFAULT_MIDDLE_PROMOTION_AGE,
        }
    }
}

impl EngineConfig {
    /// Default configuration: 256 blocks, promotion ages 1 and 2.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of blocks in the pool.
    #[must_use]
    pub const fn total_blocks(mut self, total_blocks: usize) -> Self {
        self.total_blocks = total_blocks;
        self
    }

    /// Sets the Young to Middle promotion age.
    #[must_use]
    pub const fn young_promotion_age(mut self, age: u64) -> Self {
        self.young_promotion_age = age;
        self
    }

    /// Sets the Middle to Old promotion age.
    #[must_use]
    pub const fn middle_promotion_age(mut self, age: u64) -> Self {
        self.middle_promotion_age = age;
        self
    }

    /// Check the configuration for values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroCapacity`] for an empty pool and
    /// [`ConfigError::InvalidPromotionAge`] when Middle objects would promote
    /// sooner than Young ones.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.total_blocks == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.middle_promotion_age < self.young_promotion_age {
            return Err(ConfigError::InvalidPromotionAge {
                young: self.young_promotion_age,
                middle: self.middle_promotion_age,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.total_blocks, 256);
        assert_eq!(config.young_promotion_age, 1);
        assert_eq!(config.middle_promotion_age, 2);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = EngineConfig::new().total_blocks(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_inverted_promotion_ages_rejected() {
        let config = EngineConfig::new()
            .young_promotion_age(4)
            .middle_promotion_age(3);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPromotionAge {
                young: 4,
                middle: 3
            })
        );
    }
}
