//! Store configuration and mode selection.

use std::fmt;
use std::str::FromStr;

use recstore_core::StoreError;
use thiserror::Error;

/// Compile-time capacity of the fixed-mode store used by config-selected code.
pub const FIXED_CAPACITY: usize = 1000;

/// Storage strategy for a record store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum StoreMode {
    /// Records live in scope-bound storage with a compile-time bound.
    /// Scope exit is the release.
    Fixed,
    /// Records and names are separately heap owned and explicitly released.
    #[default]
    Dynamic,
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => f.pad("fixed"),
            Self::Dynamic => f.pad("dynamic"),
        }
    }
}

impl FromStr for StoreMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" | "classic" => Ok(Self::Fixed),
            "dynamic" | "heap" => Ok(Self::Dynamic),
            _ => Err(ConfigError::UnknownMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Errors detected while validating or applying a [`StoreConfig`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Record count is zero.
    #[error("record count must be greater than zero")]
    ZeroCount,
    /// Fixed mode was asked for more records than its compile-time bound.
    #[error("fixed mode holds at most {capacity} records, {requested} requested")]
    FixedCapacityExceeded {
        /// Records requested.
        requested: usize,
        /// The fixed-mode bound.
        capacity: usize,
    },
    /// The mode name was not recognised.
    #[error("unknown store mode '{value}'")]
    UnknownMode {
        /// The rejected input.
        value: String,
    },
    /// Building the configured store failed.
    #[error("store: {0}")]
    Store(#[from] StoreError),
}

/// Configuration for a config-selected record store.
///
/// Validated before any allocation is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    /// Storage strategy.
    pub mode: StoreMode,
    /// Number of records to create.
    pub count: usize,
}

impl StoreConfig {
    /// Default record count used by the reference scenarios.
    pub const DEFAULT_COUNT: usize = 1000;

    /// Create a config for `count` records in `mode`.
    pub fn new(mode: StoreMode, count: usize) -> Self {
        Self { mode, count }
    }

    /// Check structural invariants without allocating.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount);
        }
        if self.mode == StoreMode::Fixed && self.count > FIXED_CAPACITY {
            return Err(ConfigError::FixedCapacityExceeded {
                requested: self.count,
                capacity: FIXED_CAPACITY,
            });
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(StoreMode::default(), Self::DEFAULT_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = StoreConfig::default();
        assert_eq!(config.mode, StoreMode::Dynamic);
        assert_eq!(config.count, 1000);
        config.validate().unwrap();
    }

    #[test]
    fn zero_count_rejected() {
        let config = StoreConfig::new(StoreMode::Dynamic, 0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCount));
    }

    #[test]
    fn fixed_mode_is_bounded() {
        StoreConfig::new(StoreMode::Fixed, FIXED_CAPACITY)
            .validate()
            .unwrap();
        assert_eq!(
            StoreConfig::new(StoreMode::Fixed, FIXED_CAPACITY + 1).validate(),
            Err(ConfigError::FixedCapacityExceeded {
                requested: FIXED_CAPACITY + 1,
                capacity: FIXED_CAPACITY,
            })
        );
    }

    #[test]
    fn dynamic_mode_is_unbounded() {
        StoreConfig::new(StoreMode::Dynamic, FIXED_CAPACITY * 100)
            .validate()
            .unwrap();
    }

    #[test]
    fn mode_parses_from_str() {
        assert_eq!("fixed".parse::<StoreMode>().unwrap(), StoreMode::Fixed);
        assert_eq!(" Classic ".parse::<StoreMode>().unwrap(), StoreMode::Fixed);
        assert_eq!("DYNAMIC".parse::<StoreMode>().unwrap(), StoreMode::Dynamic);
        assert_eq!("heap".parse::<StoreMode>().unwrap(), StoreMode::Dynamic);
        assert!(matches!(
            "stack".parse::<StoreMode>(),
            Err(ConfigError::UnknownMode { .. })
        ));
    }

    #[test]
    fn mode_display_round_trips() {
        for mode in [StoreMode::Fixed, StoreMode::Dynamic] {
            assert_eq!(mode.to_string().parse::<StoreMode>().unwrap(), mode);
        }
    }
}
