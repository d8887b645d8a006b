//! Ledger configuration parameters.

use std::fmt;

/// Configuration for a [`Ledger`](crate::Ledger).
///
/// Controls the initial slot storage and the hard slot bound. Validated
/// at construction; all values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Number of slots reserved when the ledger is created.
    ///
    /// Default: 16. Storage doubles from here whenever it fills up.
    /// Must be at least 1.
    pub initial_capacity: usize,

    /// Maximum number of slots (active plus released) the ledger may hold.
    ///
    /// Default: `usize::MAX`, i.e. bounded only by the allocator. A lower
    /// bound turns exhaustion into a deterministic
    /// [`LedgerError::CapacityExceeded`](crate::LedgerError::CapacityExceeded).
    /// Must be at least `initial_capacity`.
    pub max_slots: usize,
}

impl LedgerConfig {
    /// Default number of slots reserved up front.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Default slot bound.
    pub const DEFAULT_MAX_SLOTS: usize = usize::MAX;

    /// Create a config with the given initial capacity and no slot bound.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_slots: Self::DEFAULT_MAX_SLOTS,
        }
    }

    /// Builder-style setter for [`max_slots`](Self::max_slots).
    pub fn with_max_slots(mut self, max_slots: usize) -> Self {
        self.max_slots = max_slots;
        self
    }

    /// Check the structural invariants of this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_capacity == 0 {
            return Err(ConfigError::ZeroInitialCapacity);
        }
        if self.max_slots < self.initial_capacity {
            return Err(ConfigError::MaxBelowInitial {
                initial_capacity: self.initial_capacity,
                max_slots: self.max_slots,
            });
        }
        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

/// Errors from [`LedgerConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `initial_capacity` was zero.
    ZeroInitialCapacity,
    /// `max_slots` is smaller than `initial_capacity`.
    MaxBelowInitial {
        /// The configured initial capacity.
        initial_capacity: usize,
        /// The configured slot bound.
        max_slots: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroInitialCapacity => write!(f, "initial capacity must be at least 1"),
            Self::MaxBelowInitial {
                initial_capacity,
                max_slots,
            } => write!(
                f,
                "max_slots ({max_slots}) is below initial_capacity ({initial_capacity})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reserves_sixteen_slots() {
        let config = LedgerConfig::default();
        assert_eq!(config.initial_capacity, 16);
        assert_eq!(config.max_slots, usize::MAX);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_initial_capacity_rejected() {
        assert_eq!(
            LedgerConfig::new(0).validate(),
            Err(ConfigError::ZeroInitialCapacity)
        );
    }

    #[test]
    fn max_below_initial_rejected() {
        let config = LedgerConfig::new(8).with_max_slots(4);
        match config.validate() {
            Err(ConfigError::MaxBelowInitial {
                initial_capacity: 8,
                max_slots: 4,
            }) => {}
            other => panic!("expected MaxBelowInitial, got {other:?}"),
        }
    }
}
