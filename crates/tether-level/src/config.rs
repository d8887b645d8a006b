//! Level configuration.

use std::fmt;

use tether_ledger::LedgerConfig;

/// Configuration for loading a [`Level`](crate::Level).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelConfig {
    /// Config for the level's own ledger and for the scratch ledgers used
    /// while loading and reloading.
    pub ledger: LedgerConfig,
    /// Bound on the physical world's solid list.
    ///
    /// Default: 1024. Must be at least 1 (the player is always a solid).
    pub max_solids: usize,
}

impl LevelConfig {
    /// Default solid bound.
    pub const DEFAULT_MAX_SOLIDS: usize = 1024;

    /// Check the structural invariants of this config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ledger.validate().map_err(ConfigError::Ledger)?;
        if self.max_solids == 0 {
            return Err(ConfigError::NoSolids);
        }
        Ok(())
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            max_solids: Self::DEFAULT_MAX_SOLIDS,
        }
    }
}

/// Errors from [`LevelConfig::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The ledger config is invalid.
    Ledger(tether_ledger::ConfigError),
    /// `max_solids` is zero.
    NoSolids,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ledger(e) => write!(f, "ledger: {e}"),
            Self::NoSolids => write!(f, "max_solids must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Ledger(e) => Some(e),
            Self::NoSolids => None,
        }
    }
}
