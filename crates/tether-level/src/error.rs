//! Level error types.

use std::error::Error;
use std::fmt;

use tether_ledger::{LedgerError, RegisterError};

use crate::config::ConfigError;
use crate::section::SectionKind;

/// A level source could not produce a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceError {
    /// What went wrong.
    pub reason: String,
}

impl SourceError {
    /// Create a source error.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl Error for SourceError {}

/// Errors from loading or reloading a level.
///
/// Whatever was acquired before the error has already been destroyed when
/// the caller sees it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelError {
    /// The source failed to produce a section.
    Source {
        /// The section being read.
        section: SectionKind,
        /// The source's error.
        reason: SourceError,
    },
    /// The level's ledger could not grow.
    Ledger(LedgerError),
    /// The physical world is full.
    TooManySolids {
        /// The configured `max_solids`.
        capacity: usize,
    },
    /// The level config failed validation.
    Config(ConfigError),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source { section, reason } => {
                write!(f, "could not read {section}: {reason}")
            }
            Self::Ledger(e) => write!(f, "ledger error: {e}"),
            Self::TooManySolids { capacity } => {
                write!(f, "physical world full: at most {capacity} solids")
            }
            Self::Config(e) => write!(f, "invalid level config: {e}"),
        }
    }
}

impl Error for LevelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source { reason, .. } => Some(reason),
            Self::Ledger(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::TooManySolids { .. } => None,
        }
    }
}

impl From<LedgerError> for LevelError {
    fn from(e: LedgerError) -> Self {
        Self::Ledger(e)
    }
}

impl<T> From<RegisterError<T>> for LevelError {
    fn from(e: RegisterError<T>) -> Self {
        Self::Ledger(e.into())
    }
}

impl From<ConfigError> for LevelError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_error_names_section() {
        let err = LevelError::Source {
            section: SectionKind::Lava,
            reason: SourceError::new("unexpected end of input"),
        };
        assert_eq!(err.to_string(), "could not read lava: unexpected end of input");
        assert!(err.source().is_some());
    }

    #[test]
    fn ledger_errors_convert() {
        let err: LevelError = LedgerError::CapacityExceeded { capacity: 4 }.into();
        assert_eq!(err, LevelError::Ledger(LedgerError::CapacityExceeded { capacity: 4 }));
    }
}
