//! Ledger error types.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;

/// Errors that can occur while growing a ledger.
///
/// Every failing operation leaves the ledger exactly as it was before the
/// call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerError {
    /// The allocator refused to grow the slot storage.
    AllocationFailed {
        /// Slot count the storage was being grown to.
        requested: usize,
    },
    /// The configured slot bound has been reached.
    CapacityExceeded {
        /// The configured `max_slots`.
        capacity: usize,
    },
    /// The ledger config failed validation.
    Config(ConfigError),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailed { requested } => {
                write!(f, "slot storage allocation failed: requested {requested} slots")
            }
            Self::CapacityExceeded { capacity } => {
                write!(f, "ledger capacity exceeded: {capacity} slots")
            }
            Self::Config(e) => write!(f, "invalid ledger config: {e}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for LedgerError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// A failed registration.
///
/// The ledger never takes partial ownership: the resource is handed back
/// untouched and its destructor has not run. Converting into
/// [`LedgerError`] (e.g. through `?`) drops the resource normally.
pub struct RegisterError<T> {
    error: LedgerError,
    resource: T,
}

impl<T> RegisterError<T> {
    pub(crate) fn new(error: LedgerError, resource: T) -> Self {
        Self { error, resource }
    }

    /// The reason the registration failed.
    pub fn error(&self) -> &LedgerError {
        &self.error
    }

    /// Take the rejected resource back.
    pub fn into_resource(self) -> T {
        self.resource
    }

    /// Split into the error and the rejected resource.
    pub fn into_parts(self) -> (LedgerError, T) {
        (self.error, self.resource)
    }
}

impl<T> fmt::Debug for RegisterError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterError")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for RegisterError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "registration rejected: {}", self.error)
    }
}

impl<T> Error for RegisterError<T> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

impl<T> From<RegisterError<T>> for LedgerError {
    fn from(e: RegisterError<T>) -> Self {
        e.error
    }
}

/// A token that no longer names a live slot.
///
/// Returned by [`Ledger::reset`](crate::Ledger::reset) and
/// [`Ledger::replace`](crate::Ledger::replace) when the slot was already
/// released. The value the caller offered is handed back unchanged.
///
/// This is a compatibility fallback rather than an error: a caller that
/// rebinds a resource it gave away keeps ownership of the new one.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Untracked<T>(pub T);

impl<T> Untracked<T> {
    /// Take the offered value back.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Untracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Untracked(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_error_hands_resource_back() {
        let err = RegisterError::new(LedgerError::CapacityExceeded { capacity: 4 }, vec![1, 2]);
        assert_eq!(err.error(), &LedgerError::CapacityExceeded { capacity: 4 });
        assert_eq!(err.into_resource(), vec![1, 2]);
    }

    #[test]
    fn register_error_converts_to_ledger_error() {
        let err = RegisterError::new(LedgerError::AllocationFailed { requested: 32 }, 7u8);
        let ledger_err: LedgerError = err.into();
        assert_eq!(ledger_err, LedgerError::AllocationFailed { requested: 32 });
    }

    #[test]
    fn display_names_the_bound() {
        let msg = LedgerError::CapacityExceeded { capacity: 3 }.to_string();
        assert!(msg.contains('3'), "{msg}");
    }

    #[test]
    fn config_error_is_the_source() {
        let err = LedgerError::from(ConfigError::ZeroInitialCapacity);
        assert!(err.source().is_some());
    }
}
