//! Ledger identities and slot tokens.
//!
//! A [`Tracked<T>`] names one slot of one ledger. It encodes enough to
//! resolve the slot in O(1) and to reject tokens minted by another ledger.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique [`LedgerId`] allocation.
static LEDGER_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a ledger.
///
/// Two ledgers alive at the same time, or one after the other, never share
/// an id, so a token cannot silently resolve against the wrong ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LedgerId(u64);

impl LedgerId {
    /// Allocate a fresh, unique id.
    pub(crate) fn next() -> Self {
        Self(LEDGER_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LedgerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed token for a resource registered in a ledger.
///
/// Returned by [`Ledger::register`](crate::Ledger::register). The type
/// parameter pins the resource type, so `reset`/`replace`/`release`
/// cannot be called with a value of the wrong type. Tokens are `Copy`;
/// using one after its slot was released is a recoverable not-found, not
/// a fault.
#[must_use]
pub struct Tracked<T> {
    ledger: LedgerId,
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Tracked<T> {
    pub(crate) fn new(ledger: LedgerId, index: u32) -> Self {
        Self {
            ledger,
            index,
            _marker: PhantomData,
        }
    }

    /// The ledger that minted this token.
    pub fn ledger(&self) -> LedgerId {
        self.ledger
    }

    /// Registration position of the slot (0 = first registered).
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

impl<T> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Tracked<T> {}

impl<T> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ledger == other.ledger && self.index == other.index
    }
}

impl<T> Eq for Tracked<T> {}

impl<T> Hash for Tracked<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ledger.hash(state);
        self.index.hash(state);
    }
}

impl<T> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tracked<{}>(ledger={}, slot={})",
            std::any::type_name::<T>(),
            self.ledger,
            self.index
        )
    }
}
