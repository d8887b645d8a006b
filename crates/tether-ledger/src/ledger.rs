//! The ledger: an ordered, growable stack of slots torn down in reverse.
//!
//! Resources are registered as they are acquired. If a later step fails,
//! dropping (or explicitly tearing down) the ledger destroys everything
//! registered so far, last acquired first. On success the owner keeps the
//! ledger for its lifetime, or releases individual resources to a
//! longer-lived owner before discarding it.

use std::fmt;

use smallvec::SmallVec;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, RegisterError, Untracked};
use crate::slot::Slot;
use crate::token::{LedgerId, Tracked};

/// Slots stored inline before the storage spills to the heap.
const INLINE_SLOTS: usize = 16;

/// Ordered collection of resource/destructor bindings.
///
/// Slot order is registration order. Released slots stay in place as
/// tombstones so the relative order of the remaining slots never changes.
///
/// A ledger is single-owner and not thread-safe (destructors are arbitrary
/// closures). Teardown happens exactly once: either through
/// [`destroy_all`](Self::destroy_all), which consumes the ledger, or when
/// the ledger is dropped.
pub struct Ledger {
    id: LedgerId,
    slots: SmallVec<[Slot; INLINE_SLOTS]>,
    /// Logical capacity. Doubles when `slots` fills it.
    capacity: usize,
    max_slots: usize,
}

impl Ledger {
    /// Create an empty ledger with the default config.
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_config(LedgerConfig::default())
    }

    /// Create an empty ledger, reserving `config.initial_capacity` slots.
    ///
    /// Fails without side effects if the config is invalid or the initial
    /// storage cannot be reserved.
    pub fn with_config(config: LedgerConfig) -> Result<Self, LedgerError> {
        config.validate()?;
        let mut slots = SmallVec::new();
        slots
            .try_reserve_exact(config.initial_capacity)
            .map_err(|_| LedgerError::AllocationFailed {
                requested: config.initial_capacity,
            })?;
        Ok(Self {
            id: LedgerId::next(),
            slots,
            capacity: config.initial_capacity,
            max_slots: config.max_slots,
        })
    }

    /// Unique id of this ledger. Every token it mints carries this id.
    pub fn id(&self) -> LedgerId {
        self.id
    }

    /// Number of slots, including released tombstones.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing was ever registered.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Logical slot capacity before the next doubling.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of slots that will run a destructor on teardown.
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// Make room for one more slot, doubling the storage if it is full.
    ///
    /// Returns the index the next slot will occupy. Leaves the ledger
    /// untouched on failure.
    fn reserve_one(&mut self) -> Result<u32, LedgerError> {
        let len = self.slots.len();
        let index = u32::try_from(len).map_err(|_| LedgerError::CapacityExceeded {
            capacity: len,
        })?;
        if len >= self.max_slots {
            return Err(LedgerError::CapacityExceeded {
                capacity: self.max_slots,
            });
        }
        if len < self.capacity {
            return Ok(index);
        }
        let new_capacity = self.capacity.saturating_mul(2).min(self.max_slots);
        self.slots
            .try_reserve_exact(new_capacity - len)
            .map_err(|_| LedgerError::AllocationFailed {
                requested: new_capacity,
            })?;
        self.capacity = new_capacity;
        Ok(index)
    }

    /// Take ownership of `resource`, to be released by `destroy` on teardown.
    ///
    /// On failure the ledger is unchanged and `resource` comes back inside
    /// the error; `destroy` has not run.
    pub fn register<T, D>(
        &mut self,
        resource: T,
        destroy: D,
    ) -> Result<Tracked<T>, RegisterError<T>>
    where
        T: 'static,
        D: FnMut(T) + 'static,
    {
        match self.reserve_one() {
            Ok(index) => {
                self.slots.push(Slot::new(resource, destroy));
                Ok(Tracked::new(self.id, index))
            }
            Err(e) => Err(RegisterError::new(e, resource)),
        }
    }

    /// [`register`](Self::register) for a resource that may be absent.
    ///
    /// `None` is a no-op: the slot count is unchanged and `Ok(None)` is
    /// returned.
    pub fn register_option<T, D>(
        &mut self,
        resource: Option<T>,
        destroy: D,
    ) -> Result<Option<Tracked<T>>, RegisterError<T>>
    where
        T: 'static,
        D: FnMut(T) + 'static,
    {
        match resource {
            Some(resource) => self.register(resource, destroy).map(Some),
            None => Ok(None),
        }
    }

    /// Register the output of a fallible constructor.
    ///
    /// A constructor error passes through without touching the ledger. If
    /// the ledger itself cannot grow, `destroy` runs on the resource before
    /// the error is returned, so nothing leaks.
    pub fn register_result<T, E, D>(
        &mut self,
        resource: Result<T, E>,
        mut destroy: D,
    ) -> Result<Tracked<T>, E>
    where
        T: 'static,
        E: From<LedgerError>,
        D: FnMut(T) + 'static,
    {
        let resource = resource?;
        match self.reserve_one() {
            Ok(index) => {
                self.slots.push(Slot::new(resource, destroy));
                Ok(Tracked::new(self.id, index))
            }
            Err(e) => {
                destroy(resource);
                Err(E::from(e))
            }
        }
    }

    /// Resolve a token to its slot.
    ///
    /// # Panics
    ///
    /// Panics if the token was minted by a different ledger.
    fn slot_mut<T>(&mut self, token: Tracked<T>) -> &mut Slot {
        self.check_owner(&token);
        &mut self.slots[token.index()]
    }

    fn check_owner<T>(&self, token: &Tracked<T>) {
        assert_eq!(
            token.ledger(),
            self.id,
            "token for slot {} belongs to ledger {}, not ledger {}",
            token.index(),
            token.ledger(),
            self.id,
        );
    }

    /// Whether the token's slot is still active.
    ///
    /// # Panics
    ///
    /// Panics if the token was minted by a different ledger.
    pub fn is_tracked<T: 'static>(&self, token: Tracked<T>) -> bool {
        self.check_owner(&token);
        self.slots[token.index()].contains::<T>()
    }

    /// Shared access to a tracked resource. `None` once released.
    ///
    /// # Panics
    ///
    /// Panics if the token was minted by a different ledger.
    pub fn get<T: 'static>(&self, token: Tracked<T>) -> Option<&T> {
        self.check_owner(&token);
        self.slots[token.index()].get::<T>()
    }

    /// Mutable access to a tracked resource. `None` once released.
    ///
    /// # Panics
    ///
    /// Panics if the token was minted by a different ledger.
    pub fn get_mut<T: 'static>(&mut self, token: Tracked<T>) -> Option<&mut T> {
        self.slot_mut(token).get_mut::<T>()
    }

    /// Swap the tracked resource for `new` without destroying the old one.
    ///
    /// The old resource is returned to the caller. `new` inherits the
    /// slot's destructor and position. If the slot was already released,
    /// `new` is handed back in [`Untracked`].
    ///
    /// # Panics
    ///
    /// Panics if the token was minted by a different ledger.
    pub fn reset<T: 'static>(&mut self, token: Tracked<T>, new: T) -> Result<T, Untracked<T>> {
        self.slot_mut(token).reset(new)
    }

    /// Destroy the tracked resource now and bind `new` in its place.
    ///
    /// `new` inherits the slot's destructor and position. If the slot was
    /// already released nothing is destroyed and `new` is handed back in
    /// [`Untracked`].
    ///
    /// # Panics
    ///
    /// Panics if the token was minted by a different ledger.
    pub fn replace<T: 'static>(&mut self, token: Tracked<T>, new: T) -> Result<(), Untracked<T>> {
        self.slot_mut(token).replace(new)
    }

    /// Take a resource back out of the ledger's ownership.
    ///
    /// The slot becomes a tombstone: it keeps its position and is skipped
    /// on teardown. Returns `None` if it was already released, so a
    /// second release is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the token was minted by a different ledger.
    pub fn release<T: 'static>(&mut self, token: Tracked<T>) -> Option<T> {
        self.slot_mut(token).release::<T>()
    }

    /// Destroy every active slot, last registered first.
    ///
    /// Returns how many destructors ran. Dropping the ledger does the same
    /// thing; this form reports the count and makes the unwind explicit.
    pub fn destroy_all(mut self) -> usize {
        self.teardown()
    }

    fn teardown(&mut self) -> usize {
        let total = self.slots.len();
        let mut destroyed = 0;
        let unwind = Unwind(&mut self.slots);
        while let Some(slot) = unwind.0.pop() {
            if slot.destroy() {
                destroyed += 1;
            }
        }
        drop(unwind);
        if total > 0 {
            tracing::trace!(ledger = %self.id, slots = total, destroyed, "ledger torn down");
        }
        destroyed
    }
}

/// Pops the remaining slots last to first when dropped.
///
/// If a destructor panics mid-teardown, the guard keeps the reverse order
/// for the slots below it instead of leaving them to the storage's own
/// front-to-back drop.
struct Unwind<'a>(&'a mut SmallVec<[Slot; INLINE_SLOTS]>);

impl Drop for Unwind<'_> {
    fn drop(&mut self) {
        while let Some(slot) = self.0.pop() {
            slot.destroy();
        }
    }
}

impl Drop for Ledger {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("id", &self.id)
            .field("len", &self.slots.len())
            .field("active", &self.active_count())
            .field("capacity", &self.capacity)
            .finish()
    }
}
