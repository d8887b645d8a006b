//! Single resource/destructor bindings.
//!
//! A [`Slot`] owns one resource together with the destructor that releases
//! it. The binding is type-erased so one ledger can hold resources of any
//! type; typed access goes through a downcast that the [`Tracked`] token
//! guarantees will succeed.
//!
//! [`Tracked`]: crate::Tracked

use std::any::Any;
use std::fmt;
use std::mem;

use crate::error::Untracked;

/// Lifecycle state of a [`Slot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// The slot owns its resource and will destroy it on teardown.
    Active,
    /// The resource was handed back to the caller. The slot is a tombstone
    /// kept only for positional stability.
    Released,
}

/// Object-safe view of a [`Bound<T>`].
trait Binding {
    /// Run the destructor on the resource.
    fn destroy(self: Box<Self>);
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
    fn type_name(&self) -> &'static str;
}

/// A resource and its destructor. Both are set together and never apart.
struct Bound<T> {
    resource: T,
    destroy: Box<dyn FnMut(T)>,
}

impl<T: 'static> Binding for Bound<T> {
    fn destroy(self: Box<Self>) {
        let Bound {
            resource,
            mut destroy,
        } = *self;
        destroy(resource);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// One tracked binding between a resource and its destructor.
///
/// Dropping an active slot runs its destructor, exactly like calling
/// [`destroy`](Self::destroy). A released slot drops silently.
pub struct Slot {
    /// `None` once released.
    binding: Option<Box<dyn Binding>>,
}

impl Slot {
    /// Bind `resource` to `destroy`, producing an active slot.
    pub fn new<T, D>(resource: T, destroy: D) -> Self
    where
        T: 'static,
        D: FnMut(T) + 'static,
    {
        Self {
            binding: Some(Box::new(Bound {
                resource,
                destroy: Box::new(destroy),
            })),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SlotState {
        if self.binding.is_some() {
            SlotState::Active
        } else {
            SlotState::Released
        }
    }

    /// Whether the slot still owns its resource.
    pub fn is_active(&self) -> bool {
        self.binding.is_some()
    }

    /// Whether the slot is active and bound to a resource of type `T`.
    pub fn contains<T: 'static>(&self) -> bool {
        self.binding
            .as_ref()
            .is_some_and(|b| b.as_any().is::<Bound<T>>())
    }

    /// Type name of the bound resource, if active.
    pub fn type_name(&self) -> Option<&'static str> {
        self.binding.as_ref().map(|b| b.type_name())
    }

    /// Shared access to the resource.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        let bound = self.binding.as_ref()?.as_any().downcast_ref::<Bound<T>>()?;
        Some(&bound.resource)
    }

    /// Mutable access to the resource.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        Some(&mut self.bound_mut::<T>()?.resource)
    }

    fn bound_mut<T: 'static>(&mut self) -> Option<&mut Bound<T>> {
        self.binding
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<Bound<T>>()
    }

    /// Rebind to `new` without destroying the current resource.
    ///
    /// The old resource is returned to the caller, who now owns it. The
    /// destructor stays with the slot and will run on `new`.
    pub fn reset<T: 'static>(&mut self, new: T) -> Result<T, Untracked<T>> {
        match self.bound_mut::<T>() {
            Some(bound) => Ok(mem::replace(&mut bound.resource, new)),
            None => Err(Untracked(new)),
        }
    }

    /// Destroy the current resource with the slot's destructor, then bind
    /// `new` in its place.
    pub fn replace<T: 'static>(&mut self, new: T) -> Result<(), Untracked<T>> {
        match self.bound_mut::<T>() {
            Some(bound) => {
                let old = mem::replace(&mut bound.resource, new);
                (bound.destroy)(old);
                Ok(())
            }
            None => Err(Untracked(new)),
        }
    }

    /// Hand the resource back to the caller and turn the slot into a
    /// tombstone. The destructor is dropped without running.
    ///
    /// Returns `None` if the slot is already released or holds another type.
    pub fn release<T: 'static>(&mut self) -> Option<T> {
        if !self.contains::<T>() {
            return None;
        }
        let binding = self.binding.take()?;
        // Type checked by `contains` above.
        let bound = binding.into_any().downcast::<Bound<T>>().ok()?;
        Some(bound.resource)
    }

    /// Destroy the resource if the slot is still active.
    ///
    /// Consumes the slot, so it can never be destroyed twice. Returns
    /// whether a destructor ran.
    pub fn destroy(mut self) -> bool {
        self.destroy_in_place()
    }

    fn destroy_in_place(&mut self) -> bool {
        match self.binding.take() {
            Some(binding) => {
                binding.destroy();
                true
            }
            None => false,
        }
    }
}

impl Drop for Slot {
    fn drop(&mut self) {
        self.destroy_in_place();
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("state", &self.state())
            .field("resource", &self.type_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<i32>>>, impl FnMut(i32) + 'static) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        (log, move |v| sink.borrow_mut().push(v))
    }

    #[test]
    fn new_slot_is_active() {
        let (_, d) = recorder();
        let slot = Slot::new(1, d);
        assert_eq!(slot.state(), SlotState::Active);
        assert!(slot.contains::<i32>());
        assert!(!slot.contains::<u32>());
        assert_eq!(slot.get::<i32>(), Some(&1));
    }

    #[test]
    fn destroy_runs_destructor_once() {
        let (log, d) = recorder();
        let slot = Slot::new(7, d);
        assert!(slot.destroy());
        assert_eq!(*log.borrow(), vec![7]);
    }

    #[test]
    fn drop_runs_destructor() {
        let (log, d) = recorder();
        drop(Slot::new(3, d));
        assert_eq!(*log.borrow(), vec![3]);
    }

    #[test]
    fn reset_returns_old_without_destroying() {
        let (log, d) = recorder();
        let mut slot = Slot::new(1, d);
        assert_eq!(slot.reset(2), Ok(1));
        assert!(log.borrow().is_empty());
        slot.destroy();
        assert_eq!(*log.borrow(), vec![2]);
    }

    #[test]
    fn replace_destroys_old_immediately() {
        let (log, d) = recorder();
        let mut slot = Slot::new(1, d);
        assert_eq!(slot.replace(2), Ok(()));
        assert_eq!(*log.borrow(), vec![1]);
        slot.destroy();
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn release_tombstones_and_skips_destructor() {
        let (log, d) = recorder();
        let mut slot = Slot::new(5, d);
        assert_eq!(slot.release::<i32>(), Some(5));
        assert_eq!(slot.state(), SlotState::Released);
        assert!(!slot.contains::<i32>());
        assert!(!slot.destroy());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn released_slot_rejects_rebinding() {
        let (_, d) = recorder();
        let mut slot = Slot::new(5, d);
        let _ = slot.release::<i32>();
        assert_eq!(slot.release::<i32>(), None);
        assert_eq!(slot.reset(6), Err(Untracked(6)));
        assert_eq!(slot.replace(6), Err(Untracked(6)));
    }

    #[test]
    fn wrong_type_is_not_found() {
        let (log, d) = recorder();
        let mut slot = Slot::new(5, d);
        assert_eq!(slot.release::<u64>(), None);
        assert!(slot.is_active());
        drop(slot);
        assert_eq!(*log.borrow(), vec![5]);
    }

    #[test]
    fn debug_shows_state_and_type() {
        let slot = Slot::new(String::from("x"), drop);
        let text = format!("{slot:?}");
        assert!(text.contains("Active"), "{text}");
        assert!(text.contains("String"), "{text}");
    }
}
