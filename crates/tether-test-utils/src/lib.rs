//! Test utilities for tether development.
//!
//! Provides a [`DropLog`] that records destructor invocations in order,
//! the [`Probe`] resource it hands out, and scripted level sources in
//! [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::cell::RefCell;
use std::rc::Rc;

pub use fixtures::{ScriptedSource, SourceMonitor};

/// Shared, ordered record of destructor invocations.
///
/// Clones share the same record. Hand out [`Probe`]s with
/// [`probe`](DropLog::probe) and register them with [`Probe::destroy`] as
/// the destructor; each destruction appends the probe's name.
#[derive(Clone, Default)]
pub struct DropLog {
    events: Rc<RefCell<Vec<String>>>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A resource that records `name` here when destroyed.
    pub fn probe(&self, name: impl Into<String>) -> Probe {
        Probe {
            name: name.into(),
            log: self.clone(),
        }
    }

    /// A destructor for any `T` that records `name` when it runs.
    pub fn destructor<T: 'static>(&self, name: impl Into<String>) -> impl FnMut(T) + 'static {
        let name = name.into();
        let log = self.clone();
        move |_| log.record(name.clone())
    }

    fn record(&self, name: String) {
        self.events.borrow_mut().push(name);
    }

    /// Names recorded so far, in destruction order.
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    /// How many times `name` was destroyed.
    pub fn count(&self, name: &str) -> usize {
        self.events.borrow().iter().filter(|e| *e == name).count()
    }

    /// Returns `true` if nothing was destroyed yet.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

/// A named resource whose destruction is observable through a [`DropLog`].
///
/// Dropping a probe without calling [`destroy`](Probe::destroy) records
/// nothing, so a leak through a plain drop shows up as a missing event.
pub struct Probe {
    name: String,
    log: DropLog,
}

impl Probe {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Destructor to register alongside the probe.
    pub fn destroy(self) {
        self.log.record(self.name);
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Probe({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probes_record_in_destruction_order() {
        let log = DropLog::new();
        let a = log.probe("a");
        let b = log.probe("b");
        b.destroy();
        a.destroy();
        assert_eq!(log.events(), vec!["b", "a"]);
    }

    #[test]
    fn plain_drop_records_nothing() {
        let log = DropLog::new();
        drop(log.probe("leaked"));
        assert!(log.is_empty());
    }

    #[test]
    fn destructor_counts_each_call() {
        let log = DropLog::new();
        let mut d = log.destructor::<u32>("x");
        d(1);
        d(2);
        assert_eq!(log.count("x"), 2);
        log.clear();
        assert!(log.is_empty());
    }
}
