//! Scoped resource ownership ledger.
//!
//! A [`Ledger`] tracks resources whose construction happens in several
//! fallible steps and whose teardown must run in exact reverse order of
//! acquisition. Each resource is registered together with the destructor
//! that releases it; the returned [`Tracked`] token addresses the slot
//! from then on.
//!
//! # Architecture
//!
//! ```text
//! Ledger (orchestrator, one per owning object or construction scope)
//! ├── LedgerId (unique per instance, stamped into every token)
//! └── SmallVec<[Slot; 16]> (registration order, doubles when full)
//!     └── Slot → Box<dyn Binding> (resource + FnMut destructor) | tombstone
//! ```
//!
//! # Slot operations
//!
//! - **reset:** swap the resource, hand the old one back undestroyed.
//! - **replace:** destroy the old resource now, keep the slot position.
//! - **release:** give the resource back to the caller; the slot becomes a
//!   tombstone skipped on teardown.
//!
//! # Unwinding
//!
//! Teardown walks slots last to first. It happens once, either through
//! [`Ledger::destroy_all`] or when the ledger is dropped, so `?` on a
//! half-built construction path unwinds everything registered so far.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod ledger;
pub mod slot;
pub mod token;

// Public re-exports for the primary API surface.
pub use config::{ConfigError, LedgerConfig};
pub use error::{LedgerError, RegisterError, Untracked};
pub use ledger::Ledger;
pub use slot::{Slot, SlotState};
pub use token::{LedgerId, Tracked};
