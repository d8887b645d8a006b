//! Tether: scoped resource ownership with reverse-order teardown.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the tether sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use tether::prelude::*;
//!
//! let order = Rc::new(RefCell::new(Vec::new()));
//! let log = |name: &'static str| {
//!     let order = Rc::clone(&order);
//!     move |_: String| order.borrow_mut().push(name)
//! };
//!
//! let mut ledger = Ledger::new().unwrap();
//! let window = ledger.register(String::from("window"), log("window")).unwrap();
//! let _font = ledger.register(String::from("font"), log("font")).unwrap();
//!
//! // Hand the window to a longer-lived owner; the ledger forgets it.
//! let window = ledger.release(window).unwrap();
//! assert_eq!(window, "window");
//!
//! assert_eq!(ledger.destroy_all(), 1);
//! assert_eq!(*order.borrow(), vec!["font"]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`ledger`] | `tether-ledger` | `Ledger`, `Slot`, `Tracked` tokens, errors |
//! | [`level`] | `tether-level` | Level aggregate loaded section by section |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Ownership ledger, slots and tokens (`tether-ledger`).
///
/// [`ledger::Ledger`] owns registered resources and destroys them in
/// reverse registration order; [`ledger::Tracked`] tokens address slots.
pub use tether_ledger as ledger;

/// Level aggregate (`tether-level`).
///
/// [`level::Level`] loads its sections from a [`level::LevelSource`] and
/// keeps them in a ledger so a failed load unwinds what was built.
pub use tether_level as level;

/// Common imports for typical tether usage.
///
/// ```rust
/// use tether::prelude::*;
/// ```
pub mod prelude {
    // Ledger
    pub use tether_ledger::{Ledger, LedgerConfig, Slot, SlotState, Tracked};

    // Errors
    pub use tether_ledger::{LedgerError, RegisterError, Untracked};

    // Level
    pub use tether_level::{Level, LevelConfig, LevelError, LevelSource, SourceError};
}
