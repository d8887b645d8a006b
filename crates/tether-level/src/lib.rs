//! Level aggregate built on a tether ledger.
//!
//! A level is a bundle of independently constructed sections (background,
//! player, platforms, ...) read one after another from a [`LevelSource`].
//! Any read can fail. Every section is registered in the level's
//! [`Ledger`](tether_ledger::Ledger) right after it is read, so a failure
//! unwinds exactly what was built, in reverse, and a successful load
//! keeps the ledger as the level's single teardown path.
//!
//! ```text
//! Level
//! └── Ledger
//!     ├── [0] source       (released and closed once loading succeeds)
//!     ├── [1] background
//!     ├── [2] player
//!     ├── [3] platforms
//!     ├── ...
//!     ├── [9] regions
//!     └── [10] physical world
//! ```
//!
//! Rendering, physics and input are not part of this crate; sections are
//! plain data.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod geometry;
pub mod level;
pub mod physics;
pub mod section;
pub mod source;

pub use config::{ConfigError, LevelConfig};
pub use error::{LevelError, SourceError};
pub use geometry::{Color, Point, Rect};
pub use level::Level;
pub use physics::{PhysicalWorld, Solid};
pub use section::{
    Background, Boxes, Goal, Goals, Label, Labels, Lava, Platforms, Player, Region, Regions,
    RigidBox, SectionKind, PLAYER_ID,
};
pub use source::LevelSource;
