//! The input a level is read from.

use crate::error::SourceError;
use crate::section::{Background, Boxes, Goals, Labels, Lava, Platforms, Player, Regions};

/// An acquired level input yielding sections in file order.
///
/// A source is itself a resource: [`Level::load`](crate::Level::load)
/// registers it first so that a failure part-way through closes it, and
/// releases it once every section has been read.
///
/// Read order is fixed: background, player, platforms, goals, lava,
/// platforms again (back platforms), boxes, labels, regions.
pub trait LevelSource {
    /// Read the background layer.
    fn background(&mut self) -> Result<Background, SourceError>;
    /// Read the player body.
    fn player(&mut self) -> Result<Player, SourceError>;
    /// Read a platform set. Called twice per level: front, then back.
    fn platforms(&mut self) -> Result<Platforms, SourceError>;
    /// Read the goal markers.
    fn goals(&mut self) -> Result<Goals, SourceError>;
    /// Read the lava pools.
    fn lava(&mut self) -> Result<Lava, SourceError>;
    /// Read the boxes.
    fn boxes(&mut self) -> Result<Boxes, SourceError>;
    /// Read the labels.
    fn labels(&mut self) -> Result<Labels, SourceError>;
    /// Read the script regions.
    fn regions(&mut self) -> Result<Regions, SourceError>;

    /// Release whatever the source holds open. Runs exactly once.
    fn close(self)
    where
        Self: Sized,
    {
    }
}
