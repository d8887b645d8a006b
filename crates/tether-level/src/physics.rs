//! The physical world: the list of solids collision resolution walks.
//!
//! Only the bookkeeping lives here. The world refers to bodies by
//! [`Solid`] reference rather than owning them, so it can be cleaned and
//! re-populated when the sections it points at are replaced.

use smallvec::SmallVec;

use crate::error::LevelError;

/// Reference to a body taking part in collision resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Solid {
    /// The player body.
    Player,
    /// The box at this position in [`Boxes`](crate::Boxes).
    Box(usize),
}

/// Bounded list of solids.
#[derive(Clone, Debug)]
pub struct PhysicalWorld {
    solids: SmallVec<[Solid; 8]>,
    max_solids: usize,
}

impl PhysicalWorld {
    /// Create an empty world that holds at most `max_solids` solids.
    pub fn new(max_solids: usize) -> Self {
        Self {
            solids: SmallVec::new(),
            max_solids,
        }
    }

    /// Add a solid.
    ///
    /// Returns [`LevelError::TooManySolids`] once the bound is reached.
    pub fn add_solid(&mut self, solid: Solid) -> Result<(), LevelError> {
        if self.solids.len() >= self.max_solids {
            return Err(LevelError::TooManySolids {
                capacity: self.max_solids,
            });
        }
        self.solids.push(solid);
        Ok(())
    }

    /// Whether `count` solids fit in an empty world.
    pub fn can_hold(&self, count: usize) -> bool {
        count <= self.max_solids
    }

    /// Remove every solid, keeping the bound.
    pub fn clean(&mut self) {
        self.solids.clear();
    }

    /// Solids in insertion order.
    pub fn solids(&self) -> &[Solid] {
        &self.solids
    }

    /// Number of solids.
    pub fn len(&self) -> usize {
        self.solids.len()
    }

    /// Returns `true` if there are no solids.
    pub fn is_empty(&self) -> bool {
        self.solids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_until_full() {
        let mut world = PhysicalWorld::new(2);
        world.add_solid(Solid::Player).unwrap();
        world.add_solid(Solid::Box(0)).unwrap();
        match world.add_solid(Solid::Box(1)) {
            Err(LevelError::TooManySolids { capacity: 2 }) => {}
            other => panic!("expected TooManySolids, got {other:?}"),
        }
        assert_eq!(world.solids(), &[Solid::Player, Solid::Box(0)]);
    }

    #[test]
    fn clean_empties_but_keeps_bound() {
        let mut world = PhysicalWorld::new(1);
        world.add_solid(Solid::Player).unwrap();
        world.clean();
        assert!(world.is_empty());
        assert!(world.can_hold(1));
        assert!(!world.can_hold(2));
        world.add_solid(Solid::Box(3)).unwrap();
        assert_eq!(world.len(), 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn never_holds_more_than_the_bound(max in 1usize..32, adds in 0usize..64) {
                let mut world = PhysicalWorld::new(max);
                let accepted = (0..adds)
                    .filter(|i| world.add_solid(Solid::Box(*i)).is_ok())
                    .count();
                prop_assert_eq!(accepted, adds.min(max));
                prop_assert_eq!(world.len(), accepted);
                prop_assert_eq!(world.can_hold(adds), adds <= max);
            }
        }
    }
}
