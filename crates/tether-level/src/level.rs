//! The level aggregate.
//!
//! A [`Level`] owns one ledger holding every section it was built from.
//! Loading registers each section the moment it is read, so a failure at
//! any step unwinds the sections read so far (and closes the source) in
//! reverse order. Reloading builds the new sections in a scratch ledger
//! and only swaps them into the level once all of them were read.

use tether_ledger::{Ledger, Tracked};

use crate::config::LevelConfig;
use crate::error::{LevelError, SourceError};
use crate::geometry::Rect;
use crate::physics::{PhysicalWorld, Solid};
use crate::section::{
    retire, Background, Boxes, Goals, Labels, Lava, Platforms, Player, Regions, SectionKind,
    PLAYER_ID,
};
use crate::source::LevelSource;

/// A loaded level and the ledger that owns its sections.
pub struct Level {
    ledger: Ledger,
    config: LevelConfig,
    background: Tracked<Background>,
    player: Tracked<Player>,
    platforms: Tracked<Platforms>,
    goals: Tracked<Goals>,
    lava: Tracked<Lava>,
    back_platforms: Tracked<Platforms>,
    boxes: Tracked<Boxes>,
    labels: Tracked<Labels>,
    regions: Tracked<Regions>,
    physical_world: Tracked<PhysicalWorld>,
}

fn source_mut<S: 'static>(ledger: &mut Ledger, source: Tracked<S>) -> &mut S {
    ledger
        .get_mut(source)
        .expect("source stays registered until every section is read")
}

/// Read one section from the registered source and register it.
fn read_section<S, T, F>(
    ledger: &mut Ledger,
    source: Tracked<S>,
    kind: SectionKind,
    read: F,
) -> Result<Tracked<T>, LevelError>
where
    S: 'static,
    T: 'static,
    F: FnOnce(&mut S) -> Result<T, SourceError>,
{
    let section = read(source_mut(ledger, source))
        .map_err(|reason| LevelError::Source {
            section: kind,
            reason,
        })?;
    tracing::trace!(section = %kind, "section read");
    ledger.register_result(Ok::<T, LevelError>(section), retire::<T>(kind))
}

/// Put the player and every box into an empty physical world.
fn populate_world(
    ledger: &mut Ledger,
    world: Tracked<PhysicalWorld>,
    boxes: Tracked<Boxes>,
) -> Result<(), LevelError> {
    let box_count = ledger.get(boxes).map_or(0, Boxes::len);
    let world = ledger
        .get_mut(world)
        .expect("physical world stays registered for the level's lifetime");
    world.add_solid(Solid::Player)?;
    for index in 0..box_count {
        world.add_solid(Solid::Box(index))?;
    }
    Ok(())
}

/// Move a freshly read section out of `scratch` and into the level's slot,
/// destroying the section it supersedes.
fn swap_in<T: 'static>(
    ledger: &mut Ledger,
    scratch: &mut Ledger,
    fresh: Tracked<T>,
    slot: Tracked<T>,
    kind: SectionKind,
) {
    let Some(section) = scratch.release(fresh) else {
        return;
    };
    if let Err(orphan) = ledger.replace(slot, section) {
        retire::<T>(kind)(orphan.into_inner());
    }
}

impl Level {
    /// Read a level from `source`.
    ///
    /// The source is registered first, then every section in read order,
    /// then the physical world. On success the source is released from
    /// the ledger and closed; the level keeps the ledger. On failure
    /// everything acquired so far is destroyed in reverse order before the
    /// error is returned.
    pub fn load<S>(source: S, config: LevelConfig) -> Result<Self, LevelError>
    where
        S: LevelSource + 'static,
    {
        config.validate()?;
        let mut ledger = Ledger::with_config(config.ledger.clone())?;
        let stream = ledger.register_result(Ok::<S, LevelError>(source), S::close)?;

        let background = read_section(&mut ledger, stream, SectionKind::Background, S::background)?;
        let player = read_section(&mut ledger, stream, SectionKind::Player, S::player)?;
        let platforms = read_section(&mut ledger, stream, SectionKind::Platforms, S::platforms)?;
        let goals = read_section(&mut ledger, stream, SectionKind::Goals, S::goals)?;
        let lava = read_section(&mut ledger, stream, SectionKind::Lava, S::lava)?;
        let back_platforms =
            read_section(&mut ledger, stream, SectionKind::BackPlatforms, S::platforms)?;
        let boxes = read_section(&mut ledger, stream, SectionKind::Boxes, S::boxes)?;
        let labels = read_section(&mut ledger, stream, SectionKind::Labels, S::labels)?;
        let regions = read_section(&mut ledger, stream, SectionKind::Regions, S::regions)?;

        let physical_world = ledger.register_result(
            Ok::<_, LevelError>(PhysicalWorld::new(config.max_solids)),
            retire::<PhysicalWorld>(SectionKind::PhysicalWorld),
        )?;
        populate_world(&mut ledger, physical_world, boxes)?;

        if let Some(source) = ledger.release(stream) {
            source.close();
        }
        tracing::debug!(
            ledger = %ledger.id(),
            sections = ledger.active_count(),
            "level loaded"
        );

        Ok(Self {
            ledger,
            config,
            background,
            player,
            platforms,
            goals,
            lava,
            back_platforms,
            boxes,
            labels,
            regions,
            physical_world,
        })
    }

    /// Re-read the level from `source`, keeping the player.
    ///
    /// Sections are read from background through labels into a scratch
    /// ledger first. If any read fails, the scratch ledger unwinds and the
    /// level is left exactly as it was. Otherwise each new section replaces
    /// its predecessor in place (the old one is destroyed, the slot keeps
    /// its position and destructor) and the physical world is rebuilt.
    ///
    /// The player section is read to keep the source in step, then
    /// discarded. Regions are not read: the source is closed after labels
    /// and the level keeps its current regions.
    pub fn reload_preserve_player<S>(&mut self, source: S) -> Result<(), LevelError>
    where
        S: LevelSource + 'static,
    {
        let mut scratch = Ledger::with_config(self.config.ledger.clone())?;
        let stream = scratch.register_result(Ok::<S, LevelError>(source), S::close)?;

        let background = read_section(&mut scratch, stream, SectionKind::Background, S::background)?;
        let skipped = source_mut(&mut scratch, stream)
            .player()
            .map_err(|reason| LevelError::Source {
                section: SectionKind::Player,
                reason,
            })?;
        retire::<Player>(SectionKind::Player)(skipped);
        let platforms = read_section(&mut scratch, stream, SectionKind::Platforms, S::platforms)?;
        let goals = read_section(&mut scratch, stream, SectionKind::Goals, S::goals)?;
        let lava = read_section(&mut scratch, stream, SectionKind::Lava, S::lava)?;
        let back_platforms =
            read_section(&mut scratch, stream, SectionKind::BackPlatforms, S::platforms)?;
        let boxes = read_section(&mut scratch, stream, SectionKind::Boxes, S::boxes)?;
        let labels = read_section(&mut scratch, stream, SectionKind::Labels, S::labels)?;

        let solids = 1 + scratch.get(boxes).map_or(0, Boxes::len);
        if !self.physical_world().can_hold(solids) {
            return Err(LevelError::TooManySolids {
                capacity: self.config.max_solids,
            });
        }

        // The level is only touched from here on, and the world was checked
        // to hold the player and every box.
        let ledger = &mut self.ledger;
        swap_in(ledger, &mut scratch, background, self.background, SectionKind::Background);
        swap_in(ledger, &mut scratch, platforms, self.platforms, SectionKind::Platforms);
        swap_in(ledger, &mut scratch, goals, self.goals, SectionKind::Goals);
        swap_in(ledger, &mut scratch, lava, self.lava, SectionKind::Lava);
        swap_in(
            ledger,
            &mut scratch,
            back_platforms,
            self.back_platforms,
            SectionKind::BackPlatforms,
        );
        swap_in(ledger, &mut scratch, boxes, self.boxes, SectionKind::Boxes);
        swap_in(ledger, &mut scratch, labels, self.labels, SectionKind::Labels);

        if let Some(world) = ledger.get_mut(self.physical_world) {
            world.clean();
        }
        populate_world(ledger, self.physical_world, self.boxes)
            .expect("can_hold was checked against the new box count");

        if let Some(source) = scratch.release(stream) {
            source.close();
        }
        tracing::debug!(ledger = %self.ledger.id(), "level reloaded, player preserved");
        Ok(())
    }

    fn section<T: 'static>(&self, token: Tracked<T>) -> &T {
        self.ledger
            .get(token)
            .expect("level sections stay registered for the level's lifetime")
    }

    /// The ledger owning every section.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The config the level was loaded with.
    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// Background layer.
    pub fn background(&self) -> &Background {
        self.section(self.background)
    }

    /// Player body.
    pub fn player(&self) -> &Player {
        self.section(self.player)
    }

    /// Foreground platforms.
    pub fn platforms(&self) -> &Platforms {
        self.section(self.platforms)
    }

    /// Goal markers.
    pub fn goals(&self) -> &Goals {
        self.section(self.goals)
    }

    /// Lava pools.
    pub fn lava(&self) -> &Lava {
        self.section(self.lava)
    }

    /// Back platforms.
    pub fn back_platforms(&self) -> &Platforms {
        self.section(self.back_platforms)
    }

    /// Boxes.
    pub fn boxes(&self) -> &Boxes {
        self.section(self.boxes)
    }

    /// Labels.
    pub fn labels(&self) -> &Labels {
        self.section(self.labels)
    }

    /// Script regions.
    pub fn regions(&self) -> &Regions {
        self.section(self.regions)
    }

    /// Solid list.
    pub fn physical_world(&self) -> &PhysicalWorld {
        self.section(self.physical_world)
    }

    /// Flip the background debug overlay.
    pub fn toggle_debug_mode(&mut self) {
        if let Some(background) = self.ledger.get_mut(self.background) {
            background.toggle_debug_mode();
        }
    }

    /// Look up a rigid body by id: the player first, then the boxes.
    pub fn rigid_rect(&self, id: &str) -> Option<Rect> {
        if id == PLAYER_ID {
            return Some(self.player().rect);
        }
        self.boxes().rigid_rect(id)
    }

    /// Tear the level down but keep its foreground platforms.
    ///
    /// The platforms are released from the ledger before teardown, so
    /// their destructor never runs and the caller becomes their owner.
    pub fn take_platforms(mut self) -> Platforms {
        let platforms = self
            .ledger
            .release(self.platforms)
            .expect("platforms are only released when the level is consumed");
        let destroyed = self.ledger.destroy_all();
        tracing::debug!(destroyed, "level torn down, platforms kept");
        platforms
    }

    /// Tear the level down, destroying every section in reverse load
    /// order. Returns how many sections were destroyed.
    pub fn destroy(self) -> usize {
        let destroyed = self.ledger.destroy_all();
        tracing::debug!(destroyed, "level torn down");
        destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Color, Point};
    use crate::section::RigidBox;

    /// Source yielding one box and otherwise empty sections.
    struct OneBox;

    impl LevelSource for OneBox {
        fn background(&mut self) -> Result<Background, SourceError> {
            Ok(Background::default())
        }
        fn player(&mut self) -> Result<Player, SourceError> {
            Ok(Player {
                rect: Rect::new(1.0, 1.0, 2.0, 2.0),
                color: Color::default(),
            })
        }
        fn platforms(&mut self) -> Result<Platforms, SourceError> {
            Ok(Platforms::default())
        }
        fn goals(&mut self) -> Result<Goals, SourceError> {
            Ok(Goals::default())
        }
        fn lava(&mut self) -> Result<Lava, SourceError> {
            Ok(Lava::default())
        }
        fn boxes(&mut self) -> Result<Boxes, SourceError> {
            let mut boxes = Boxes::default();
            boxes.boxes.insert(
                "box-0".into(),
                RigidBox {
                    rect: Rect::from_vecs(Point::new(5.0, 5.0), Point::new(1.0, 1.0)),
                    color: Color::default(),
                },
            );
            Ok(boxes)
        }
        fn labels(&mut self) -> Result<Labels, SourceError> {
            Ok(Labels::default())
        }
        fn regions(&mut self) -> Result<Regions, SourceError> {
            Ok(Regions::default())
        }
    }

    #[test]
    fn load_registers_every_section_and_releases_source() {
        let level = Level::load(OneBox, LevelConfig::default()).unwrap();
        // source + 9 sections + physical world
        assert_eq!(level.ledger().len(), 11);
        assert_eq!(level.ledger().active_count(), 10);
        assert_eq!(
            level.physical_world().solids(),
            &[Solid::Player, Solid::Box(0)]
        );
        assert_eq!(level.destroy(), 10);
    }

    #[test]
    fn rigid_rect_checks_player_then_boxes() {
        let level = Level::load(OneBox, LevelConfig::default()).unwrap();
        assert_eq!(level.rigid_rect(PLAYER_ID), Some(Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert_eq!(level.rigid_rect("box-0"), Some(Rect::new(5.0, 5.0, 1.0, 1.0)));
        assert_eq!(level.rigid_rect("nope"), None);
    }

    #[test]
    fn too_few_solids_fails_load() {
        let config = LevelConfig {
            max_solids: 1,
            ..LevelConfig::default()
        };
        match Level::load(OneBox, config) {
            Err(LevelError::TooManySolids { capacity: 1 }) => {}
            Err(other) => panic!("expected TooManySolids, got {other:?}"),
            Ok(_) => panic!("expected TooManySolids, got a level"),
        }
    }

    #[test]
    fn invalid_config_fails_before_reading() {
        let config = LevelConfig {
            max_solids: 0,
            ..LevelConfig::default()
        };
        assert!(matches!(
            Level::load(OneBox, config),
            Err(LevelError::Config(_))
        ));
    }

    #[test]
    fn toggle_debug_mode_reaches_background() {
        let mut level = Level::load(OneBox, LevelConfig::default()).unwrap();
        level.toggle_debug_mode();
        assert!(level.background().debug_mode);
    }
}
