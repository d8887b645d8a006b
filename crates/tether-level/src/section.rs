//! Level sections: the subsystems a [`Level`](crate::Level) owns.
//!
//! Sections are plain data. Each one is registered in the level's ledger
//! with [`retire`] as its destructor as soon as it has been read.

use std::fmt;

use indexmap::IndexMap;

use crate::geometry::{Color, Point, Rect};

/// Identifies a section of a level, in file order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    /// The level input itself.
    Source,
    /// Background layer.
    Background,
    /// The player body.
    Player,
    /// Foreground platforms.
    Platforms,
    /// Goal markers.
    Goals,
    /// Lava pools.
    Lava,
    /// Decorative platforms drawn behind the player.
    BackPlatforms,
    /// Pushable boxes.
    Boxes,
    /// Text labels.
    Labels,
    /// Script trigger regions.
    Regions,
    /// Solid list used by collision resolution.
    PhysicalWorld,
}

impl SectionKind {
    /// Sections in the order a source yields them.
    pub const READ_ORDER: [SectionKind; 9] = [
        Self::Background,
        Self::Player,
        Self::Platforms,
        Self::Goals,
        Self::Lava,
        Self::BackPlatforms,
        Self::Boxes,
        Self::Labels,
        Self::Regions,
    ];

    /// Lower-case name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Background => "background",
            Self::Player => "player",
            Self::Platforms => "platforms",
            Self::Goals => "goals",
            Self::Lava => "lava",
            Self::BackPlatforms => "back_platforms",
            Self::Boxes => "boxes",
            Self::Labels => "labels",
            Self::Regions => "regions",
            Self::PhysicalWorld => "physical_world",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Destructor registered for every section.
///
/// Sections hold no external handles, so retiring one is a logged drop.
pub fn retire<T: 'static>(kind: SectionKind) -> impl FnMut(T) + 'static {
    move |section| {
        drop(section);
        tracing::trace!(section = %kind, "section destroyed");
    }
}

/// Background layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Background {
    /// Fill colour behind everything else.
    pub base_color: Color,
    /// When set, the renderer overlays the background grid.
    pub debug_mode: bool,
}

impl Background {
    /// Flip the debug overlay.
    pub fn toggle_debug_mode(&mut self) {
        self.debug_mode = !self.debug_mode;
    }
}

/// Rigid-body id under which the player is looked up.
pub const PLAYER_ID: &str = "player";

/// The player body.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Player {
    /// Body rectangle at spawn.
    pub rect: Rect,
    /// Body colour.
    pub color: Color,
}

/// A set of coloured rectangles (used for front and back platforms).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Platforms {
    /// One rectangle per platform.
    pub rects: Vec<Rect>,
    /// One colour per platform, parallel to `rects`.
    pub colors: Vec<Color>,
}

impl Platforms {
    /// Number of platforms.
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Returns `true` if there are no platforms.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

/// A single goal marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Goal {
    /// Checkpoint position.
    pub position: Point,
    /// Marker colour.
    pub color: Color,
}

/// Goal markers keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Goals {
    /// Goals in file order.
    pub goals: IndexMap<String, Goal>,
}

/// Lava pools.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Lava {
    /// Pool rectangles.
    pub rects: Vec<Rect>,
    /// Pool colours, parallel to `rects`.
    pub colors: Vec<Color>,
}

/// A pushable box.
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBox {
    /// Body rectangle at spawn.
    pub rect: Rect,
    /// Body colour.
    pub color: Color,
}

/// Pushable boxes keyed by rigid-body id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Boxes {
    /// Boxes in file order. The position of a box in this map is its solid
    /// index in the physical world.
    pub boxes: IndexMap<String, RigidBox>,
}

impl Boxes {
    /// Number of boxes.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if there are no boxes.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Look up a box body by id.
    pub fn rigid_rect(&self, id: &str) -> Option<Rect> {
        self.boxes.get(id).map(|b| b.rect)
    }
}

/// A text label.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    /// Anchor position.
    pub position: Point,
    /// Text colour.
    pub color: Color,
    /// Text shown.
    pub text: String,
}

/// Text labels keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Labels {
    /// Labels in file order.
    pub labels: IndexMap<String, Label>,
}

/// A script trigger region.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// Trigger area.
    pub rect: Rect,
    /// Script run when the player enters.
    pub script: String,
}

/// Script trigger regions keyed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Regions {
    /// Regions in file order.
    pub regions: IndexMap<String, Region>,
}
