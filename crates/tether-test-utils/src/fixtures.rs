//! Scripted level sources.
//!
//! [`ScriptedSource`] yields small deterministic sections and can be told
//! to fail at a chosen section, which drives the unwind paths of
//! `Level::load` and `Level::reload_preserve_player`. A [`SourceMonitor`]
//! taken before the source is handed over reports what was read and
//! whether the source was closed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use tether_level::{
    Background, Boxes, Color, Goal, Goals, Label, Labels, Lava, LevelSource, Platforms, Player,
    Point, Rect, Region, Regions, RigidBox, SectionKind, SourceError,
};

/// Observes a [`ScriptedSource`] after ownership has moved into a level.
#[derive(Clone)]
pub struct SourceMonitor {
    reads: Rc<RefCell<Vec<SectionKind>>>,
    closes: Rc<Cell<u32>>,
}

impl SourceMonitor {
    /// Sections read successfully, in order.
    pub fn reads(&self) -> Vec<SectionKind> {
        self.reads.borrow().clone()
    }

    /// How many times `close` ran.
    pub fn close_count(&self) -> u32 {
        self.closes.get()
    }

    pub fn is_closed(&self) -> bool {
        self.closes.get() > 0
    }
}

/// Deterministic [`LevelSource`] with an optional scripted failure.
///
/// `generation` shifts every coordinate and colour so sections from two
/// sources with different generations compare unequal.
pub struct ScriptedSource {
    generation: u32,
    platform_count: usize,
    box_count: usize,
    fail_at: Option<SectionKind>,
    platform_reads: usize,
    reads: Rc<RefCell<Vec<SectionKind>>>,
    closes: Rc<Cell<u32>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self {
            generation: 0,
            platform_count: 2,
            box_count: 2,
            fail_at: None,
            platform_reads: 0,
            reads: Rc::new(RefCell::new(Vec::new())),
            closes: Rc::new(Cell::new(0)),
        }
    }

    /// Fail when `kind` is requested.
    pub fn failing_at(mut self, kind: SectionKind) -> Self {
        self.fail_at = Some(kind);
        self
    }

    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_boxes(mut self, count: usize) -> Self {
        self.box_count = count;
        self
    }

    pub fn with_platforms(mut self, count: usize) -> Self {
        self.platform_count = count;
        self
    }

    pub fn monitor(&self) -> SourceMonitor {
        SourceMonitor {
            reads: Rc::clone(&self.reads),
            closes: Rc::clone(&self.closes),
        }
    }

    fn step(&mut self, kind: SectionKind) -> Result<(), SourceError> {
        if self.fail_at == Some(kind) {
            return Err(SourceError::new(format!("scripted failure at {kind}")));
        }
        self.reads.borrow_mut().push(kind);
        Ok(())
    }

    fn offset(&self) -> f32 {
        self.generation as f32
    }

    fn color(&self) -> Color {
        Color::rgba((self.generation % 10) as f32 / 10.0, 0.5, 0.5, 1.0)
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelSource for ScriptedSource {
    fn background(&mut self) -> Result<Background, SourceError> {
        self.step(SectionKind::Background)?;
        Ok(Background {
            base_color: self.color(),
            debug_mode: false,
        })
    }

    fn player(&mut self) -> Result<Player, SourceError> {
        self.step(SectionKind::Player)?;
        Ok(Player {
            rect: Rect::new(self.offset(), 0.0, 1.0, 2.0),
            color: self.color(),
        })
    }

    fn platforms(&mut self) -> Result<Platforms, SourceError> {
        let kind = if self.platform_reads == 0 {
            SectionKind::Platforms
        } else {
            SectionKind::BackPlatforms
        };
        self.platform_reads += 1;
        self.step(kind)?;
        let rects = (0..self.platform_count)
            .map(|i| Rect::new(i as f32 * 10.0, self.offset(), 8.0, 1.0))
            .collect::<Vec<_>>();
        let colors = vec![self.color(); rects.len()];
        Ok(Platforms { rects, colors })
    }

    fn goals(&mut self) -> Result<Goals, SourceError> {
        self.step(SectionKind::Goals)?;
        let mut goals = IndexMap::new();
        goals.insert(
            "goal-0".to_string(),
            Goal {
                position: Point::new(50.0, self.offset()),
                color: self.color(),
            },
        );
        Ok(Goals { goals })
    }

    fn lava(&mut self) -> Result<Lava, SourceError> {
        self.step(SectionKind::Lava)?;
        Ok(Lava {
            rects: vec![Rect::new(0.0, 100.0 + self.offset(), 200.0, 5.0)],
            colors: vec![self.color()],
        })
    }

    fn boxes(&mut self) -> Result<Boxes, SourceError> {
        self.step(SectionKind::Boxes)?;
        let boxes = (0..self.box_count)
            .map(|i| {
                (
                    format!("box-{i}"),
                    RigidBox {
                        rect: Rect::new(20.0 + i as f32 * 3.0, self.offset(), 2.0, 2.0),
                        color: self.color(),
                    },
                )
            })
            .collect();
        Ok(Boxes { boxes })
    }

    fn labels(&mut self) -> Result<Labels, SourceError> {
        self.step(SectionKind::Labels)?;
        let mut labels = IndexMap::new();
        labels.insert(
            "intro".to_string(),
            Label {
                position: Point::new(0.0, -10.0),
                color: self.color(),
                text: format!("generation {}", self.generation),
            },
        );
        Ok(Labels { labels })
    }

    fn regions(&mut self) -> Result<Regions, SourceError> {
        self.step(SectionKind::Regions)?;
        let mut regions = IndexMap::new();
        regions.insert(
            "exit".to_string(),
            Region {
                rect: Rect::new(190.0, 0.0, 10.0, 10.0),
                script: format!("(load-level {})", self.generation + 1),
            },
        );
        Ok(Regions { regions })
    }

    fn close(self) {
        self.closes.set(self.closes.get() + 1);
    }
}
