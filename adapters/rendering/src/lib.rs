#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation and host-environment contracts for Magic Balloons
//! adapters.
//!
//! The engine core never talks to a window system directly. Concrete
//! backends implement the collaborator traits below; the engine reaches them
//! exclusively through broadcast [`Event`] values bridged by [`present`].

use anyhow::Result as AnyResult;
use glam::Vec2;
use magic_balloons_core::{
    CanvasBounds, CanvasPoint, ClockTime, DisplayRegion, Event, SpriteId, VariantId,
};

/// Width at which balloon artwork is drawn, in canvas units.
pub const BALLOON_SPRITE_WIDTH: f32 = 140.0;

/// File name of the artwork for the provided balloon variant.
///
/// Backends resolve the name against their own asset directory.
#[must_use]
pub fn balloon_asset_name(variant: VariantId) -> String {
    format!("balloon-{}.png", variant.get())
}

/// Converts an integer canvas-space point into backend screen space.
#[must_use]
pub fn canvas_position(point: CanvasPoint) -> Vec2 {
    Vec2::new(point.x() as f32, point.y() as f32)
}

/// Placement of the overlay window that hosts the canvas.
///
/// The window spans every display: anchored at the leftmost region edge, as
/// wide as all regions combined, and as tall as the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowPlacement {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
}

impl WindowPlacement {
    /// Derives the overlay window placement from the canvas bounds.
    #[must_use]
    pub const fn from_bounds(bounds: &CanvasBounds) -> Self {
        Self {
            left: bounds.min_left(),
            top: 0,
            width: bounds.total_width(),
            height: bounds.max_height(),
        }
    }

    /// Leftmost coordinate of the window.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Topmost coordinate of the window.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Width of the window.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the window.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Surface that places and moves balloon sprites.
///
/// The engine only writes to the canvas; it never reads canvas state back.
pub trait Canvas {
    /// Places a new sprite with the provided artwork variant.
    fn place(&mut self, sprite: SpriteId, variant: VariantId, position: Vec2) -> AnyResult<()>;

    /// Moves an already placed sprite to a new position.
    fn relocate(&mut self, sprite: SpriteId, position: Vec2) -> AnyResult<()>;

    /// Removes every sprite from the canvas.
    fn clear_all(&mut self) -> AnyResult<()>;
}

/// Window-style configuration applied once at startup.
///
/// Desktop hosts hide the overlay from the taskbar and the alt-tab menu; how
/// a backend accomplishes that is its own concern.
pub trait WindowChrome {
    /// Sizes the overlay window and removes it from task-switching surfaces.
    fn configure(&mut self, placement: WindowPlacement) -> AnyResult<()>;
}

/// Supplies the display regions available at startup.
///
/// Queried exactly once; display hot-plug is out of scope.
pub trait DisplayProbe {
    /// Enumerates the working areas of all connected displays.
    fn display_regions(&self) -> AnyResult<Vec<DisplayRegion>>;
}

/// Supplies wall-clock readings for the one-second cadence.
pub trait Clock {
    /// Current wall-clock time.
    fn now(&self) -> ClockTime;
}

/// Forwards world events to the canvas collaborator.
///
/// Placement and movement map one-to-one; batch completion and shutdown clear
/// the canvas. Retirement needs no canvas call of its own because retired
/// sprites already sit fully above the visible area.
pub fn present(events: &[Event], canvas: &mut dyn Canvas) -> AnyResult<()> {
    for event in events {
        match event {
            Event::SpritePlaced {
                sprite,
                variant,
                position,
            } => canvas.place(*sprite, *variant, canvas_position(*position))?,
            Event::SpriteMoved { sprite, position } => {
                canvas.relocate(*sprite, canvas_position(*position))?;
            }
            Event::BatchCompleted | Event::Halted => canvas.clear_all()?,
            _ => {}
        }
    }

    Ok(())
}

/// Canvas instruction captured by [`RecordingCanvas`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CanvasInstruction {
    /// A sprite was placed.
    Placed {
        /// Identifier of the placed sprite.
        sprite: SpriteId,
        /// Artwork variant assigned to the sprite.
        variant: VariantId,
        /// Screen-space position of the placement.
        position: Vec2,
    },
    /// A sprite was moved.
    Moved {
        /// Identifier of the moved sprite.
        sprite: SpriteId,
        /// Screen-space position after the move.
        position: Vec2,
    },
    /// Every sprite was removed.
    Cleared,
}

/// Headless canvas that records every instruction it receives.
///
/// Used by tests and by hosts that have no window system available.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    instructions: Vec<CanvasInstruction>,
}

impl RecordingCanvas {
    /// Creates an empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions received so far, in arrival order.
    #[must_use]
    pub fn instructions(&self) -> &[CanvasInstruction] {
        &self.instructions
    }
}

impl Canvas for RecordingCanvas {
    fn place(&mut self, sprite: SpriteId, variant: VariantId, position: Vec2) -> AnyResult<()> {
        self.instructions.push(CanvasInstruction::Placed {
            sprite,
            variant,
            position,
        });
        Ok(())
    }

    fn relocate(&mut self, sprite: SpriteId, position: Vec2) -> AnyResult<()> {
        self.instructions
            .push(CanvasInstruction::Moved { sprite, position });
        Ok(())
    }

    fn clear_all(&mut self) -> AnyResult<()> {
        self.instructions.push(CanvasInstruction::Cleared);
        Ok(())
    }
}
