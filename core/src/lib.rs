#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Magic Balloons engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation collaborators to react to deterministically. Systems consume
//! event streams, query immutable snapshots, and respond exclusively with new
//! command batches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Horizontal margin kept between the canvas edges and any spawn position so
/// balloon artwork never clips off the visible area.
pub const HORIZONTAL_SPAWN_MARGIN: u32 = 75;

/// Narrowest canvas able to hold a spawn position with the required margin on
/// both sides.
pub const MINIMUM_SPAWN_WIDTH: u32 = HORIZONTAL_SPAWN_MARGIN * 2;

/// Vertical clearance that places a balloon fully outside the canvas: sprites
/// spawn this far below the bottom edge and retire once they have risen this
/// far above the top edge.
pub const OFFSCREEN_CLEARANCE: i32 = 210;

/// Height floor applied to the virtual canvas so a single small display still
/// yields a usable animation area.
pub const MINIMUM_CANVAS_HEIGHT: u32 = 1080;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Reports the current wall-clock time observed by the one-second cadence.
    CheckClock {
        /// Wall-clock reading supplied by the clock collaborator.
        now: ClockTime,
    },
    /// Requests that a freshly generated batch of balloons start animating.
    StartBatch {
        /// Seeds describing every balloon in the batch, in spawn order.
        sprites: Vec<SpriteSeed>,
    },
    /// Advances every active balloon by one motion tick.
    Advance,
    /// Discards any in-flight batch and halts the engine.
    Shutdown,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms a wall-clock reading while the engine awaits its next batch.
    ClockAdvanced {
        /// Wall-clock reading carried by the originating command.
        now: ClockTime,
    },
    /// Announces that a batch began animating.
    BatchStarted {
        /// Number of balloons contained in the batch.
        count: u32,
    },
    /// Instructs the canvas to place a new sprite.
    SpritePlaced {
        /// Identifier allocated to the sprite by the world.
        sprite: SpriteId,
        /// Artwork variant assigned to the sprite.
        variant: VariantId,
        /// Initial canvas-space position of the sprite.
        position: CanvasPoint,
    },
    /// Instructs the canvas to move a live sprite.
    SpriteMoved {
        /// Identifier of the sprite that advanced.
        sprite: SpriteId,
        /// Canvas-space position after the motion tick.
        position: CanvasPoint,
    },
    /// Reports that a sprite rose fully above the canvas top.
    SpriteRetired {
        /// Identifier of the retired sprite.
        sprite: SpriteId,
    },
    /// Announces that every sprite in the active batch retired.
    BatchCompleted,
    /// Confirms that the engine discarded all state in response to shutdown.
    Halted,
}

/// Unique identifier assigned to a balloon sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpriteId(u32);

impl SpriteId {
    /// Creates a new sprite identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a balloon artwork variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantId(u8);

impl VariantId {
    /// Creates a new variant identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the variant.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Axis-aligned rectangle describing one display's working area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayRegion {
    left: i32,
    top: i32,
    width: u32,
    height: u32,
}

impl DisplayRegion {
    /// Creates a new display region from its position and dimensions.
    #[must_use]
    pub const fn new(left: i32, top: i32, width: u32, height: u32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Leftmost coordinate of the region.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Topmost coordinate of the region.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.top
    }

    /// Width of the region.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the region.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// Virtual coordinate space spanning every display region.
///
/// Computed once at startup and immutable afterwards. The canvas covers the
/// summed width of all regions, anchored at the leftmost region edge, with a
/// height equal to the tallest region (floored at
/// [`MINIMUM_CANVAS_HEIGHT`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasBounds {
    min_left: i32,
    total_width: u32,
    max_height: u32,
}

impl CanvasBounds {
    /// Derives the canvas bounds from the provided display regions.
    ///
    /// Returns [`ConfigurationError::EmptyDisplaySet`] when no region is
    /// supplied.
    pub fn from_regions(regions: &[DisplayRegion]) -> Result<Self, ConfigurationError> {
        let Some(first) = regions.first() else {
            return Err(ConfigurationError::EmptyDisplaySet);
        };

        let mut min_left = first.left();
        let mut total_width: u32 = 0;
        let mut max_height = MINIMUM_CANVAS_HEIGHT;

        for region in regions {
            total_width = total_width.saturating_add(region.width());
            min_left = min_left.min(region.left());
            max_height = max_height.max(region.height());
        }

        Ok(Self {
            min_left,
            total_width,
            max_height,
        })
    }

    /// Leftmost coordinate of the virtual canvas.
    #[must_use]
    pub const fn min_left(&self) -> i32 {
        self.min_left
    }

    /// Total width of the virtual canvas.
    #[must_use]
    pub const fn total_width(&self) -> u32 {
        self.total_width
    }

    /// Height of the virtual canvas.
    #[must_use]
    pub const fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Reports whether the canvas is wide enough to spawn a sprite with the
    /// required horizontal margins.
    #[must_use]
    pub const fn fits_sprite(&self) -> bool {
        self.total_width > MINIMUM_SPAWN_WIDTH
    }
}

/// Canvas-space position measured from the canvas origin.
///
/// `y` grows downward; positions above the canvas top are negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasPoint {
    x: i32,
    y: i32,
}

impl CanvasPoint {
    /// Creates a new canvas-space point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate of the point.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical coordinate of the point.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the point shifted upward by the provided number of units.
    #[must_use]
    pub const fn risen_by(&self, units: u32) -> Self {
        Self {
            x: self.x,
            y: self.y.saturating_sub(units as i32),
        }
    }
}

/// Descriptor for one balloon produced by population generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteSeed {
    /// Artwork variant assigned to the balloon.
    pub variant: VariantId,
    /// Canvas-space spawn position.
    pub position: CanvasPoint,
    /// Upward movement per motion tick, in canvas units.
    pub rise_speed: u32,
}

/// Wall-clock reading supplied by the clock collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClockTime {
    second_of_minute: u8,
}

impl ClockTime {
    /// Creates a reading anchored at the provided second of the minute.
    ///
    /// Values are wrapped into `0..60`.
    #[must_use]
    pub const fn from_second_of_minute(second: u8) -> Self {
        Self {
            second_of_minute: second % 60,
        }
    }

    /// Creates a reading from a unix timestamp expressed in whole seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: u64) -> Self {
        Self {
            second_of_minute: (seconds % 60) as u8,
        }
    }

    /// Second of the current minute, in `0..60`.
    #[must_use]
    pub const fn second_of_minute(&self) -> u8 {
        self.second_of_minute
    }
}

/// Describes whether the engine is waiting for a trigger or animating a batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScheduleState {
    /// No batch exists; the one-second clock cadence is running.
    Waiting,
    /// Exactly one batch is animating; the motion cadence is running.
    Animating,
}

/// Raised when the display environment cannot produce a usable canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The display-enumeration collaborator supplied no regions.
    #[error("display region set is empty")]
    EmptyDisplaySet,
}

/// Raised when the canvas is too narrow to place any sprite with the required
/// horizontal margins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("canvas width {total_width} leaves no spawn range inside the edge margins")]
pub struct InvalidBoundsError {
    /// Total canvas width that failed validation.
    pub total_width: u32,
}

/// Raised on a programming-contract violation in the scheduling state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StateError {
    /// A new batch was started while another batch was still animating.
    #[error("a batch is already animating; overlapping batches are forbidden")]
    BatchAlreadyActive,
}
