#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative scheduling and animation state for Magic Balloons.
//!
//! The world owns the virtual canvas bounds, the waiting/animating schedule
//! state, and the batch of balloons currently rising across the canvas. All
//! mutations flow through [`apply`]; read access flows through [`query`].

use magic_balloons_core::{
    CanvasBounds, CanvasPoint, Command, Event, ScheduleState, SpriteId, SpriteSeed, StateError,
    VariantId, OFFSCREEN_CLEARANCE,
};

/// Represents the authoritative Magic Balloons world state.
#[derive(Debug)]
pub struct World {
    bounds: CanvasBounds,
    state: ScheduleState,
    balloons: Vec<Balloon>,
    next_sprite_id: u32,
}

impl World {
    /// Creates a new world anchored to the provided canvas bounds.
    ///
    /// The bounds are computed once at startup and never change afterwards;
    /// the world starts in [`ScheduleState::Waiting`] with no batch.
    #[must_use]
    pub fn new(bounds: CanvasBounds) -> Self {
        Self {
            bounds,
            state: ScheduleState::Waiting,
            balloons: Vec::new(),
            next_sprite_id: 0,
        }
    }

    fn allocate_sprite_id(&mut self) -> SpriteId {
        let id = SpriteId::new(self.next_sprite_id);
        self.next_sprite_id = self.next_sprite_id.wrapping_add(1);
        id
    }

    fn discard_batch(&mut self) {
        self.balloons.clear();
        self.state = ScheduleState::Waiting;
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Returns [`StateError::BatchAlreadyActive`] when a batch start arrives while
/// another batch is still animating; that is a programming-contract violation
/// and must reach the caller instead of being folded into the event stream.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), StateError> {
    match command {
        Command::CheckClock { now } => {
            // The clock cadence only runs while waiting; a reading that slips
            // through during animation is dropped rather than echoed.
            if world.state == ScheduleState::Waiting {
                out_events.push(Event::ClockAdvanced { now });
            }
        }
        Command::StartBatch { sprites } => {
            if world.state == ScheduleState::Animating {
                return Err(StateError::BatchAlreadyActive);
            }

            world.balloons.clear();
            world.balloons.reserve(sprites.len());
            out_events.push(Event::BatchStarted {
                count: sprites.len() as u32,
            });

            for seed in sprites {
                let sprite = world.allocate_sprite_id();
                out_events.push(Event::SpritePlaced {
                    sprite,
                    variant: seed.variant,
                    position: seed.position,
                });
                world.balloons.push(Balloon::from_seed(sprite, seed));
            }

            world.state = ScheduleState::Animating;
        }
        Command::Advance => {
            if world.state != ScheduleState::Animating {
                return Ok(());
            }

            let mut all_retired = true;
            for balloon in world.balloons.iter_mut() {
                balloon.position = balloon.position.risen_by(balloon.rise_speed);
                if balloon.retired {
                    continue;
                }

                if balloon.position.y() <= -OFFSCREEN_CLEARANCE {
                    balloon.retired = true;
                    out_events.push(Event::SpriteRetired {
                        sprite: balloon.id,
                    });
                } else {
                    all_retired = false;
                    out_events.push(Event::SpriteMoved {
                        sprite: balloon.id,
                        position: balloon.position,
                    });
                }
            }

            if all_retired {
                world.discard_batch();
                out_events.push(Event::BatchCompleted);
            }
        }
        Command::Shutdown => {
            world.discard_batch();
            out_events.push(Event::Halted);
        }
    }

    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use magic_balloons_core::{CanvasBounds, CanvasPoint, ScheduleState, SpriteId, VariantId};

    /// Reports whether the world is waiting for a trigger or animating.
    #[must_use]
    pub fn schedule_state(world: &World) -> ScheduleState {
        world.state
    }

    /// Retrieves the immutable canvas bounds the world was built with.
    #[must_use]
    pub fn canvas_bounds(world: &World) -> CanvasBounds {
        world.bounds
    }

    /// Captures a read-only view of the balloons in the active batch.
    #[must_use]
    pub fn sprite_view(world: &World) -> SpriteView {
        let mut snapshots: Vec<SpriteSnapshot> = world
            .balloons
            .iter()
            .map(|balloon| SpriteSnapshot {
                id: balloon.id,
                variant: balloon.variant,
                position: balloon.position,
                rise_speed: balloon.rise_speed,
                retired: balloon.retired,
            })
            .collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        SpriteView { snapshots }
    }

    /// Read-only snapshot describing the active batch.
    #[derive(Clone, Debug, Default)]
    pub struct SpriteView {
        snapshots: Vec<SpriteSnapshot>,
    }

    impl SpriteView {
        /// Iterator over the captured sprite snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &SpriteSnapshot> {
            self.snapshots.iter()
        }

        /// Number of balloons captured by the view.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the view captured no balloons.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<SpriteSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single balloon's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct SpriteSnapshot {
        /// Identifier allocated to the sprite by the world.
        pub id: SpriteId,
        /// Artwork variant assigned to the sprite.
        pub variant: VariantId,
        /// Current canvas-space position.
        pub position: CanvasPoint,
        /// Upward movement per motion tick.
        pub rise_speed: u32,
        /// Whether the sprite has risen fully above the canvas top.
        pub retired: bool,
    }
}

#[derive(Clone, Copy, Debug)]
struct Balloon {
    id: SpriteId,
    variant: VariantId,
    position: CanvasPoint,
    rise_speed: u32,
    retired: bool,
}

impl Balloon {
    fn from_seed(id: SpriteId, seed: SpriteSeed) -> Self {
        Self {
            id,
            variant: seed.variant,
            position: seed.position,
            rise_speed: seed.rise_speed,
            retired: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply, query, World};
    use magic_balloons_core::{
        CanvasBounds, CanvasPoint, ClockTime, Command, DisplayRegion, Event, ScheduleState,
        SpriteSeed, StateError, VariantId, OFFSCREEN_CLEARANCE,
    };

    fn test_world() -> World {
        let bounds = CanvasBounds::from_regions(&[DisplayRegion::new(0, 0, 1920, 1080)])
            .expect("bounds");
        World::new(bounds)
    }

    fn seed(x: i32, y: i32, rise_speed: u32) -> SpriteSeed {
        SpriteSeed {
            variant: VariantId::new(1),
            position: CanvasPoint::new(x, y),
            rise_speed,
        }
    }

    fn ticks_to_retire(spawn_y: i32, rise_speed: u32) -> u32 {
        let distance = (spawn_y + OFFSCREEN_CLEARANCE) as u32;
        distance.div_ceil(rise_speed)
    }

    #[test]
    fn start_batch_places_every_sprite() {
        let mut world = test_world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, 1290, 10), seed(500, 1290, 12)],
            },
            &mut events,
        )
        .expect("start");

        assert_eq!(query::schedule_state(&world), ScheduleState::Animating);
        assert_eq!(query::sprite_view(&world).len(), 2);
        assert_eq!(events[0], Event::BatchStarted { count: 2 });
        let placed = events
            .iter()
            .filter(|event| matches!(event, Event::SpritePlaced { .. }))
            .count();
        assert_eq!(placed, 2);
    }

    #[test]
    fn starting_while_animating_is_rejected() {
        let mut world = test_world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, 1290, 10)],
            },
            &mut events,
        )
        .expect("first start");

        let rejected = apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(200, 1290, 11)],
            },
            &mut events,
        );

        assert_eq!(rejected, Err(StateError::BatchAlreadyActive));
        assert_eq!(query::sprite_view(&world).len(), 1);
    }

    #[test]
    fn advance_moves_live_sprites_by_their_speed() {
        let mut world = test_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(320, 1290, 15)],
            },
            &mut events,
        )
        .expect("start");

        events.clear();
        apply(&mut world, Command::Advance, &mut events).expect("advance");

        let moved: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::SpriteMoved { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert_eq!(moved, vec![CanvasPoint::new(320, 1275)]);
    }

    #[test]
    fn sprite_retires_after_expected_tick_count() {
        let spawn_y = 5;
        let rise_speed = 10;
        let mut world = test_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, spawn_y, rise_speed)],
            },
            &mut events,
        )
        .expect("start");

        let mut ticks = 0;
        loop {
            events.clear();
            apply(&mut world, Command::Advance, &mut events).expect("advance");
            ticks += 1;
            if events.contains(&Event::BatchCompleted) {
                break;
            }
            assert!(ticks < 1_000, "batch never completed");
        }

        assert_eq!(ticks, ticks_to_retire(spawn_y, rise_speed));
        assert_eq!(query::schedule_state(&world), ScheduleState::Waiting);
        assert!(query::sprite_view(&world).is_empty());
    }

    #[test]
    fn batch_completes_when_slowest_sprite_retires() {
        let spawn_y = 30;
        let mut world = test_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, spawn_y, 19), seed(200, spawn_y, 10)],
            },
            &mut events,
        )
        .expect("start");

        let mut ticks = 0;
        loop {
            events.clear();
            apply(&mut world, Command::Advance, &mut events).expect("advance");
            ticks += 1;
            if events.contains(&Event::BatchCompleted) {
                break;
            }
            assert!(ticks < 1_000, "batch never completed");
        }

        let slowest = ticks_to_retire(spawn_y, 10).max(ticks_to_retire(spawn_y, 19));
        assert_eq!(ticks, slowest);
    }

    #[test]
    fn each_sprite_retires_exactly_once() {
        let mut world = test_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, 5, 19), seed(200, 40, 10)],
            },
            &mut events,
        )
        .expect("start");

        events.clear();
        for _ in 0..64 {
            apply(&mut world, Command::Advance, &mut events).expect("advance");
        }

        let retirements = events
            .iter()
            .filter(|event| matches!(event, Event::SpriteRetired { .. }))
            .count();
        assert_eq!(retirements, 2);
    }

    #[test]
    fn advance_after_completion_is_a_no_op() {
        let mut world = test_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, 5, 19)],
            },
            &mut events,
        )
        .expect("start");

        for _ in 0..32 {
            apply(&mut world, Command::Advance, &mut events).expect("advance");
        }
        let completions = events
            .iter()
            .filter(|event| matches!(event, Event::BatchCompleted))
            .count();
        assert_eq!(completions, 1, "completion must signal exactly once");

        events.clear();
        apply(&mut world, Command::Advance, &mut events).expect("advance");
        assert!(events.is_empty(), "post-completion ticks must stay silent");
    }

    #[test]
    fn clock_readings_surface_only_while_waiting() {
        let mut world = test_world();
        let mut events = Vec::new();
        let now = ClockTime::from_second_of_minute(25);

        apply(&mut world, Command::CheckClock { now }, &mut events).expect("check");
        assert_eq!(events, vec![Event::ClockAdvanced { now }]);

        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, 1290, 10)],
            },
            &mut events,
        )
        .expect("start");

        events.clear();
        apply(&mut world, Command::CheckClock { now }, &mut events).expect("check");
        assert!(events.is_empty(), "no clock echo while animating");
    }

    #[test]
    fn shutdown_discards_the_active_batch() {
        let mut world = test_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, 1290, 10), seed(500, 1290, 12)],
            },
            &mut events,
        )
        .expect("start");

        events.clear();
        apply(&mut world, Command::Shutdown, &mut events).expect("shutdown");

        assert_eq!(events, vec![Event::Halted]);
        assert_eq!(query::schedule_state(&world), ScheduleState::Waiting);
        assert!(query::sprite_view(&world).is_empty());
    }

    #[test]
    fn sprite_ids_stay_unique_across_batches() {
        let mut world = test_world();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(100, 5, 19)],
            },
            &mut events,
        )
        .expect("first batch");
        for _ in 0..32 {
            apply(&mut world, Command::Advance, &mut events).expect("advance");
        }

        events.clear();
        apply(
            &mut world,
            Command::StartBatch {
                sprites: vec![seed(200, 5, 19)],
            },
            &mut events,
        )
        .expect("second batch");

        let second_ids: Vec<_> = query::sprite_view(&world)
            .iter()
            .map(|snapshot| snapshot.id.get())
            .collect();
        assert_eq!(second_ids, vec![1]);
    }
}
