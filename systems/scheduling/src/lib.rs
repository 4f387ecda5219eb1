#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Clock-aligned spawn trigger and the explicit cadence objects that drive
//! the engine's two tick rates.

use std::time::Duration;

use magic_balloons_core::{
    CanvasBounds, Command, Event, InvalidBoundsError, ScheduleState,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Period of the wall-clock cadence that feeds the spawn trigger.
pub const CLOCK_CADENCE_PERIOD: Duration = Duration::from_secs(1);

/// Period of the motion cadence that advances an animating batch.
pub const MOTION_CADENCE_PERIOD: Duration = Duration::from_millis(20);

/// Seconds of the minute at which the spawn trigger fires.
const TRIGGER_SECONDS: [u8; 2] = [25, 55];

/// Explicitly owned periodic tick source.
///
/// The host loop feeds elapsed time into [`Cadence::advance`] and receives the
/// number of due ticks back, so tests drive time synthetically instead of
/// sleeping. A stopped cadence discards elapsed time entirely.
#[derive(Clone, Copy, Debug)]
pub struct Cadence {
    period: Duration,
    running: bool,
    accumulated: Duration,
}

impl Cadence {
    /// Creates a stopped cadence with the provided period.
    #[must_use]
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            running: false,
            accumulated: Duration::ZERO,
        }
    }

    /// Starts the cadence, clearing any previously accumulated time.
    pub fn start(&mut self) {
        self.running = true;
        self.accumulated = Duration::ZERO;
    }

    /// Stops the cadence and discards accumulated time.
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulated = Duration::ZERO;
    }

    /// Reports whether the cadence is currently registered to tick.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Fixed period between ticks.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Accumulates elapsed time and drains it into due ticks.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.running || self.period.is_zero() {
            return 0;
        }

        self.accumulated = self.accumulated.saturating_add(elapsed);
        let mut ticks = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            ticks += 1;
        }
        ticks
    }
}

/// Configuration parameters required to construct the spawn scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided population seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Clock-aligned trigger that starts a new batch twice per minute.
///
/// The trigger deliberately compares wall-clock seconds instead of counting
/// down a relative interval, so spawns stay aligned to the clock even if the
/// process pauses. A reading that misses a trigger second is not caught up;
/// the scheduler simply waits for the next second equal to 25 or 55.
#[derive(Debug)]
pub struct Scheduler {
    rng: ChaCha8Rng,
}

impl Scheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes clock events and emits a batch start when the trigger fires.
    ///
    /// At most one batch is requested per pass; the schedule state flips to
    /// [`ScheduleState::Animating`] when the world applies the command, which
    /// keeps later readings in the same pass from double-firing. Propagates
    /// [`InvalidBoundsError`] from population generation; the canvas was
    /// validated at startup, so hitting it here is a setup bug.
    pub fn handle(
        &mut self,
        events: &[Event],
        state: ScheduleState,
        bounds: CanvasBounds,
        out: &mut Vec<Command>,
    ) -> Result<(), InvalidBoundsError> {
        if state != ScheduleState::Waiting {
            return Ok(());
        }

        for event in events {
            let Event::ClockAdvanced { now } = event else {
                continue;
            };

            if TRIGGER_SECONDS.contains(&now.second_of_minute()) {
                let sprites = magic_balloons_system_population::generate_batch(
                    &bounds,
                    &mut self.rng,
                )?;
                out.push(Command::StartBatch { sprites });
                break;
            }
        }

        Ok(())
    }
}
