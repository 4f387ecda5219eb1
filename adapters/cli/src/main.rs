#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host that runs the Magic Balloons engine.
//!
//! The binary owns the two cadence objects, feeds wall-clock readings into
//! the world, and forwards canvas instructions to a console-logging backend.
//! It is primarily a demonstration and soak-testing surface; a desktop
//! overlay host would swap in real canvas and window-chrome collaborators.

use std::{
    cell::Cell,
    thread,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use glam::Vec2;
use magic_balloons_core::{
    CanvasBounds, ClockTime, Command, DisplayRegion, Event, SpriteId, VariantId,
};
use magic_balloons_rendering::{
    present, Canvas, Clock, DisplayProbe, WindowChrome, WindowPlacement,
};
use magic_balloons_system_scheduling::{
    Cadence, Config, Scheduler, CLOCK_CADENCE_PERIOD, MOTION_CADENCE_PERIOD,
};
use magic_balloons_world::{self as world, query, World};
use tracing::{debug, info, trace};
use tracing_subscriber::prelude::*;

/// How long the real-time loop rests between iterations.
const LOOP_REST: Duration = Duration::from_millis(5);

/// Periodically floats batches of balloons across every connected display.
#[derive(Debug, Parser)]
#[command(name = "magic-balloons")]
struct Args {
    /// Display region as `LEFT,TOP,WIDTH,HEIGHT`; repeat per display.
    ///
    /// Defaults to a single full-HD display at the origin.
    #[arg(long = "display", value_name = "LEFT,TOP,WIDTH,HEIGHT", value_parser = parse_display)]
    displays: Vec<DisplayRegion>,

    /// Seed for population generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of batches to animate before exiting.
    #[arg(long, default_value_t = 1)]
    batches: u32,

    /// Run on synthetic time instead of the wall clock (no sleeping).
    #[arg(long)]
    simulated: bool,
}

fn parse_display(spec: &str) -> Result<DisplayRegion, String> {
    let fields: Vec<&str> = spec.split(',').collect();
    let &[left, top, width, height] = fields.as_slice() else {
        return Err(format!("expected LEFT,TOP,WIDTH,HEIGHT, got `{spec}`"));
    };

    let parse_i32 =
        |field: &str| field.trim().parse::<i32>().map_err(|error| error.to_string());
    let parse_u32 =
        |field: &str| field.trim().parse::<u32>().map_err(|error| error.to_string());

    Ok(DisplayRegion::new(
        parse_i32(left)?,
        parse_i32(top)?,
        parse_u32(width)?,
        parse_u32(height)?,
    ))
}

/// Display probe backed by command-line arguments.
#[derive(Debug)]
struct StaticDisplayProbe {
    regions: Vec<DisplayRegion>,
}

impl StaticDisplayProbe {
    fn new(regions: Vec<DisplayRegion>) -> Self {
        Self { regions }
    }
}

impl DisplayProbe for StaticDisplayProbe {
    fn display_regions(&self) -> Result<Vec<DisplayRegion>> {
        Ok(self.regions.clone())
    }
}

/// Window chrome that records its configuration in the log.
///
/// A desktop host would size the overlay window here and strip it from the
/// taskbar and alt-tab surfaces.
#[derive(Debug, Default)]
struct LoggingChrome;

impl WindowChrome for LoggingChrome {
    fn configure(&mut self, placement: WindowPlacement) -> Result<()> {
        info!(
            left = placement.left(),
            top = placement.top(),
            width = placement.width(),
            height = placement.height(),
            "overlay window configured"
        );
        Ok(())
    }
}

/// Canvas backend that logs every instruction it receives.
#[derive(Debug, Default)]
struct ConsoleCanvas;

impl Canvas for ConsoleCanvas {
    fn place(&mut self, sprite: SpriteId, variant: VariantId, position: Vec2) -> Result<()> {
        debug!(
            sprite = sprite.get(),
            variant = variant.get(),
            x = f64::from(position.x),
            y = f64::from(position.y),
            "place sprite"
        );
        Ok(())
    }

    fn relocate(&mut self, sprite: SpriteId, position: Vec2) -> Result<()> {
        trace!(
            sprite = sprite.get(),
            x = f64::from(position.x),
            y = f64::from(position.y),
            "move sprite"
        );
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        debug!("clear canvas");
        Ok(())
    }
}

/// Wall clock used in real-time runs.
#[derive(Debug, Default)]
struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> ClockTime {
        let unix_seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        ClockTime::from_unix_seconds(unix_seconds)
    }
}

/// Deterministic clock used in simulated runs; every reading advances one
/// second.
#[derive(Debug, Default)]
struct SimulatedClock {
    seconds: Cell<u64>,
}

impl SimulatedClock {
    fn tick_second(&self) {
        self.seconds.set(self.seconds.get() + 1);
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> ClockTime {
        ClockTime::from_unix_seconds(self.seconds.get())
    }
}

enum HostClock {
    System(SystemClock),
    Simulated(SimulatedClock),
}

impl HostClock {
    fn observe_second(&self) -> ClockTime {
        match self {
            Self::System(clock) => clock.now(),
            Self::Simulated(clock) => {
                clock.tick_second();
                clock.now()
            }
        }
    }
}

/// Source of elapsed time for the cooperative loop.
enum Pacer {
    Real { last: Instant },
    Simulated,
}

impl Pacer {
    fn step(&mut self) -> Duration {
        match self {
            Self::Real { last } => {
                thread::sleep(LOOP_REST);
                let now = Instant::now();
                let elapsed = now.duration_since(*last);
                *last = now;
                elapsed
            }
            // Synthetic time advances exactly one motion period per
            // iteration, so replays finish without sleeping.
            Self::Simulated => MOTION_CADENCE_PERIOD,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    let probe = if args.displays.is_empty() {
        StaticDisplayProbe::new(vec![DisplayRegion::new(0, 0, 1920, 1080)])
    } else {
        StaticDisplayProbe::new(args.displays.clone())
    };
    let regions = probe.display_regions().context("enumerate displays")?;
    let bounds = CanvasBounds::from_regions(&regions).context("derive canvas bounds")?;
    ensure!(
        bounds.fits_sprite(),
        "canvas width {} cannot fit a balloon inside the edge margins",
        bounds.total_width()
    );

    let mut chrome = LoggingChrome;
    chrome
        .configure(WindowPlacement::from_bounds(&bounds))
        .context("configure window chrome")?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, batches = args.batches, "engine starting");

    let clock = if args.simulated {
        HostClock::Simulated(SimulatedClock::default())
    } else {
        HostClock::System(SystemClock)
    };
    let mut pacer = if args.simulated {
        Pacer::Simulated
    } else {
        Pacer::Real {
            last: Instant::now(),
        }
    };

    let mut canvas = ConsoleCanvas;
    let mut world = World::new(bounds);
    let mut scheduler = Scheduler::new(Config::new(seed));
    let mut clock_cadence = Cadence::new(CLOCK_CADENCE_PERIOD);
    let mut motion_cadence = Cadence::new(MOTION_CADENCE_PERIOD);
    clock_cadence.start();

    let mut completed = 0u32;
    while completed < args.batches {
        let elapsed = pacer.step();
        let mut events = Vec::new();

        for _ in 0..clock_cadence.advance(elapsed) {
            let now = clock.observe_second();
            world::apply(&mut world, Command::CheckClock { now }, &mut events)
                .context("check clock")?;
        }

        let mut commands = Vec::new();
        scheduler
            .handle(
                &events,
                query::schedule_state(&world),
                query::canvas_bounds(&world),
                &mut commands,
            )
            .context("schedule batch")?;
        for command in commands {
            world::apply(&mut world, command, &mut events).context("start batch")?;
        }

        for _ in 0..motion_cadence.advance(elapsed) {
            world::apply(&mut world, Command::Advance, &mut events).context("advance batch")?;
        }

        for event in &events {
            match event {
                Event::BatchStarted { count } => {
                    info!(count = *count, "batch started");
                    clock_cadence.stop();
                    motion_cadence.start();
                }
                Event::BatchCompleted => {
                    motion_cadence.stop();
                    clock_cadence.start();
                    completed += 1;
                    info!(completed, "batch completed");
                }
                _ => {}
            }
        }

        present(&events, &mut canvas).context("present events")?;
    }

    let mut events = Vec::new();
    world::apply(&mut world, Command::Shutdown, &mut events).context("shutdown")?;
    clock_cadence.stop();
    motion_cadence.stop();
    present(&events, &mut canvas).context("present shutdown")?;
    info!("engine halted");

    Ok(())
}
