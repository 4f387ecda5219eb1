#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized balloon population generation over a derived bounding region.

use magic_balloons_core::{
    CanvasBounds, CanvasPoint, InvalidBoundsError, SpriteSeed, VariantId, HORIZONTAL_SPAWN_MARGIN,
    MINIMUM_SPAWN_WIDTH, OFFSCREEN_CLEARANCE,
};
use rand::Rng;

/// Smallest number of balloons drawn for one batch.
const MIN_BATCH_SIZE: u32 = 5;
/// Exclusive upper bound on the number of balloons drawn for one batch.
const MAX_BATCH_SIZE: u32 = 15;
/// Number of balloon artwork variants available to the canvas.
const VARIANT_COUNT: u8 = 4;
/// Slowest rise speed drawn for one balloon, in canvas units per motion tick.
const MIN_RISE_SPEED: u32 = 10;
/// Exclusive upper bound on the rise speed drawn for one balloon.
const MAX_RISE_SPEED: u32 = 20;

/// Generates a random batch of balloon seeds within the provided bounds.
///
/// Batch size is uniform in `[5, 15)`. Each balloon draws a variant in
/// `[1, 5)`, a horizontal position that keeps a
/// [`HORIZONTAL_SPAWN_MARGIN`]-unit margin from both canvas edges, and a rise
/// speed in `[10, 20)`; the vertical spawn position sits
/// [`OFFSCREEN_CLEARANCE`] units below the canvas bottom so every balloon
/// animates fully into view.
///
/// The random source is injected so batches are reproducible from a seed.
/// Returns [`InvalidBoundsError`] when the canvas is too narrow to hold any
/// spawn position inside the margins.
pub fn generate_batch<R>(
    bounds: &CanvasBounds,
    rng: &mut R,
) -> Result<Vec<SpriteSeed>, InvalidBoundsError>
where
    R: Rng + ?Sized,
{
    if bounds.total_width() <= MINIMUM_SPAWN_WIDTH {
        return Err(InvalidBoundsError {
            total_width: bounds.total_width(),
        });
    }

    let spawn_y = bounds.max_height() as i32 + OFFSCREEN_CLEARANCE;
    let x_range = HORIZONTAL_SPAWN_MARGIN..bounds.total_width() - HORIZONTAL_SPAWN_MARGIN;

    let count = rng.gen_range(MIN_BATCH_SIZE..MAX_BATCH_SIZE);
    let mut seeds = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let variant = VariantId::new(rng.gen_range(1..=VARIANT_COUNT));
        let x = rng.gen_range(x_range.clone()) as i32;
        let rise_speed = rng.gen_range(MIN_RISE_SPEED..MAX_RISE_SPEED);
        seeds.push(SpriteSeed {
            variant,
            position: CanvasPoint::new(x, spawn_y),
            rise_speed,
        });
    }

    Ok(seeds)
}
