//! How many hearts to add each tick, and how large they may be.

use crate::heart::HeartParticle;
use crate::pool::ParticlePool;
use crate::random::{RandomParameterSource, fix_min_max};
use crate::settings::{AnimationSpeed, HeartCounter};
use crate::viewport::Viewport;

/// Scale percent is divided by this to get the minimum size ratio.
const SCALE_DIVISOR: f64 = 150.0;
/// One extra heart per this much headroom under the ceiling.
const HEADROOM_PER_BATCH: usize = 10;

/// Size bounds, in whole pixels, for hearts spawned this tick.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpawnEnvelope {
    pub min_height: i32,
    pub max_height: i32,
    pub min_width: i32,
    pub max_width: i32,
}

impl SpawnEnvelope {
    /// Minimum size is `scale / 150` of the viewport, maximum twice that.
    /// Bounds never drop below one pixel.
    pub fn for_viewport(viewport: Viewport, scale_percent: i32) -> Self {
        let scale = f64::from(scale_percent);
        let (min_height, max_height) = size_bounds(viewport.height * scale / SCALE_DIVISOR);
        let (min_width, max_width) = size_bounds(viewport.width * scale / SCALE_DIVISOR);
        Self {
            min_height,
            max_height,
            min_width,
            max_width,
        }
    }
}

fn size_bounds(minimum: f64) -> (i32, i32) {
    let minimum = minimum as i32;
    let (min, max) = fix_min_max(minimum, minimum.saturating_mul(2));
    let min = min.max(1);
    (min, max.max(min))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpawnPlan {
    /// Hearts to add this tick.
    pub count: usize,
    /// Exclusive upper bound `count` was drawn below.
    pub max_batch: usize,
    pub envelope: SpawnEnvelope,
}

/// Exclusive upper bound on this tick's batch, or `None` at the ceiling.
///
/// Near the ceiling the bound is bumped from 1 to 2 so the draw from
/// `[1, bound)` is never empty.
pub fn max_batch(live_count: usize, maximum_hearts: usize) -> Option<usize> {
    if live_count >= maximum_hearts {
        return None;
    }
    let headroom = maximum_hearts - live_count;
    let bound = headroom / HEADROOM_PER_BATCH + 1;
    Some(if bound == 1 { 2 } else { bound })
}

pub fn plan(
    live_count: usize,
    maximum_hearts: usize,
    viewport: Viewport,
    scale_percent: i32,
    rng: &mut RandomParameterSource,
) -> Option<SpawnPlan> {
    let max_batch = max_batch(live_count, maximum_hearts)?;
    let count = rng.next(1, max_batch as i32) as usize;
    Some(SpawnPlan {
        count,
        max_batch,
        envelope: SpawnEnvelope::for_viewport(viewport, scale_percent),
    })
}

/// Start `plan.count` hearts, reusing pooled ones first, and count them in.
pub fn spawn_batch(
    plan: &SpawnPlan,
    pool: &mut ParticlePool,
    live: &mut Vec<HeartParticle>,
    counter: &HeartCounter,
    speed: AnimationSpeed,
    viewport_width: f64,
    rng: &mut RandomParameterSource,
) -> usize {
    for _ in 0..plan.count {
        let mut heart = pool.pop().unwrap_or_else(|| HeartParticle::new(rng));
        heart.reset(&plan.envelope, viewport_width, rng);
        heart.set_animation_speed(speed);
        heart.start();
        live.push(heart);
        counter.increase();
    }
    plan.count
}
