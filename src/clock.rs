//! Drives every live heart: integration each frame, cull and spawn each tick.

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

use crate::heart::HeartParticle;
use crate::pool::ParticlePool;
use crate::random::RandomParameterSource;
use crate::render::RenderSink;
use crate::settings::{AnimationSpeed, AppSettings, HeartCounter};
use crate::spawn;
use crate::viewport::Viewport;

/// What one tick did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub culled: usize,
    pub spawned: usize,
}

/// Owner of the live hearts and the pool they are recycled through.
///
/// A heart is always in exactly one of the two collections.
#[derive(Debug)]
pub struct AnimationClock {
    live: Vec<HeartParticle>,
    pool: ParticlePool,
    counter: Arc<HeartCounter>,
    animation_speed: AnimationSpeed,
}

impl AnimationClock {
    pub fn new(counter: Arc<HeartCounter>) -> Self {
        Self {
            live: Vec::new(),
            pool: ParticlePool::new(),
            counter,
            animation_speed: AnimationSpeed::default(),
        }
    }

    /// Move every live heart forward by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) {
        for heart in &mut self.live {
            heart.advance(elapsed);
        }
    }

    /// Cull hearts that left the viewport, then spawn a batch toward the ceiling.
    ///
    /// Returns `None` without touching anything while no viewport is attached.
    pub fn on_tick(
        &mut self,
        viewport: Option<Viewport>,
        settings: &AppSettings,
        rng: &mut RandomParameterSource,
    ) -> Option<TickReport> {
        let viewport = viewport.filter(|v| !v.is_empty())?;
        if settings.animation_speed != self.animation_speed {
            self.set_animation_speed(settings.animation_speed);
        }

        let culled = self.cull(viewport);

        let maximum_hearts = usize::try_from(settings.maximum_hearts()).unwrap_or(0);
        let spawned = match spawn::plan(self.counter.get(), maximum_hearts, viewport, settings.scale(), rng) {
            Some(plan) => spawn::spawn_batch(
                &plan,
                &mut self.pool,
                &mut self.live,
                &self.counter,
                self.animation_speed,
                viewport.width,
                rng,
            ),
            None => 0,
        };

        if culled > 0 || spawned > 0 {
            trace!(culled, spawned, live = self.live_count(), pooled = self.pooled_count(), "tick");
        }
        Some(TickReport { culled, spawned })
    }

    /// Visit from the last index down so removals never shift an unvisited heart.
    fn cull(&mut self, viewport: Viewport) -> usize {
        let mut culled = 0;
        for i in (0..self.live.len()).rev() {
            if !self.live[i].is_visible(viewport.height, viewport.width) {
                let heart = self.live.remove(i);
                self.pool.push(heart);
                self.counter.decrease();
                culled += 1;
            }
        }
        culled
    }

    pub fn set_animation_speed(&mut self, speed: AnimationSpeed) {
        self.animation_speed = speed;
        for heart in &mut self.live {
            heart.set_animation_speed(speed);
        }
    }

    pub fn draw(&self, sink: &mut impl RenderSink) {
        for heart in &self.live {
            sink.draw_heart(&heart.draw_params());
        }
    }

    /// Retire every live heart into the pool.
    pub fn clear(&mut self) {
        for heart in self.live.drain(..) {
            self.pool.push(heart);
            self.counter.decrease();
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn pooled_count(&self) -> usize {
        self.pool.len()
    }

    #[cfg(test)]
    pub fn hearts(&self) -> &[HeartParticle] {
        &self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeartDraw;

    const FULL_HD: Viewport = Viewport {
        width: 1920.0,
        height: 1080.0,
    };

    fn settings(maximum_hearts: i32, scale: i32) -> AppSettings {
        let mut settings = AppSettings::default();
        settings.set_maximum_hearts(maximum_hearts);
        settings.set_scale(scale);
        settings
    }

    #[test]
    fn tick_without_viewport_is_skipped() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(Arc::clone(&counter));
        let mut rng = RandomParameterSource::from_seed(1);

        assert_eq!(clock.on_tick(None, &settings(30, 10), &mut rng), None);
        let empty = Viewport { width: 0.0, height: 0.0 };
        assert_eq!(clock.on_tick(Some(empty), &settings(30, 10), &mut rng), None);
        assert_eq!(clock.live_count(), 0);
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn population_converges_to_ceiling_without_culling() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(Arc::clone(&counter));
        let mut rng = RandomParameterSource::from_seed(2);
        let settings = settings(30, 10);

        for _ in 0..200 {
            let report = clock.on_tick(Some(FULL_HD), &settings, &mut rng).unwrap();
            assert_eq!(report.culled, 0);
            assert!(counter.get() <= 30);
            assert_eq!(counter.get(), clock.live_count());
        }
        assert_eq!(counter.get(), 30);

        for heart in clock.hearts() {
            assert!((72.0..144.0).contains(&heart.height()));
            assert!((128.0..256.0).contains(&heart.width()));
        }
    }

    #[test]
    fn culls_exactly_the_invisible_hearts_in_order() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(Arc::clone(&counter));
        let lefts = [10.0, -500.0, 20.0, -600.0, -700.0, 30.0];
        for left in lefts {
            clock.live.push(HeartParticle::placed(left, 10.0, 100.0, 100.0, 0.5));
            counter.increase();
        }

        let settings = settings(10, 10);
        let mut rng = RandomParameterSource::from_seed(3);
        let viewport = Viewport { width: 800.0, height: 600.0 };
        assert_eq!(clock.cull(viewport), 3);

        let survivors: Vec<f64> = clock.hearts().iter().map(|h| h.left()).collect();
        assert_eq!(survivors, vec![10.0, 20.0, 30.0]);
        assert_eq!(clock.pooled_count(), 3);
        assert_eq!(counter.get(), 3);

        let report = clock.on_tick(Some(viewport), &settings, &mut rng).unwrap();
        assert_eq!(report.culled, 0);
        assert!(report.spawned >= 1);
    }

    #[test]
    fn culled_hearts_are_reused_before_new_ones() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(Arc::clone(&counter));
        let mut rng = RandomParameterSource::from_seed(4);
        let settings = settings(10, 10);

        clock.live.push(HeartParticle::placed(-999.0, 0.0, 10.0, 10.0, 0.5));
        counter.increase();

        let report = clock.on_tick(Some(FULL_HD), &settings, &mut rng).unwrap();
        assert_eq!(report.culled, 1);
        assert!(report.spawned >= 1);
        assert_eq!(clock.pooled_count(), 0);
        assert_eq!(clock.live_count(), report.spawned);
    }

    #[test]
    fn population_stays_bounded_while_animating() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(Arc::clone(&counter));
        let mut rng = RandomParameterSource::from_seed(5);
        let mut settings = settings(30, 10);
        settings.animation_speed = AnimationSpeed::Fast;
        let step = AnimationSpeed::Fast.tick_interval();

        let mut total_culled = 0;
        for _ in 0..5_000 {
            clock.advance(step);
            let report = clock.on_tick(Some(FULL_HD), &settings, &mut rng).unwrap();
            total_culled += report.culled;
            assert!(counter.get() <= 30);
            assert_eq!(counter.get(), clock.live_count());
        }
        assert!(total_culled > 0);
        assert!(clock.hearts().iter().all(|h| h.animation_speed() == AnimationSpeed::Fast));
        assert!(clock.hearts().iter().all(|h| h.is_visible(FULL_HD.height, FULL_HD.width)));
    }

    #[test]
    fn clocks_sharing_a_counter_share_the_ceiling() {
        let counter = Arc::new(HeartCounter::new());
        let mut primary = AnimationClock::new(Arc::clone(&counter));
        let mut secondary = AnimationClock::new(Arc::clone(&counter));
        let mut rng = RandomParameterSource::from_seed(6);
        let settings = settings(40, 10);

        for _ in 0..100 {
            primary.on_tick(Some(FULL_HD), &settings, &mut rng);
            secondary.on_tick(Some(FULL_HD), &settings, &mut rng);
        }
        assert_eq!(counter.get(), 40);
        assert_eq!(primary.live_count() + secondary.live_count(), 40);
    }

    #[test]
    fn lowering_the_ceiling_stops_spawning() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(Arc::clone(&counter));
        let mut rng = RandomParameterSource::from_seed(7);
        for _ in 0..100 {
            clock.on_tick(Some(FULL_HD), &settings(50, 10), &mut rng);
        }
        assert_eq!(counter.get(), 50);

        let report = clock.on_tick(Some(FULL_HD), &settings(20, 10), &mut rng).unwrap();
        assert_eq!(report.spawned, 0);
        assert_eq!(counter.get(), 50);
    }

    #[test]
    fn speed_change_reaches_live_hearts() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(counter);
        let mut rng = RandomParameterSource::from_seed(8);
        let mut settings = settings(20, 10);
        clock.on_tick(Some(FULL_HD), &settings, &mut rng);

        settings.animation_speed = AnimationSpeed::Slow;
        clock.on_tick(Some(FULL_HD), &settings, &mut rng);
        assert!(clock.hearts().iter().all(|h| h.animation_speed() == AnimationSpeed::Slow));
    }

    #[test]
    fn draw_and_clear() {
        let counter = Arc::new(HeartCounter::new());
        let mut clock = AnimationClock::new(Arc::clone(&counter));
        let mut rng = RandomParameterSource::from_seed(9);
        for _ in 0..10 {
            clock.on_tick(Some(FULL_HD), &settings(20, 10), &mut rng);
        }

        let mut calls: Vec<HeartDraw> = Vec::new();
        clock.draw(&mut calls);
        assert_eq!(calls.len(), clock.live_count());
        assert_eq!(calls.len(), counter.get());
        assert!(calls.iter().all(|c| (0.0..=1.0).contains(&c.opacity)));

        let live = clock.live_count();
        clock.clear();
        assert_eq!(clock.live_count(), 0);
        assert_eq!(clock.pooled_count(), live);
        assert_eq!(counter.get(), 0);
    }
}
