//! A single falling heart and its per-frame motion rule.

use std::time::Duration;

use crate::geometry::{DESIGN_HEIGHT, DESIGN_WIDTH};
use crate::random::{Gradient, RandomParameterSource, Rgb};
use crate::render::HeartDraw;
use crate::settings::AnimationSpeed;
use crate::spawn::SpawnEnvelope;

pub const MINIMUM_GRAVITY: f64 = 6.0;
pub const MAXIMUM_GRAVITY: f64 = 12.0;
pub const MINIMUM_RANDOM_ANGLE: f64 = 25.0;
pub const MAXIMUM_RANDOM_ANGLE: f64 = 35.0;

/// Opacity every heart starts (and restarts) at.
pub const STARTING_OPACITY: f64 = 0.9;

/// Milliseconds of half rotation swing per unit of inverted gravity.
const ROTATION_MILLIS_PER_GRAVITY: f64 = 250.0;

#[derive(Debug, Clone)]
pub struct HeartParticle {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    angle: f64,
    opacity: f64,
    gravity: f64,
    minimum_angle: f64,
    maximum_angle: f64,
    x_velocity_ratio: f64,
    negative_x_velocity: bool,
    fill: Gradient,
    stroke: Rgb,
    animation_speed: AnimationSpeed,
    /// Time into the current rotation cycle.
    rotation_elapsed: f64,
    running: bool,
}

impl HeartParticle {
    /// A stopped heart at its design size with freshly drawn motion and colors.
    pub fn new(rng: &mut RandomParameterSource) -> Self {
        let mut heart = Self {
            left: 0.0,
            top: 0.0,
            width: DESIGN_WIDTH,
            height: DESIGN_HEIGHT,
            angle: 0.0,
            opacity: STARTING_OPACITY,
            gravity: MINIMUM_GRAVITY,
            minimum_angle: -MINIMUM_RANDOM_ANGLE,
            maximum_angle: MINIMUM_RANDOM_ANGLE,
            x_velocity_ratio: 0.25,
            negative_x_velocity: false,
            fill: rng.gradient(),
            stroke: rng.solid_color(),
            animation_speed: AnimationSpeed::Normal,
            rotation_elapsed: 0.0,
            running: false,
        };
        heart.set_default_values(rng);
        heart
    }

    fn set_default_values(&mut self, rng: &mut RandomParameterSource) {
        self.set_gravity(rng.gravity());
        self.negative_x_velocity = rng.negative_x_velocity();
        self.x_velocity_ratio = rng.x_velocity_ratio();
        self.opacity = STARTING_OPACITY;
        self.rotation_elapsed = 0.0;
        self.angle = self.starting_angle();
        self.running = false;
    }

    /// Re-randomize everything for another trip down the screen.
    ///
    /// The heart is sized from `envelope`, placed somewhere across the
    /// viewport width and lifted just above the top edge.
    pub fn reset(&mut self, envelope: &SpawnEnvelope, viewport_width: f64, rng: &mut RandomParameterSource) {
        self.set_default_values(rng);
        self.fill = rng.gradient();
        self.stroke = rng.solid_color();
        self.height = f64::from(rng.size(envelope.min_height, envelope.max_height));
        self.width = f64::from(rng.size(envelope.min_width, envelope.max_width));
        self.left = rng.position(viewport_width);
        self.top = -self.height;
    }

    pub fn start(&mut self) {
        self.rotation_elapsed = 0.0;
        self.angle = self.starting_angle();
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Integrate motion, fade and rotation over `elapsed`.
    ///
    /// One animation step moves the heart down by its gravity, sideways by
    /// gravity times its velocity ratio and fades it by gravity over the
    /// speed's opacity divisor. Partial steps scale linearly.
    pub fn advance(&mut self, elapsed: Duration) {
        if !self.running {
            return;
        }
        let steps = elapsed.as_secs_f64() / self.animation_speed.step().as_secs_f64();

        self.top += self.gravity * steps;
        self.left += self.x_velocity() * steps;
        self.opacity -= self.gravity / self.animation_speed.opacity_divisor() * steps;

        let cycle = 2.0 * self.rotation_half_period();
        self.rotation_elapsed = (self.rotation_elapsed + elapsed.as_secs_f64()) % cycle;
        self.angle = self.angle_at(self.rotation_elapsed);
    }

    /// Whether any part of the heart can still be seen.
    ///
    /// The envelope extends one heart size beyond the left and top edges; a
    /// heart that has faded below zero opacity is gone regardless of position.
    pub fn is_visible(&self, viewport_height: f64, viewport_width: f64) -> bool {
        !(self.left < -self.width
            || self.left > viewport_width
            || self.top < -self.height
            || self.top > viewport_height
            || self.opacity < 0.0)
    }

    pub fn set_animation_speed(&mut self, speed: AnimationSpeed) {
        self.animation_speed = speed;
    }

    pub fn animation_speed(&self) -> AnimationSpeed {
        self.animation_speed
    }

    /// Clamp gravity into range and rederive the rotation swing from it.
    pub fn set_gravity(&mut self, value: f64) {
        self.gravity = value.clamp(MINIMUM_GRAVITY, MAXIMUM_GRAVITY);
        let gravity_factor = self.gravity / MAXIMUM_GRAVITY;
        self.set_maximum_angle(
            MINIMUM_RANDOM_ANGLE + gravity_factor * (MAXIMUM_RANDOM_ANGLE - MINIMUM_RANDOM_ANGLE),
        );
    }

    /// Set the swing bound; the minimum mirrors it on the other side of zero.
    pub fn set_maximum_angle(&mut self, value: f64) {
        self.maximum_angle = value.abs();
        self.minimum_angle = -value.abs();
    }

    pub fn draw_params(&self) -> HeartDraw {
        HeartDraw {
            left: self.left,
            top: self.top,
            width: self.width,
            height: self.height,
            angle: self.angle,
            opacity: self.opacity.clamp(0.0, 1.0),
            fill: self.fill,
            stroke: self.stroke,
        }
    }

    /// Horizontal movement per step, signed by drift direction.
    fn x_velocity(&self) -> f64 {
        let speed = self.gravity * self.x_velocity_ratio;
        if self.negative_x_velocity { -speed } else { speed }
    }

    /// Seconds to swing from one bound to the other; heavier hearts swing faster.
    fn rotation_half_period(&self) -> f64 {
        (MAXIMUM_GRAVITY - self.gravity + MINIMUM_GRAVITY) * ROTATION_MILLIS_PER_GRAVITY / 1000.0
    }

    fn rotation_bounds(&self) -> (f64, f64) {
        if self.negative_x_velocity {
            (self.maximum_angle, self.minimum_angle)
        } else {
            (self.minimum_angle, self.maximum_angle)
        }
    }

    fn starting_angle(&self) -> f64 {
        self.rotation_bounds().0
    }

    fn angle_at(&self, cycle_time: f64) -> f64 {
        let half = self.rotation_half_period();
        let progress = if cycle_time <= half {
            cycle_time / half
        } else {
            2.0 - cycle_time / half
        };
        let (from, to) = self.rotation_bounds();
        from + (to - from) * progress
    }
}

#[cfg(test)]
impl HeartParticle {
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn minimum_angle(&self) -> f64 {
        self.minimum_angle
    }

    pub fn maximum_angle(&self) -> f64 {
        self.maximum_angle
    }

    pub fn x_velocity_ratio(&self) -> f64 {
        self.x_velocity_ratio
    }

    pub fn negative_x_velocity(&self) -> bool {
        self.negative_x_velocity
    }

    /// A running heart with explicit geometry.
    pub(crate) fn placed(left: f64, top: f64, width: f64, height: f64, opacity: f64) -> Self {
        let mut rng = RandomParameterSource::from_seed(0);
        let mut heart = Self::new(&mut rng);
        heart.left = left;
        heart.top = top;
        heart.width = width;
        heart.height = height;
        heart.opacity = opacity;
        heart.running = true;
        heart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> SpawnEnvelope {
        SpawnEnvelope {
            min_height: 72,
            max_height: 144,
            min_width: 128,
            max_width: 256,
        }
    }

    fn assert_legal(heart: &HeartParticle) {
        assert!((MINIMUM_GRAVITY..=MAXIMUM_GRAVITY).contains(&heart.gravity()));
        assert!((0.25..0.50).contains(&heart.x_velocity_ratio()));
        assert!((MINIMUM_RANDOM_ANGLE..=MAXIMUM_RANDOM_ANGLE).contains(&heart.maximum_angle()));
        assert_eq!(heart.minimum_angle(), -heart.maximum_angle());
        assert_eq!(heart.opacity(), STARTING_OPACITY);
    }

    #[test]
    fn visibility_boundary() {
        let (h, w) = (600.0, 800.0);
        assert!(!HeartParticle::placed(-150.0, 50.0, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(HeartParticle::placed(-100.0, 50.0, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(HeartParticle::placed(800.0, 50.0, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(!HeartParticle::placed(800.5, 50.0, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(HeartParticle::placed(10.0, -100.0, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(!HeartParticle::placed(10.0, -100.5, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(HeartParticle::placed(10.0, 600.0, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(!HeartParticle::placed(10.0, 601.0, 100.0, 100.0, 0.5).is_visible(h, w));
        assert!(HeartParticle::placed(10.0, 10.0, 100.0, 100.0, 0.0).is_visible(h, w));
        assert!(!HeartParticle::placed(10.0, 10.0, 100.0, 100.0, -0.01).is_visible(h, w));
    }

    #[test]
    fn gravity_is_clamped_and_drives_the_swing() {
        let mut rng = RandomParameterSource::from_seed(1);
        let mut heart = HeartParticle::new(&mut rng);

        heart.set_gravity(50.0);
        assert_eq!(heart.gravity(), MAXIMUM_GRAVITY);
        assert_eq!(heart.maximum_angle(), MAXIMUM_RANDOM_ANGLE);
        heart.set_gravity(50.0);
        assert_eq!(heart.gravity(), MAXIMUM_GRAVITY);

        heart.set_gravity(0.0);
        assert_eq!(heart.gravity(), MINIMUM_GRAVITY);
        assert_eq!(heart.maximum_angle(), 30.0);
        assert_eq!(heart.minimum_angle(), -30.0);
    }

    #[test]
    fn negative_maximum_angle_is_mirrored() {
        let mut rng = RandomParameterSource::from_seed(1);
        let mut heart = HeartParticle::new(&mut rng);
        heart.set_maximum_angle(-28.0);
        assert_eq!(heart.maximum_angle(), 28.0);
        assert_eq!(heart.minimum_angle(), -28.0);
    }

    #[test]
    fn reset_spawns_above_viewport_within_envelope() {
        let mut rng = RandomParameterSource::from_seed(9);
        let mut heart = HeartParticle::new(&mut rng);
        for _ in 0..200 {
            heart.reset(&envelope(), 1920.0, &mut rng);
            assert_legal(&heart);
            assert!((72.0..144.0).contains(&heart.height()));
            assert!((128.0..256.0).contains(&heart.width()));
            assert!((0.0..1920.0).contains(&heart.left()));
            assert_eq!(heart.top(), -heart.height());
            assert!(!heart.is_running());
        }
    }

    #[test]
    fn one_step_moves_by_gravity() {
        let mut rng = RandomParameterSource::from_seed(4);
        let mut heart = HeartParticle::new(&mut rng);
        heart.reset(&envelope(), 1000.0, &mut rng);
        heart.set_gravity(10.0);
        heart.start();

        let (left, top) = (heart.left(), heart.top());
        heart.advance(AnimationSpeed::Normal.step());

        assert!((heart.top() - (top + 10.0)).abs() < 1e-9);
        let drift = 10.0 * heart.x_velocity_ratio();
        let expected_left = if heart.negative_x_velocity() { left - drift } else { left + drift };
        assert!((heart.left() - expected_left).abs() < 1e-9);
        assert!((heart.opacity() - (STARTING_OPACITY - 10.0 / 950.0)).abs() < 1e-9);
    }

    #[test]
    fn faster_speed_covers_more_ground_per_second() {
        let mut rng = RandomParameterSource::from_seed(4);
        let mut slow = HeartParticle::new(&mut rng);
        slow.set_gravity(8.0);
        let mut fast = slow.clone();
        slow.set_animation_speed(AnimationSpeed::Slow);
        fast.set_animation_speed(AnimationSpeed::Fast);
        slow.start();
        fast.start();

        slow.advance(Duration::from_secs(1));
        fast.advance(Duration::from_secs(1));
        assert!(fast.top() > slow.top());
        assert!(fast.opacity() < slow.opacity());
    }

    #[test]
    fn opacity_never_rises_while_running() {
        let mut rng = RandomParameterSource::from_seed(12);
        let mut heart = HeartParticle::new(&mut rng);
        heart.start();
        let mut last = heart.opacity();
        for _ in 0..500 {
            heart.advance(Duration::from_millis(16));
            assert!(heart.opacity() <= last);
            last = heart.opacity();
        }
    }

    #[test]
    fn rotation_ping_pongs_between_bounds() {
        let mut rng = RandomParameterSource::from_seed(2);
        let mut heart = HeartParticle::new(&mut rng);
        heart.set_gravity(12.0);
        heart.start();
        let start = heart.angle();
        assert_eq!(start.abs(), heart.maximum_angle());

        // Half period at gravity 12 is 1.5s.
        heart.advance(Duration::from_millis(1500));
        assert!((heart.angle() + start).abs() < 1e-6);
        heart.advance(Duration::from_millis(1500));
        assert!((heart.angle() - start).abs() < 1e-6);

        for _ in 0..300 {
            heart.advance(Duration::from_millis(17));
            assert!(heart.angle() >= heart.minimum_angle() - 1e-9);
            assert!(heart.angle() <= heart.maximum_angle() + 1e-9);
        }
    }

    #[test]
    fn stopped_heart_is_frozen() {
        let mut rng = RandomParameterSource::from_seed(6);
        let mut heart = HeartParticle::new(&mut rng);
        heart.start();
        heart.advance(Duration::from_millis(300));
        heart.stop();

        let snapshot = (heart.left(), heart.top(), heart.opacity(), heart.angle());
        heart.advance(Duration::from_secs(5));
        assert_eq!(snapshot, (heart.left(), heart.top(), heart.opacity(), heart.angle()));
    }

    #[test]
    fn draw_params_clamp_opacity() {
        let heart = HeartParticle::placed(0.0, 0.0, 10.0, 10.0, -0.2);
        assert_eq!(heart.draw_params().opacity, 0.0);
    }
}
