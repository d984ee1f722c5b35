//! Bounded random draws for heart parameters and colors.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;

use crate::heart::{MAXIMUM_GRAVITY, MINIMUM_GRAVITY};

/// Lower bound of the base channel for gradient fills.
const GRADIENT_BASE_MINIMUM: i32 = 60;
/// Darkening applied to the middle stop.
const GRADIENT_FIRST_PASS: u8 = 25;
/// Darkening applied to the outer stop.
const GRADIENT_SECOND_PASS: u8 = 60;
/// Offset of the middle gradient stop.
pub const GRADIENT_MIDDLE_OFFSET: f32 = 0.531;

/// Horizontal velocity ratio range in percent, half-open.
const X_VELOCITY_PERCENT: (i32, i32) = (25, 50);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Subtract `amount` from every channel, stopping at zero.
    pub fn darken(self, amount: u8) -> Self {
        Self {
            r: self.r.saturating_sub(amount),
            g: self.g.saturating_sub(amount),
            b: self.b.saturating_sub(amount),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientStop {
    pub color: Rgb,
    /// Position of the stop between the center (0.0) and the edge (1.0).
    pub offset: f32,
}

/// Three-stop fill running from a light center to a darker edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Gradient {
    pub stops: [GradientStop; 3],
}

impl Gradient {
    pub fn from_base(base: Rgb) -> Self {
        Self {
            stops: [
                GradientStop { color: base, offset: 0.0 },
                GradientStop {
                    color: base.darken(GRADIENT_FIRST_PASS),
                    offset: GRADIENT_MIDDLE_OFFSET,
                },
                GradientStop {
                    color: base.darken(GRADIENT_SECOND_PASS),
                    offset: 1.0,
                },
            ],
        }
    }
}

/// Order a pair so the first value is the smaller.
pub fn fix_min_max<T: PartialOrd>(min: T, max: T) -> (T, T) {
    if min > max { (max, min) } else { (min, max) }
}

/// Source of every random value a heart needs.
#[derive(Debug, Clone)]
pub struct RandomParameterSource {
    rng: ChaChaRng,
}

impl RandomParameterSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaChaRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaChaRng::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `[min, max)`; an empty range yields `min`.
    pub fn next(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..max)
    }

    /// Whole-number gravity inside the clamped gravity range.
    pub fn gravity(&mut self) -> f64 {
        f64::from(self.next(MINIMUM_GRAVITY as i32, MAXIMUM_GRAVITY as i32 + 1))
    }

    pub fn x_velocity_ratio(&mut self) -> f64 {
        f64::from(self.next(X_VELOCITY_PERCENT.0, X_VELOCITY_PERCENT.1)) / 100.0
    }

    pub fn negative_x_velocity(&mut self) -> bool {
        self.next(0, 2) == 1
    }

    /// Dimension drawn from an envelope whose bounds may arrive inverted.
    pub fn size(&mut self, min: i32, max: i32) -> i32 {
        let (min, max) = fix_min_max(min, max);
        self.next(min, max)
    }

    /// Left edge somewhere across the viewport width.
    pub fn position(&mut self, viewport_width: f64) -> f64 {
        f64::from(self.next(0, viewport_width as i32))
    }

    pub fn gradient(&mut self) -> Gradient {
        let blue = self.channel(GRADIENT_BASE_MINIMUM);
        let green = self.channel(GRADIENT_BASE_MINIMUM);
        let red = self.channel(GRADIENT_BASE_MINIMUM);
        Gradient::from_base(Rgb::new(red, green, blue))
    }

    pub fn solid_color(&mut self) -> Rgb {
        let blue = self.channel(0);
        let green = self.channel(0);
        let red = self.channel(0);
        Rgb::new(red, green, blue)
    }

    fn channel(&mut self, minimum: i32) -> u8 {
        // Range tops out at 255 so the cast cannot truncate.
        self.next(minimum, 256) as u8
    }
}
