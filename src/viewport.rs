//! Current drawable area of the animation surface.

/// Width and height in logical pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }
}

/// Remembers the last size reported by the host surface.
///
/// Reports nothing until the surface has been laid out with a usable size.
#[derive(Debug, Default)]
pub struct ViewportTracker {
    current: Option<Viewport>,
}

impl ViewportTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the latest surface size; an empty size detaches the viewport.
    pub fn update(&mut self, width: f64, height: f64) {
        let viewport = Viewport { width, height };
        self.current = (!viewport.is_empty()).then_some(viewport);
    }

    pub fn bounds(&self) -> Option<Viewport> {
        self.current
    }
}
