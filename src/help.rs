//! Key help overlay that fades out after it is shown.

use std::time::{Duration, Instant};

/// Opacity the overlay starts at when shown.
const SHOWN_OPACITY: f64 = 0.9;
/// How long the overlay lingers when shown at startup.
pub const STARTUP_SECONDS: u64 = 15;
/// How long the overlay lingers when toggled on by the user.
pub const TOGGLE_SECONDS: u64 = 60;

/// Keys handled by the screensaver, as shown in the overlay.
pub const KEY_BINDINGS: &[(&str, &str)] = &[
    ("+ / -", "Faster / slower animation"),
    (". / ,", "More / fewer hearts"),
    ("] / [", "Larger / smaller hearts"),
    ("S", "Toggle status"),
    ("O", "Options"),
    ("?", "Toggle this help"),
    ("Any other key", "Exit"),
];

#[derive(Debug, Default)]
pub struct HelpOverlay {
    shown: Option<(Instant, Duration)>,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, now: Instant, seconds: u64) {
        self.shown = Some((now, Duration::from_secs(seconds.max(1))));
    }

    pub fn hide(&mut self) {
        self.shown = None;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.is_open(now) {
            self.hide();
        } else {
            self.show(now, TOGGLE_SECONDS);
        }
    }

    pub fn is_open(&self, now: Instant) -> bool {
        self.opacity(now) > 0.0
    }

    /// Linear fade from the shown opacity to zero over the display duration.
    pub fn opacity(&self, now: Instant) -> f64 {
        let Some((shown_at, duration)) = self.shown else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(shown_at).as_secs_f64();
        let remaining = 1.0 - elapsed / duration.as_secs_f64();
        (SHOWN_OPACITY * remaining).max(0.0)
    }
}
