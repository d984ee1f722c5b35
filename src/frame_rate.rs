//! Rolling frames-per-second measurement for the status line.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const SAMPLE_WINDOW: Duration = Duration::from_secs(1);
pub const DEFAULT_SAMPLE_SIZE: usize = 15;

/// Counts frames over one-second windows and averages the last few windows.
#[derive(Debug)]
pub struct FrameRateMonitor {
    sample_size: usize,
    samples: VecDeque<f64>,
    frame_count: u32,
    window_start: Option<Instant>,
    frames_per_second: f64,
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_SIZE)
    }
}

impl FrameRateMonitor {
    pub fn new(sample_size: usize) -> Self {
        let sample_size = sample_size.max(1);
        Self {
            sample_size,
            samples: VecDeque::with_capacity(sample_size),
            frame_count: 0,
            window_start: None,
            frames_per_second: 0.0,
        }
    }

    pub fn record_frame(&mut self, now: Instant) {
        let start = *self.window_start.get_or_insert(now);
        self.frame_count += 1;

        let elapsed = now.duration_since(start);
        if elapsed > SAMPLE_WINDOW {
            self.samples.push_back(f64::from(self.frame_count) / elapsed.as_secs_f64());
            while self.samples.len() > self.sample_size {
                self.samples.pop_front();
            }
            self.frames_per_second = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
            self.frame_count = 0;
            self.window_start = Some(now);
        }
    }

    /// Average over the retained windows; zero until the first window closes.
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    pub fn reset(&mut self) {
        self.samples.clear();
        self.frame_count = 0;
        self.window_start = None;
        self.frames_per_second = 0.0;
    }
}
