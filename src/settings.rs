//! Persistence model, value ranges and the shared live heart counter.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// File name used under the per-user config directory.
const SETTINGS_FILE: &str = "settings.json";

pub const MINIMUM_FRAMES_PER_SECOND: i32 = 30;
pub const MAXIMUM_FRAMES_PER_SECOND: i32 = 60;
const DEFAULT_FRAMES_PER_SECOND: i32 = 45;

pub const MINIMUM_MAXIMUM_HEARTS: i32 = 10;
pub const MAXIMUM_MAXIMUM_HEARTS: i32 = 100;
const DEFAULT_MAXIMUM_HEARTS: i32 = 55;

pub const MINIMUM_SCALE: i32 = 5;
pub const MAXIMUM_SCALE: i32 = 15;
const DEFAULT_SCALE: i32 = 10;

/// Pace of the falling animation.
///
/// Each speed pairs a step duration (the time over which a heart falls by its
/// gravity, also used as the cull/spawn tick interval) with the divisor that
/// turns gravity into an opacity loss per step.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl AnimationSpeed {
    pub const ALL: [AnimationSpeed; 3] = [
        AnimationSpeed::Slow,
        AnimationSpeed::Normal,
        AnimationSpeed::Fast,
    ];

    /// Duration of one animation step.
    pub fn step(self) -> Duration {
        match self {
            AnimationSpeed::Slow => Duration::from_millis(150),
            AnimationSpeed::Normal => Duration::from_millis(100),
            AnimationSpeed::Fast => Duration::from_millis(50),
        }
    }

    /// Interval between cull/spawn ticks.
    pub fn tick_interval(self) -> Duration {
        self.step()
    }

    /// Larger divisors fade more slowly per step.
    pub fn opacity_divisor(self) -> f64 {
        match self {
            AnimationSpeed::Slow => 900.0,
            AnimationSpeed::Normal => 950.0,
            AnimationSpeed::Fast => 1000.0,
        }
    }

    pub fn faster(self) -> Self {
        match self {
            AnimationSpeed::Slow => AnimationSpeed::Normal,
            AnimationSpeed::Normal | AnimationSpeed::Fast => AnimationSpeed::Fast,
        }
    }

    pub fn slower(self) -> Self {
        match self {
            AnimationSpeed::Fast => AnimationSpeed::Normal,
            AnimationSpeed::Normal | AnimationSpeed::Slow => AnimationSpeed::Slow,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "Slow",
            AnimationSpeed::Normal => "Normal",
            AnimationSpeed::Fast => "Fast",
        }
    }
}

/// Settings persisted to `settings.json`.
///
/// Numeric values are only reachable through clamping setters so they always
/// sit inside their configured range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    frames_per_second: i32,
    maximum_hearts: i32,
    scale: i32,
    /// Selected animation pace.
    pub animation_speed: AnimationSpeed,
    /// Whether the status line is drawn on the screensaver surface.
    pub show_status: bool,
    /// Whether the key help overlay is shown when the screensaver starts.
    pub show_help: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            maximum_hearts: DEFAULT_MAXIMUM_HEARTS,
            scale: DEFAULT_SCALE,
            animation_speed: AnimationSpeed::Normal,
            show_status: false,
            show_help: true,
        }
    }
}

impl AppSettings {
    pub fn frames_per_second(&self) -> i32 {
        self.frames_per_second
    }

    pub fn set_frames_per_second(&mut self, value: i32) {
        self.frames_per_second = value.clamp(MINIMUM_FRAMES_PER_SECOND, MAXIMUM_FRAMES_PER_SECOND);
    }

    /// Population ceiling for the live heart counter.
    pub fn maximum_hearts(&self) -> i32 {
        self.maximum_hearts
    }

    pub fn set_maximum_hearts(&mut self, value: i32) {
        self.maximum_hearts = value.clamp(MINIMUM_MAXIMUM_HEARTS, MAXIMUM_MAXIMUM_HEARTS);
    }

    /// Spawn size as a percentage of the viewport.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    pub fn set_scale(&mut self, value: i32) {
        self.scale = value.clamp(MINIMUM_SCALE, MAXIMUM_SCALE);
    }

    /// Time between repaints at the configured frame rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frames_per_second.max(1)))
    }

    /// Pull values edited outside the setters (e.g. a hand-written file) back into range.
    fn clamp_all(&mut self) {
        self.set_frames_per_second(self.frames_per_second);
        self.set_maximum_hearts(self.maximum_hearts);
        self.set_scale(self.scale);
    }
}

/// Live heart population shared by every animation surface.
///
/// Only mutated through increment/decrement, and a decrement at zero leaves it
/// at zero.
#[derive(Debug, Default)]
pub struct HeartCounter {
    count: AtomicUsize,
}

impl HeartCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Add one heart and return the new population.
    pub fn increase(&self) -> usize {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Remove one heart, floored at zero, and return the new population.
    pub fn decrease(&self) -> usize {
        let previous = self
            .count
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| Some(n.saturating_sub(1)))
            .unwrap_or_else(|current| current);
        previous.saturating_sub(1)
    }

}

/// Build the settings path and ensure the directory exists.
fn settings_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("dev", "hearts", "hearts_screensaver")
        .ok_or_else(|| anyhow!("cannot determine config directory"))?;
    let config_dir = proj_dirs.config_dir();
    fs::create_dir_all(config_dir)
        .with_context(|| format!("failed to create {}", config_dir.display()))?;
    Ok(config_dir.join(SETTINGS_FILE))
}

/// Load settings from disk, returning defaults when missing or unreadable.
pub fn load() -> AppSettings {
    let path = match settings_path() {
        Ok(path) => path,
        Err(err) => {
            warn!("using default settings: {err:#}");
            return AppSettings::default();
        }
    };
    if !path.exists() {
        debug!("no settings at {}, using defaults", path.display());
        return AppSettings::default();
    }
    match load_from(&path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("using default settings: {err:#}");
            AppSettings::default()
        }
    }
}

/// Read settings from a specific file, clamping every value into range.
pub fn load_from(path: &Path) -> Result<AppSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut settings: AppSettings = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    settings.clamp_all();
    Ok(settings)
}

/// Persist settings to disk as pretty JSON.
pub fn save(settings: &AppSettings) -> Result<()> {
    let path = settings_path()?;
    save_to(settings, &path)
}

pub fn save_to(settings: &AppSettings, path: &Path) -> Result<()> {
    let contents = serde_json::to_string_pretty(settings)?;
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    debug!("saved settings to {}", path.display());
    Ok(())
}
