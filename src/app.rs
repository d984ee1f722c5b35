use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use eframe::CreationContext;
use eframe::egui::{self, Align2, Color32, CursorIcon, FontId, Key, Pos2, RichText};
use tracing::{debug, info, warn};

use crate::clock::AnimationClock;
use crate::frame_rate::FrameRateMonitor;
use crate::help::{self, HelpOverlay, KEY_BINDINGS};
use crate::random::RandomParameterSource;
use crate::registration;
use crate::render::PainterSink;
use crate::settings::{self, AnimationSpeed, AppSettings, HeartCounter};
use crate::state::OptionsState;
use crate::theme;
use crate::viewport::ViewportTracker;

/// Pointer travel that ends the screensaver.
const MOUSE_EXIT_DISTANCE: f32 = 30.0;
/// Longest frame gap fed to the animation, so a stalled window does not teleport hearts.
const MAX_FRAME_GAP: Duration = Duration::from_millis(250);
const HEARTS_STEP: i32 = 5;
const SCALE_STEP: i32 = 1;

/// Action bound to a key on the screensaver surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum KeyCommand {
    Faster,
    Slower,
    MoreHearts,
    FewerHearts,
    Larger,
    Smaller,
    Options,
    ToggleHelp,
    ToggleStatus,
    Exit,
}

fn key_command(key: Key) -> KeyCommand {
    match key {
        Key::Plus | Key::Equals => KeyCommand::Faster,
        Key::Minus => KeyCommand::Slower,
        Key::Period => KeyCommand::MoreHearts,
        Key::Comma => KeyCommand::FewerHearts,
        Key::CloseBracket => KeyCommand::Larger,
        Key::OpenBracket => KeyCommand::Smaller,
        Key::O => KeyCommand::Options,
        Key::Questionmark | Key::Slash => KeyCommand::ToggleHelp,
        Key::S => KeyCommand::ToggleStatus,
        _ => KeyCommand::Exit,
    }
}

fn status_line(frames_per_second: f64, settings: &AppSettings, live: usize) -> String {
    format!(
        "{frames_per_second:.2} FPS - {}% - {live}/{} - {}",
        settings.scale(),
        settings.maximum_hearts(),
        settings.animation_speed.label()
    )
}

/// Full-screen animation surface.
pub struct ScreenSaverApp {
    settings: AppSettings,
    counter: Arc<HeartCounter>,
    clock: AnimationClock,
    viewport: ViewportTracker,
    rng: RandomParameterSource,
    frame_rate: FrameRateMonitor,
    help: HelpOverlay,
    last_frame: Option<Instant>,
    tick_elapsed: Duration,
    pointer_origin: Option<Pos2>,
    options: Option<OptionsState>,
    status: String,
    debug: bool,
}

impl ScreenSaverApp {
    pub fn new(cc: &CreationContext<'_>, settings: AppSettings, debug: bool) -> Self {
        theme::apply_screensaver_visuals(&cc.egui_ctx);
        let counter = Arc::new(HeartCounter::new());
        let mut help = HelpOverlay::new();
        if settings.show_help {
            help.show(Instant::now(), help::STARTUP_SECONDS);
        }
        Self {
            clock: AnimationClock::new(Arc::clone(&counter)),
            counter,
            viewport: ViewportTracker::new(),
            rng: RandomParameterSource::from_entropy(),
            frame_rate: FrameRateMonitor::default(),
            help,
            last_frame: None,
            tick_elapsed: Duration::ZERO,
            pointer_origin: None,
            options: None,
            status: String::new(),
            settings,
            debug,
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last))
            .min(MAX_FRAME_GAP);
        self.last_frame = Some(now);

        let screen = ctx.screen_rect();
        let previous = self.viewport.bounds();
        self.viewport
            .update(f64::from(screen.width()), f64::from(screen.height()));
        if let (Some(previous), Some(current)) = (previous, self.viewport.bounds()) {
            if previous != current {
                debug!(width = current.width, height = current.height, "viewport resized");
                self.clock.clear();
            }
        }

        if self.options.is_none() {
            self.handle_keys(ctx, now);
            if !self.debug && self.pointer_moved_far(ctx) {
                debug!("pointer moved, exiting");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }

        self.clock.advance(elapsed);
        self.tick_elapsed += elapsed;
        let interval = self.settings.animation_speed.tick_interval();
        if self.tick_elapsed >= interval {
            self.tick_elapsed = (self.tick_elapsed - interval).min(interval);
            self.clock
                .on_tick(self.viewport.bounds(), &self.settings, &mut self.rng);
        }
        self.frame_rate.record_frame(now);

        if !self.debug && self.options.is_none() {
            ctx.set_cursor_icon(CursorIcon::None);
        }

        egui::CentralPanel::default()
            .frame(theme::surface_frame())
            .show(ctx, |ui| {
                let painter = ui.painter();
                self.clock.draw(&mut PainterSink::new(painter));
                if self.settings.show_status || self.debug {
                    let line = status_line(
                        self.frame_rate.frames_per_second(),
                        &self.settings,
                        self.counter.get(),
                    );
                    painter.text(
                        screen.left_top() + egui::vec2(12.0, 12.0),
                        Align2::LEFT_TOP,
                        line,
                        FontId::monospace(16.0),
                        Color32::WHITE,
                    );
                }
            });

        self.draw_help(ctx, now);
        self.options_window(ctx);

        ctx.request_repaint_after(self.settings.frame_interval());
    }

    fn handle_keys(&mut self, ctx: &egui::Context, now: Instant) {
        let keys: Vec<Key> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: true,
                        repeat: false,
                        ..
                    } => Some(*key),
                    _ => None,
                })
                .collect()
        });

        for key in keys {
            let command = key_command(key);
            if command == KeyCommand::Exit {
                if !self.debug || key == Key::Escape {
                    debug!(?key, "key pressed, exiting");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
                continue;
            }
            self.apply_command(command, now);
        }
    }

    fn apply_command(&mut self, command: KeyCommand, now: Instant) {
        match command {
            KeyCommand::Faster => self.set_speed(self.settings.animation_speed.faster()),
            KeyCommand::Slower => self.set_speed(self.settings.animation_speed.slower()),
            KeyCommand::MoreHearts | KeyCommand::FewerHearts => {
                let step = if command == KeyCommand::MoreHearts {
                    HEARTS_STEP
                } else {
                    -HEARTS_STEP
                };
                self.settings
                    .set_maximum_hearts(self.settings.maximum_hearts() + step);
                self.settings.show_status = true;
                info!(maximum_hearts = self.settings.maximum_hearts(), "maximum hearts changed");
                self.persist();
            }
            KeyCommand::Larger | KeyCommand::Smaller => {
                let step = if command == KeyCommand::Larger {
                    SCALE_STEP
                } else {
                    -SCALE_STEP
                };
                self.settings.set_scale(self.settings.scale() + step);
                self.settings.show_status = true;
                info!(scale = self.settings.scale(), "scale changed");
                self.persist();
            }
            KeyCommand::Options => {
                self.options = Some(OptionsState::from_settings(&self.settings));
                self.status.clear();
            }
            KeyCommand::ToggleHelp => self.help.toggle(now),
            KeyCommand::ToggleStatus => {
                self.settings.show_status = !self.settings.show_status;
                self.persist();
            }
            KeyCommand::Exit => {}
        }
    }

    fn set_speed(&mut self, speed: AnimationSpeed) {
        if speed == self.settings.animation_speed {
            return;
        }
        self.settings.animation_speed = speed;
        self.clock.set_animation_speed(speed);
        info!(speed = speed.label(), "animation speed changed");
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = settings::save(&self.settings) {
            warn!("failed to save settings: {err:#}");
        }
    }

    fn pointer_moved_far(&mut self, ctx: &egui::Context) -> bool {
        let Some(pos) = ctx.input(|i| i.pointer.latest_pos()) else {
            return false;
        };
        let origin = *self.pointer_origin.get_or_insert(pos);
        origin.distance(pos) > MOUSE_EXIT_DISTANCE
    }

    fn draw_help(&self, ctx: &egui::Context, now: Instant) {
        let opacity = self.help.opacity(now) as f32;
        if opacity <= 0.0 {
            return;
        }
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("help_overlay"),
        ));
        let line_height = 26.0;
        let size = egui::vec2(460.0, line_height * (KEY_BINDINGS.len() as f32 + 1.0) + 32.0);
        let rect = egui::Rect::from_center_size(ctx.screen_rect().center(), size);
        painter.rect_filled(rect, 8.0, Color32::from_black_alpha(200).gamma_multiply(opacity));

        let color = Color32::WHITE.gamma_multiply(opacity);
        let font = FontId::proportional(18.0);
        let mut y = rect.top() + 16.0;
        painter.text(
            egui::pos2(rect.center().x, y),
            Align2::CENTER_TOP,
            "Hearts",
            FontId::proportional(22.0),
            color,
        );
        for (keys, action) in KEY_BINDINGS {
            y += line_height;
            painter.text(egui::pos2(rect.left() + 24.0, y), Align2::LEFT_TOP, *keys, font.clone(), color);
            painter.text(egui::pos2(rect.left() + 180.0, y), Align2::LEFT_TOP, *action, font.clone(), color);
        }
    }

    fn options_window(&mut self, ctx: &egui::Context) {
        let Some(mut draft) = self.options.take() else {
            return;
        };
        let action = egui::Window::new("Hearts Options")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                let action = options_ui(ui, &mut draft, &self.settings);
                if !self.status.is_empty() {
                    ui.label(format!("Status: {}", self.status));
                }
                action
            })
            .and_then(|response| response.inner)
            .unwrap_or(OptionsAction::None);
        let escape = ctx.input(|i| i.key_pressed(Key::Escape));

        let keep_open = match action {
            OptionsAction::Apply | OptionsAction::Ok => {
                self.status = commit(&draft, &mut self.settings);
                self.clock.set_animation_speed(self.settings.animation_speed);
                self.frame_rate.reset();
                action == OptionsAction::Apply
            }
            OptionsAction::Close => false,
            OptionsAction::None => !escape,
        };
        if keep_open {
            self.options = Some(draft);
        } else {
            self.pointer_origin = None;
        }
    }
}

impl eframe::App for ScreenSaverApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

/// Stand-alone options dialog for `/c`.
pub struct OptionsApp {
    settings: AppSettings,
    draft: OptionsState,
    registered: bool,
    status: String,
}

impl OptionsApp {
    pub fn new(cc: &CreationContext<'_>, settings: AppSettings) -> Self {
        theme::apply_options_visuals(&cc.egui_ctx);
        let registered = match registration::is_registered() {
            Ok(registered) => registered,
            Err(err) => {
                warn!("failed to read screensaver registration: {err:#}");
                false
            }
        };
        Self {
            draft: OptionsState::from_settings(&settings),
            settings,
            registered,
            status: String::new(),
        }
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(RichText::new("Hearts Screensaver").strong());
            ui.separator();
            let action = options_ui(ui, &mut self.draft, &self.settings);

            if cfg!(windows) {
                ui.separator();
                if ui
                    .checkbox(&mut self.registered, "Use as my screensaver")
                    .changed()
                {
                    let result = if self.registered {
                        registration::register()
                    } else {
                        registration::unregister()
                    };
                    if let Err(err) = result {
                        self.status = err.to_string();
                        self.registered = !self.registered;
                    }
                }
            }

            ui.separator();
            ui.label(format!("Status: {}", self.status));

            match action {
                OptionsAction::Apply => self.status = commit(&self.draft, &mut self.settings),
                OptionsAction::Ok => {
                    self.status = commit(&self.draft, &mut self.settings);
                    if self.status == SAVED {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                }
                OptionsAction::Close => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
                OptionsAction::None => {}
            }
        });
    }
}

impl eframe::App for OptionsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum OptionsAction {
    None,
    Apply,
    Ok,
    Close,
}

const SAVED: &str = "Saved";

/// Widgets shared by the in-screensaver window and the `/c` dialog.
fn options_ui(ui: &mut egui::Ui, draft: &mut OptionsState, settings: &AppSettings) -> OptionsAction {
    ui.add(
        egui::Slider::new(&mut draft.frames_per_second, OptionsState::frames_per_second_range())
            .text("Frames per second"),
    );
    ui.add(
        egui::Slider::new(&mut draft.maximum_hearts, OptionsState::maximum_hearts_range())
            .text("Maximum hearts"),
    );
    ui.add(egui::Slider::new(&mut draft.scale, OptionsState::scale_range()).text("Scale (%)"));

    egui::ComboBox::from_label("Animation speed")
        .selected_text(draft.animation_speed.label())
        .show_ui(ui, |ui| {
            for speed in AnimationSpeed::ALL {
                ui.selectable_value(&mut draft.animation_speed, speed, speed.label());
            }
        });

    ui.checkbox(&mut draft.show_status, "Show status");
    ui.checkbox(&mut draft.show_help, "Show help at startup");

    let dirty = draft.is_dirty(settings);
    let mut action = OptionsAction::None;
    ui.horizontal(|ui| {
        if ui.button("Defaults").clicked() {
            draft.reset_to_defaults();
        }
        if ui.add_enabled(dirty, egui::Button::new("Apply")).clicked() {
            action = OptionsAction::Apply;
        }
        if ui.button("OK").clicked() {
            action = OptionsAction::Ok;
        }
        if ui.button("Close").clicked() {
            action = OptionsAction::Close;
        }
    });
    action
}

/// Apply the draft and persist it, returning the status text to show.
fn commit(draft: &OptionsState, settings: &mut AppSettings) -> String {
    draft.apply_to_settings(settings);
    match save(settings) {
        Ok(()) => SAVED.to_string(),
        Err(err) => err.to_string(),
    }
}

fn save(settings: &AppSettings) -> Result<()> {
    settings::save(settings)?;
    debug!("settings saved");
    Ok(())
}
