mod app;
mod clock;
mod frame_rate;
mod geometry;
mod heart;
mod help;
mod mode;
mod pool;
mod random;
mod registration;
mod render;
mod settings;
mod spawn;
mod state;
mod theme;
mod viewport;

use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::mode::Mode;

const APP_NAME: &str = "Hearts";

fn main() -> anyhow::Result<()> {
    let mode = mode::parse(std::env::args().skip(1))?;
    init_tracing(mode.is_debug());
    info!(?mode, "starting");

    match mode {
        Mode::Show { debug } => run_screensaver(debug),
        Mode::Configure => run_options(),
        Mode::Preview { handle } => {
            info!("preview in window {handle:#x} is not supported");
            Ok(())
        }
        Mode::Register => registration::register(),
        Mode::Unregister => registration::unregister(),
    }
}

/// `RUST_LOG` wins over the mode's default level.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_screensaver(debug: bool) -> anyhow::Result<()> {
    let settings = settings::load();
    let viewport = if debug {
        egui::ViewportBuilder::default()
            .with_title(format!("{APP_NAME} (debug)"))
            .with_inner_size([1280.0, 720.0])
    } else {
        egui::ViewportBuilder::default()
            .with_title(APP_NAME)
            .with_fullscreen(true)
            .with_decorations(false)
            .with_window_level(egui::WindowLevel::AlwaysOnTop)
    };
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Box::new(app::ScreenSaverApp::new(cc, settings, debug))),
    )?;
    Ok(())
}

fn run_options() -> anyhow::Result<()> {
    let settings = settings::load();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("{APP_NAME} Options"))
            .with_inner_size([440.0, 360.0])
            .with_resizable(false),
        ..Default::default()
    };
    eframe::run_native(
        "Hearts Options",
        native_options,
        Box::new(move |cc| Box::new(app::OptionsApp::new(cc, settings))),
    )?;
    Ok(())
}
