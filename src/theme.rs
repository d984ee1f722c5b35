//! egui visuals for the screensaver surface and the options dialog.

use eframe::egui::{self, Color32};

/// Black, borderless panels so only the hearts show.
pub fn apply_screensaver_visuals(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = Color32::BLACK;
    visuals.window_fill = Color32::from_rgb(24, 24, 28);
    visuals.extreme_bg_color = Color32::BLACK;
    ctx.set_visuals(visuals);
}

pub fn apply_options_visuals(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::dark());
}

/// Frame for the central panel of the screensaver.
pub fn surface_frame() -> egui::Frame {
    egui::Frame::none().fill(Color32::BLACK)
}
