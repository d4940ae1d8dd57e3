// src/gui/components/feedback.rs
//
// Small shared widgets: coloured messages and the busy-aware submit button.

use eframe::egui::{self, Color32, RichText, Spinner};

pub const ERROR_RED: Color32 = Color32::from_rgb(220, 38, 38);
pub const NOTICE_GREEN: Color32 = Color32::from_rgb(22, 163, 74);
pub const ACCENT_BLUE: Color32 = Color32::from_rgb(37, 99, 235);

pub fn error(ui: &mut egui::Ui, msg: &str) {
    ui.colored_label(ERROR_RED, msg);
}

pub fn notice(ui: &mut egui::Ui, msg: &str) {
    ui.colored_label(NOTICE_GREEN, msg);
}

/// Primary action button. Disabled with a spinner while `busy`.
/// Returns true when clicked.
pub fn submit_button(ui: &mut egui::Ui, busy: bool, idle_label: &str, busy_label: &str) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        let text = if busy { busy_label } else { idle_label };
        let button = egui::Button::new(RichText::new(text).color(Color32::WHITE).strong())
            .fill(ACCENT_BLUE)
            .min_size(egui::vec2(120.0, 28.0));
        clicked = ui.add_enabled(!busy, button).clicked();
        if busy {
            ui.add(Spinner::new().size(16.0));
        }
    });
    clicked
}

/// Single-line field with a label above it.
pub fn field(ui: &mut egui::Ui, label: &str, value: &mut String, password: bool) -> egui::Response {
    ui.label(RichText::new(label).strong());
    ui.add(
        egui::TextEdit::singleline(value)
            .password(password)
            .desired_width(f32::INFINITY),
    )
}
