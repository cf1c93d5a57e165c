// src/gui/components/report_view.rs
//
// Finished report: Copy button and the full text, always visible so it can
// be copied by hand when the clipboard fails.

use eframe::egui;

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let ctx = ui.ctx().clone();

    ui.horizontal(|ui| {
        let copy = ui.add_enabled(!app.report.is_empty(), egui::Button::new("Copy"));
        if copy.clicked() {
            actions::copy(app, &ctx);
        }
        if !app.report.is_empty() {
            ui.label(format!("{} chars", app.report.chars().count()));
        }
    });

    if app.report.is_empty() {
        ui.weak("No report yet. Enter a tag and press Run.");
        return;
    }

    egui::ScrollArea::vertical()
        .id_salt("report_text")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // &str → read-only but still selectable
            let mut text = app.report.as_str();
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .font(egui::TextStyle::Monospace)
                    .desired_width(f32::INFINITY),
            );
        });
}
