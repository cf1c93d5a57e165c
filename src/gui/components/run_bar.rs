// src/gui/components/run_bar.rs
//
// Inputs for one run plus the Run button.

use eframe::egui;

use crate::gui::{actions, app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let ctx = ui.ctx().clone();
    ui.horizontal_wrapped(|ui| {
        ui.label("Tag #");
        ui.add(egui::TextEdit::singleline(&mut app.state.gui.tag_text).desired_width(110.0));

        ui.label("Battles");
        ui.add(egui::TextEdit::singleline(&mut app.state.gui.cap_text).desired_width(40.0));

        ui.label("Min card level");
        ui.add(egui::TextEdit::singleline(&mut app.state.gui.min_level_text).desired_width(30.0));

        ui.label("Offline dir");
        ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.offline_dir)
                .hint_text("(network)")
                .desired_width(180.0),
        );

        ui.separator();

        let run = ui.add_enabled(!app.running, egui::Button::new("Run"));
        if run.clicked() {
            actions::run(app, &ctx);
        }
        if app.running {
            ui.spinner();
        }
    });
}
