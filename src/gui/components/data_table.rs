// src/gui/components/data_table.rs
//
// Read-only tables for the collected battles and the card frequencies.

use chrono::{Local, TimeZone};
use eframe::egui::{self, RichText};
use egui_extras::{Column, TableBuilder};

use crate::gui::app::App;

const ROW_H: f32 = 20.0;

fn tune_scroll(ui: &mut egui::Ui) {
    let s = &mut ui.style_mut().spacing.scroll;
    s.floating = false;
    s.bar_width = 10.0;
    s.handle_min_length = 48.0;
}

fn when(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| s!("?"))
}

pub fn draw_battles(ui: &mut egui::Ui, app: &mut App) {
    if app.records.is_empty() {
        ui.weak("No battles collected.");
        return;
    }
    tune_scroll(ui);

    TableBuilder::new(ui)
        .id_salt("battles_table")
        .striped(true)
        .resizable(true)
        .column(Column::exact(130.0))
        .column(Column::exact(50.0))
        .column(Column::remainder().at_least(200.0))
        .header(24.0, |mut header| {
            header.col(|ui| { ui.strong("Time"); });
            header.col(|ui| { ui.strong("Result"); });
            header.col(|ui| { ui.strong("Opponent deck"); });
        })
        .body(|body| {
            body.rows(ROW_H, app.records.len(), |mut row| {
                let rec = &app.records[row.index()];
                row.col(|ui| { ui.label(when(rec.timestamp)); });
                row.col(|ui| {
                    let txt = if rec.self_lost {
                        RichText::new("lost").color(ui.visuals().warn_fg_color)
                    } else {
                        RichText::new("won")
                    };
                    ui.label(txt);
                });
                row.col(|ui| {
                    let deck = if rec.opponent_deck.is_empty() {
                        s!("(unknown)")
                    } else {
                        rec.opponent_deck.join(", ")
                    };
                    ui.label(deck).on_hover_text(&rec.text);
                });
            });
        });
}

pub fn draw_frequencies(ui: &mut egui::Ui, app: &mut App) {
    let a = &app.analysis;
    if a.window == 0 {
        ui.weak("No battles available to analyze.");
        return;
    }
    ui.label(format!(
        "Last {} battles, {} losses. {} distinct opponent cards.",
        a.window,
        a.losses,
        a.entries.len()
    ));
    tune_scroll(ui);

    let top = a.top().len();
    TableBuilder::new(ui)
        .id_salt("freq_table")
        .striped(true)
        .column(Column::exact(36.0))
        .column(Column::remainder().at_least(160.0))
        .column(Column::exact(60.0))
        .column(Column::exact(60.0))
        .header(24.0, |mut header| {
            header.col(|ui| { ui.strong("#"); });
            header.col(|ui| { ui.strong("Card"); });
            header.col(|ui| { ui.strong("Times"); });
            header.col(|ui| { ui.strong("%"); });
        })
        .body(|body| {
            body.rows(ROW_H, a.entries.len(), |mut row| {
                let i = row.index();
                let e = &a.entries[i];
                // entries past the reported top are dimmed
                let dim = i >= top;
                let cell = |ui: &mut egui::Ui, t: String| {
                    if dim { ui.weak(t); } else { ui.label(t); }
                };
                row.col(|ui| cell(ui, (i + 1).to_string()));
                row.col(|ui| cell(ui, e.card_name.clone()));
                row.col(|ui| cell(ui, e.occurrence_count.to_string()));
                row.col(|ui| cell(ui, format!("{}%", e.percent_of_window)));
            });
        });
}
