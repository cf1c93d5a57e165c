// src/gui/actions/copy.rs
use eframe::egui;

use crate::{
    error::{Error, Result},
    gui::app::App,
    report::{deliver, Delivery, ReportSink},
};

/// egui clipboard as a report sink.
struct Clipboard<'a>(&'a egui::Context);

impl ReportSink for Clipboard<'_> {
    fn write(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::Config(s!("empty report")));
        }
        self.0.copy_text(s!(text));
        Ok(())
    }
}

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    let mut shown: Option<String> = None;
    let outcome = deliver(&mut app.session, &mut Clipboard(ui_ctx), &mut |text: &str| {
        shown = Some(s!(text));
    });

    match outcome {
        Delivery::Sink => {
            logf!("Copy: report copied ({} chars)", app.report.len());
            app.status("Report copied to clipboard");
        }
        Delivery::Fallback => {
            if let Some(text) = shown {
                app.report = text;
            }
            app.status("Clipboard unavailable: select the report text and copy it by hand");
        }
        Delivery::NothingToDeliver => {
            logd!("Copy: Clicked, but there's nothing to copy");
            app.status("Nothing to copy yet");
        }
    }
}
