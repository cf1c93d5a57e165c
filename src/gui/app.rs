// src/gui/app.rs
use std::{
    error::Error,
    sync::{Arc, Mutex},
};

use eframe::egui;

use crate::{
    config::state::{AppState, Tab},
    engine::analysis::Analysis,
    record::Record,
    store::MemoryStore,
};

use super::{actions, components};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    eframe::run_native(
        "RoyaleAPI Deck Report",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::default())))),
    )?;
    Ok(())
}

/// What a finished worker hands back to the UI thread.
pub struct Finished {
    pub result: Result<String, String>,
    pub records: Vec<Record>,
    pub analysis: Analysis,
    pub session: MemoryStore,
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // results of the last run
    pub report: String,
    pub records: Vec<Record>,
    pub analysis: Analysis,
    // storage of the last run; the report is delivered from here
    pub session: MemoryStore,

    // status/progress (workers write here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    pub inbox: Arc<Mutex<Option<Finished>>>,
}

impl App {
    pub fn new(state: AppState) -> Self {
        logf!("Init: base={}, cap={}", state.options.base_url, state.options.cap);
        Self {
            state,
            report: s!(),
            records: Vec::new(),
            analysis: Analysis::default(),
            session: MemoryStore::new(),
            status: Arc::new(Mutex::new(s!("Idle"))),
            running: false,
            inbox: Arc::new(Mutex::new(None)),
        }
    }

    #[inline]
    pub fn status<T: Into<String>>(&self, msg: T) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }

    #[inline]
    pub fn status_text(&self) -> String {
        self.status.lock().map(|s| s.clone()).unwrap_or_default()
    }

    #[inline]
    pub fn current_tab(&self) -> Tab { self.state.gui.current_tab }

    /// Move a finished worker's output into the view.
    pub fn collect_finished(&mut self) {
        let done = self.inbox.lock().ok().and_then(|mut slot| slot.take());
        let Some(f) = done else { return };
        self.running = false;
        self.records = f.records;
        self.analysis = f.analysis;
        self.session = f.session;
        match f.result {
            Ok(report) => {
                self.report = report;
                self.state.gui.current_tab = Tab::Report;
                self.status(format!("Done: {} battles", self.records.len()));
            }
            Err(e) => {
                loge!("GUI: run failed: {}", e);
                self.status(format!("Error: {e}"));
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.collect_finished();
        if self.running {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }

        egui::TopBottomPanel::top("run_bar").show(ctx, |ui| {
            components::run_bar::draw(ui, self);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(self.status_text());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::tabs::draw(ui, self);
            ui.separator();
            match self.current_tab() {
                Tab::Report => components::report_view::draw(ui, self),
                Tab::Battles => components::data_table::draw_battles(ui, self),
                Tab::Cards => components::data_table::draw_frequencies(ui, self),
            }
        });

        if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::Enter)) && !self.running {
            actions::run(self, ctx);
        }
    }
}
