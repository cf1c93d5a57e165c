// src/gui/actions/run.rs
use std::thread;

use eframe::egui;

use crate::{
    config::options::FlowOptions,
    core::{
        net::{DirSource, HttpSource, PageSource},
        SystemClock,
    },
    engine::analysis::analyze,
    gui::{
        app::{App, Finished},
        progress::GuiProgress,
    },
    runner::run_autoflow,
    store::{self, MemoryStore},
};

/// Start a full autoflow on a worker thread. Results land in `app.inbox`.
pub fn run(app: &mut App, ctx: &egui::Context) {
    if app.running {
        app.status("Already running");
        return;
    }
    if let Err(e) = app.state.sync_gui_into_options() {
        app.status(format!("Check the inputs: {e}"));
        return;
    }

    let opts = app.state.options.clone();
    let offline = app.state.gui.offline_dir.trim().to_string();
    let status = app.status.clone();
    let inbox = app.inbox.clone();
    let ctx = ctx.clone();

    logf!("Run: begin tag={} cap={} offline={:?}", opts.tag, opts.cap, offline);
    app.running = true;
    app.status("Starting…");

    thread::spawn(move || {
        let finished = work(&opts, &offline, GuiProgress::new(status));
        if let Ok(mut slot) = inbox.lock() {
            *slot = Some(finished);
        }
        ctx.request_repaint();
    });
}

fn work(opts: &FlowOptions, offline: &str, mut progress: GuiProgress) -> Finished {
    let mut session = MemoryStore::new();
    let clock = SystemClock::new();

    let source: Result<Box<dyn PageSource>, _> = if offline.is_empty() {
        HttpSource::new().map(|s| Box::new(s) as Box<dyn PageSource>)
    } else {
        Ok(Box::new(DirSource::new(offline)) as Box<dyn PageSource>)
    };

    let result = source.and_then(|mut src| {
        run_autoflow(opts, src.as_mut(), &mut session, &clock, &opts.root_url(), Some(&mut progress))
    });

    let records = store::collection(&session);
    let analysis = analyze(&records, opts.cap);
    let result = match result {
        Ok(summary) => summary.final_text.ok_or_else(|| s!("flow ended without a report")),
        Err(e) => Err(e.to_string()),
    };
    Finished { result, records, analysis, session }
}
