// src/runner.rs
//
// Host loop for running the autoflow outside a browser: load a URL, hand the
// page to the flow, follow whatever navigation it asked for.

use crate::config::consts::MAX_PAGE_LOADS;
use crate::config::options::FlowOptions;
use crate::core::net::PageSource;
use crate::core::Clock;
use crate::engine::pagination::Phase;
use crate::error::{Error, Result};
use crate::flow::{Flow, LoadAction, PendingNavigation};
use crate::page::StaticPage;
use crate::progress::Progress;
use crate::store::{self, SessionStore};

/// Summary of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub page_loads: usize,
    /// How collection ended, if the run got that far.
    pub phase: Option<Phase>,
    pub kept: usize,
    pub final_text: Option<String>,
}

/// Drive the flow from `start_url` until nothing asks for another page.
pub fn run_autoflow(
    opts: &FlowOptions,
    source: &mut dyn PageSource,
    store: &mut dyn SessionStore,
    clock: &dyn Clock,
    start_url: &str,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary> {
    opts.validate()?;
    if let Some(p) = progress.as_deref_mut() {
        p.begin(MAX_PAGE_LOADS);
    }

    let mut nav = PendingNavigation::default();
    let mut url = s!(start_url);
    let mut summary = RunSummary { page_loads: 0, phase: None, kept: 0, final_text: None };

    let result = loop {
        if summary.page_loads >= MAX_PAGE_LOADS {
            loge!("Runner: gave up after {} page loads", summary.page_loads);
            break Err(Error::NavigationLimit(summary.page_loads));
        }

        let html = match source.load(&url) {
            Ok(h) => h,
            Err(e) => break Err(e),
        };
        summary.page_loads += 1;

        let mut page = StaticPage::new(url.as_str(), html);
        let action = match Flow::new(opts, clock, store, &mut nav).on_page_load(&mut page) {
            Ok(a) => a,
            Err(e) => break Err(e),
        };

        let msg = describe(&action);
        logf!("Runner: [{}] {} → {}", summary.page_loads, url, msg);
        if let Some(p) = progress.as_deref_mut() {
            p.log(&msg);
            p.page_done(summary.page_loads, &url);
        }

        match action {
            LoadAction::Collecting { kept } => summary.kept = kept,
            LoadAction::Finalized { phase, kept } => {
                summary.phase = Some(phase);
                summary.kept = kept;
            }
            _ => {}
        }

        match nav.take() {
            Some(next) => url = next,
            None => break Ok(()),
        }
    };

    summary.final_text = store::final_text(store);
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    result.map(|_| summary)
}

fn describe(action: &LoadAction) -> String {
    match action {
        LoadAction::Started => s!("started"),
        LoadAction::CardsCollected { lines } => format!("{lines} cards collected"),
        LoadAction::CardsSkipped => s!("cards already collected"),
        LoadAction::Collecting { kept } => format!("{kept} battles kept, next page"),
        LoadAction::Finalized { phase, kept } => format!("finished ({phase}) with {kept} battles"),
        LoadAction::ReportReady => s!("report ready"),
        LoadAction::Busy => s!("another collection is running"),
        LoadAction::Idle => s!("nothing to do"),
    }
}
