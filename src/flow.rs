// src/flow.rs
//
// Page-load dispatcher. Every page load re-enters here with nothing but the
// session store to go on; the stored stage says what to do next.
//
//   site root   → reset, go to cards
//   cards page  → collect inventory once, go to battles
//   battles     → one pagination step; navigate on, or finalize
//   anything    → report is ready (or not)

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::consts::{KEY_CARDS_TEXT, KEY_FINAL_TEXT, PAGE_SETTLE_MS, PRE_NAV_PAUSE_MS};
use crate::config::options::FlowOptions;
use crate::core::net::parse_url;
use crate::core::wait::pause;
use crate::core::Clock;
use crate::engine::analysis::analyze;
use crate::engine::pagination::{FlowState, PaginationController, Phase};
use crate::error::{Error, Result};
use crate::page::LivePage;
use crate::report::assemble;
use crate::specs::cards::collect_cards;
use crate::store::{self, put_json, set_stage, SessionStore, Stage};

/* ---------------- navigation ---------------- */

/// Fire-and-forget: the flow asks, the host decides when.
pub trait Navigator {
    fn navigate(&mut self, url: &str);
}

/// Remembers the last request; the host loop picks it up after the call.
#[derive(Default, Debug)]
pub struct PendingNavigation {
    next: Option<String>,
}

impl PendingNavigation {
    pub fn take(&mut self) -> Option<String> {
        self.next.take()
    }
}

impl Navigator for PendingNavigation {
    fn navigate(&mut self, url: &str) {
        logd!("Flow: navigation requested → {}", url);
        self.next = Some(s!(url));
    }
}

/* ---------------- reentrancy ---------------- */

static RUNNING: AtomicBool = AtomicBool::new(false);

/// Held for the duration of one battles step. Dropping it (also on panic)
/// lets the next attempt in.
#[derive(Debug)]
pub struct FlowGuard(());

impl FlowGuard {
    pub fn acquire() -> Result<Self> {
        RUNNING
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| FlowGuard(()))
            .map_err(|_| Error::AlreadyRunning)
    }

    pub fn is_held() -> bool {
        RUNNING.load(Ordering::Acquire)
    }
}

impl Drop for FlowGuard {
    fn drop(&mut self) {
        RUNNING.store(false, Ordering::Release);
    }
}

/* ---------------- dispatch ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    Root,
    Cards,
    Battles,
    Other,
}

pub fn classify(url: &str, opts: &FlowOptions) -> Result<PageKind> {
    let parsed = parse_url(url)?;
    let path = parsed.path().trim_end_matches('/');
    let kind = if path.is_empty() {
        PageKind::Root
    } else if path == opts.cards_path() {
        PageKind::Cards
    } else if path.starts_with(&opts.battles_path()) {
        PageKind::Battles
    } else {
        PageKind::Other
    };
    Ok(kind)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadAction {
    /// Storage reset, heading for the cards page.
    Started,
    CardsCollected { lines: usize },
    /// Inventory already stored; skipped to battles.
    CardsSkipped,
    /// One battles page merged, continuing at the next history page.
    Collecting { kept: usize },
    /// Collection closed and the report stored.
    Finalized { phase: Phase, kept: usize },
    /// A finished report is waiting in storage.
    ReportReady,
    /// Another step holds the guard.
    Busy,
    Idle,
}

pub struct Flow<'a> {
    opts: &'a FlowOptions,
    clock: &'a dyn Clock,
    store: &'a mut dyn SessionStore,
    nav: &'a mut dyn Navigator,
}

impl<'a> Flow<'a> {
    pub fn new(
        opts: &'a FlowOptions,
        clock: &'a dyn Clock,
        store: &'a mut dyn SessionStore,
        nav: &'a mut dyn Navigator,
    ) -> Self {
        Self { opts, clock, store, nav }
    }

    pub fn on_page_load(&mut self, page: &mut dyn LivePage) -> Result<LoadAction> {
        let kind = classify(page.url(), self.opts)?;
        logd!("Flow: {:?} page {}", kind, page.url());
        match kind {
            PageKind::Root => Ok(self.on_root()),
            PageKind::Cards => Ok(self.on_cards(&*page)),
            PageKind::Battles => {
                pause(self.clock, PRE_NAV_PAUSE_MS);
                if Stage::collects_battles(store::stage(self.store)) {
                    Ok(self.on_battles(page))
                } else {
                    Ok(self.present())
                }
            }
            PageKind::Other => Ok(self.present()),
        }
    }

    fn on_root(&mut self) -> LoadAction {
        store::reset_flow(self.store);
        logf!("Flow: starting for #{}", self.opts.tag);
        self.nav.navigate(&self.opts.cards_url());
        LoadAction::Started
    }

    fn on_cards(&mut self, page: &dyn LivePage) -> LoadAction {
        pause(self.clock, PAGE_SETTLE_MS);
        let stage = store::stage(self.store);
        let saved = store::cards_text(self.store);

        let action = if stage == Some(Stage::Start) || saved.is_none() {
            let text = collect_cards(page, self.clock, self.opts.min_card_level);
            let lines = text.lines().count();
            put_json(self.store, KEY_CARDS_TEXT, &text);
            set_stage(self.store, Stage::CardsCollected);
            pause(self.clock, PAGE_SETTLE_MS);
            LoadAction::CardsCollected { lines }
        } else {
            LoadAction::CardsSkipped
        };
        self.nav.navigate(&self.opts.battles_url());
        action
    }

    fn on_battles(&mut self, page: &mut dyn LivePage) -> LoadAction {
        let _guard = match FlowGuard::acquire() {
            Ok(g) => g,
            Err(e) => {
                logw!("Flow: {}; ignoring this load", e);
                return LoadAction::Busy;
            }
        };

        let state = FlowState::load(self.store);
        if let Some(meta) = &state.resume {
            if meta.continuation != page.url() {
                logd!("Flow: resumed on {} (expected {})", page.url(), meta.continuation);
            }
        }

        let step = PaginationController::new(self.opts, self.clock).step(state, page);
        match (step.phase, step.next_url) {
            (Phase::Collecting, Some(next)) => {
                step.state.checkpoint(self.store);
                pause(self.clock, PRE_NAV_PAUSE_MS);
                self.nav.navigate(&next);
                LoadAction::Collecting { kept: step.state.collection.len() }
            }
            (phase, _) => self.finalize(step.state, phase),
        }
    }

    /// Freeze the collection, build the report, mark the flow done.
    fn finalize(&mut self, mut state: FlowState, phase: Phase) -> LoadAction {
        let cards = store::cards_text(self.store).unwrap_or_default();
        let analysis = analyze(&state.collection, self.opts.cap);
        let text = assemble(&cards, &state.collection, &analysis, self.opts.cap);

        state.stage = Some(Stage::Done);
        state.checkpoint(self.store);
        put_json(self.store, KEY_FINAL_TEXT, &text);

        logf!(
            "Flow: finished ({}), {} battles, {} losses in window",
            phase, state.collection.len(), analysis.losses
        );
        LoadAction::Finalized { phase, kept: state.collection.len() }
    }

    fn present(&self) -> LoadAction {
        let done = store::stage(self.store) == Some(Stage::Done);
        if done && store::final_text(self.store).is_some() {
            LoadAction::ReportReady
        } else {
            LoadAction::Idle
        }
    }
}
