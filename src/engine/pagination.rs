// src/engine/pagination.rs
//
// One collecting step per battles page:
//   scroll until loaded → wait for a stable count → extract → merge/cap →
//   cap reached | next history page | exhausted.
// State goes in and comes out as a value; the caller decides when to persist it.

use std::fmt;

use crate::config::consts::{KEY_BATTLES_DATA, KEY_FLOW_STAGE, KEY_RESUME_META};
use crate::config::options::FlowOptions;
use crate::core::Clock;
use crate::page::LivePage;
use crate::record::Record;
use crate::specs::battle::{extract_batch, ExtractContext};
use crate::specs::history::next_history_url;
use crate::store::{self, get_json, put_json, remove_quiet, ResumeMeta, SessionStore, Stage};

use super::convergence::{converge, ConvergenceReport};
use super::merge::merge_capped;
use super::stability::{wait_for_stable_count, Settled};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Collecting,
    CapReached,
    Exhausted,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Collecting => "collecting",
            Phase::CapReached => "cap_reached",
            Phase::Exhausted => "exhausted",
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Phase::Collecting
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the flow carries from one page load to the next.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowState {
    pub stage: Option<Stage>,
    /// Capped, newest first, unique by key.
    pub collection: Vec<Record>,
    pub resume: Option<ResumeMeta>,
}

impl FlowState {
    pub fn load(store: &dyn SessionStore) -> Self {
        Self {
            stage: store::stage(store),
            collection: store::collection(store),
            resume: get_json(store, KEY_RESUME_META),
        }
    }

    /// Persist stage, collection and resume meta.
    pub fn checkpoint(&self, store: &mut dyn SessionStore) {
        put_json(store, KEY_BATTLES_DATA, &self.collection);
        match &self.resume {
            Some(meta) => put_json(store, KEY_RESUME_META, meta),
            None => remove_quiet(store, KEY_RESUME_META),
        }
        match self.stage {
            Some(stage) => put_json(store, KEY_FLOW_STAGE, &stage),
            None => remove_quiet(store, KEY_FLOW_STAGE),
        }
    }
}

#[derive(Debug)]
pub struct Step {
    pub state: FlowState,
    pub phase: Phase,
    /// Set only while `Collecting`: where to go next.
    pub next_url: Option<String>,
    pub extracted: usize,
    pub settled: Settled,
    pub convergence: ConvergenceReport,
}

pub struct PaginationController<'a> {
    opts: &'a FlowOptions,
    clock: &'a dyn Clock,
}

impl<'a> PaginationController<'a> {
    pub fn new(opts: &'a FlowOptions, clock: &'a dyn Clock) -> Self {
        Self { opts, clock }
    }

    pub fn step(&self, mut state: FlowState, page: &mut dyn LivePage) -> Step {
        let baseline = page.record_count();
        let convergence = converge(page, self.clock, &self.opts.scroll, &self.opts.loader);
        let settled = wait_for_stable_count(&*page, self.clock, baseline, &self.opts.stability);

        let html = page.html();
        let ctx = ExtractContext { tag: &self.opts.tag, now_ms: self.clock.now_ms() };
        let batch = extract_batch(&html, &ctx);
        let extracted = batch.len();

        state.collection = merge_capped(&state.collection, &batch, self.opts.cap);
        logf!(
            "Pagination: {} on page, {} extracted, {}/{} kept",
            settled.count, extracted, state.collection.len(), self.opts.cap
        );

        let (phase, next_url) = if state.collection.len() >= self.opts.cap {
            (Phase::CapReached, None)
        } else {
            match next_history_url(&html, page.url()) {
                Some(next) => {
                    state.resume = Some(ResumeMeta {
                        origin_url: s!(page.url()),
                        continuation: next.clone(),
                        timestamp: self.clock.now_ms(),
                    });
                    state.stage = Some(Stage::BattlesCollecting);
                    (Phase::Collecting, Some(next))
                }
                None => (Phase::Exhausted, None),
            }
        };

        logd!("Pagination: phase {}", phase);
        Step { state, phase, next_url, extracted, settled, convergence }
    }
}
