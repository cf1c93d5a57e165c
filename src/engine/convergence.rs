// src/engine/convergence.rs
//
// Scroll driver for the infinite battle list. Steps the viewport toward the
// bottom, stops to let a visible loader finish, and gives up on a loader (or
// on the whole page) once its time budget is spent.

use crate::config::consts::{
    BOTTOM_TOLERANCE_PX, FORCED_SCROLL_MS, LOADER_NUDGE_MS, LOADER_RESUME_MS, SCROLL_SETTLE_MS, SCROLL_SLACK_MS,
};
use crate::config::options::{LoaderOptions, ScrollOptions};
use crate::core::wait::{pause, poll_until, Deadline, WaitOutcome};
use crate::core::Clock;
use crate::page::LivePage;

/// Where the loader is parked while waiting: this fraction of the viewport down.
const PARK_AT_BOTTOM: f64 = 0.7;
const PARK_MID_PAGE: f64 = 0.75;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Converged {
    /// At the bottom with no loader on screen.
    Bottom,
    /// A loader never went away; forced to the bottom once and stopped.
    LoaderTimedOut,
    /// Global budget spent before the page settled.
    BudgetSpent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvergenceReport {
    pub steps: usize,
    pub loader_waits: usize,
    pub outcome: Converged,
}

pub fn converge(
    page: &mut dyn LivePage,
    clock: &dyn Clock,
    scroll: &ScrollOptions,
    loader: &LoaderOptions,
) -> ConvergenceReport {
    let budget = Deadline::after(clock, scroll.budget_ms);
    let mut steps = 0usize;
    let mut loader_waits = 0usize;

    loop {
        if budget.expired(clock.now_ms()) {
            logw!("Converge: budget of {} ms spent, treating page as settled", scroll.budget_ms);
            return done(Converged::BudgetSpent, steps, loader_waits);
        }

        let vh = page.viewport().height;
        let target = (page.scroll_height() - vh).max(0.0);
        let at_bottom = page.scroll_y() >= target - BOTTOM_TOLERANCE_PX;
        let visible_loader = page.loader().filter(|l| l.is_visible(page.viewport()));

        match (at_bottom, visible_loader) {
            (true, None) => {
                page.scroll_to(target);
                pause(clock, SCROLL_SETTLE_MS);
                return done(Converged::Bottom, steps, loader_waits);
            }
            (_, Some(l)) => {
                let (park, settle) = if at_bottom {
                    (PARK_AT_BOTTOM, SCROLL_SETTLE_MS)
                } else {
                    (PARK_MID_PAGE, LOADER_NUDGE_MS)
                };
                let parked = (page.scroll_y() + l.top - (vh * park).floor()).max(0.0);
                page.scroll_to(parked);
                pause(clock, settle);
                loader_waits += 1;

                if wait_loader_gone(&*page, clock, loader) == WaitOutcome::TimedOut {
                    logw!("Converge: loader still visible after {} ms, forcing bottom", loader.max_wait_ms);
                    let target = (page.scroll_height() - vh).max(0.0);
                    page.scroll_to(target);
                    pause(clock, FORCED_SCROLL_MS);
                    return done(Converged::LoaderTimedOut, steps, loader_waits);
                }
                pause(clock, LOADER_RESUME_MS);
            }
            (false, None) => {
                let next = target.min(page.scroll_y() + scroll.step_px);
                page.scroll_to(next);
                steps += 1;
                pause(clock, scroll.step_delay_ms + SCROLL_SLACK_MS);
            }
        }
    }
}

fn done(outcome: Converged, steps: usize, loader_waits: usize) -> ConvergenceReport {
    logd!("Converge: {:?} after {} steps, {} loader waits", outcome, steps, loader_waits);
    ConvergenceReport { steps, loader_waits, outcome }
}

/// Poll until no loader is on screen. Bounded by `max_wait_ms`.
pub fn wait_loader_gone(page: &dyn LivePage, clock: &dyn Clock, opts: &LoaderOptions) -> WaitOutcome {
    let deadline = Deadline::after(clock, opts.max_wait_ms);
    poll_until(clock, &deadline, opts.poll_ms, |_| !page.loader_visible())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::page::{LoaderBox, Viewport};
    use std::{cell::RefCell, sync::Arc};

    const LOAD_MS: i64 = 600;

    struct Feed {
        clock: Arc<ManualClock>,
        st: RefCell<FeedState>,
    }

    struct FeedState {
        y: f64,
        height: f64,
        records: usize,
        batches_left: usize,
        loading_until: Option<i64>,
        /// Each scroll appends content without a loader (runaway page).
        endless: bool,
    }

    impl Feed {
        fn new(clock: Arc<ManualClock>, batches: usize) -> Self {
            let st = FeedState { y: 0.0, height: 1_800.0, records: 10, batches_left: batches, loading_until: None, endless: false };
            Self { clock, st: RefCell::new(st) }
        }

        fn sync(&self) {
            let now = self.clock.now_ms();
            let mut st = self.st.borrow_mut();
            if st.loading_until.is_some_and(|t| now >= t) {
                st.loading_until = None;
                st.height += 2_000.0;
                st.records += 10;
                st.batches_left -= 1;
            }
        }
    }

    impl LivePage for Feed {
        fn url(&self) -> &str { "https://royaleapi.com/player/X/battles" }
        fn html(&self) -> String { s!() }
        fn record_count(&self) -> usize { self.sync(); self.st.borrow().records }
        fn scroll_y(&self) -> f64 { self.st.borrow().y }
        fn scroll_height(&self) -> f64 { self.sync(); self.st.borrow().height }
        fn viewport(&self) -> Viewport { Viewport::default() }
        fn scroll_to(&mut self, y: f64) {
            self.sync();
            let now = self.clock.now_ms();
            let mut st = self.st.borrow_mut();
            let max_y = (st.height - 900.0).max(0.0);
            st.y = y.clamp(0.0, max_y);
            if st.endless {
                st.height += 800.0;
            } else if st.y >= max_y - 10.0 && st.batches_left > 0 && st.loading_until.is_none() {
                st.loading_until = Some(now + LOAD_MS);
            }
        }
        fn loader(&self) -> Option<LoaderBox> {
            self.sync();
            self.st.borrow().loading_until.map(|_| LoaderBox {
                top: 800.0, left: 0.0, width: 1_000.0, height: 60.0,
                display_none: false, visibility_hidden: false, opacity: 1.0,
            })
        }
    }

    #[test]
    fn follows_loader_until_list_ends() {
        let clock = Arc::new(ManualClock::at(0));
        let mut feed = Feed::new(clock.clone(), 3);
        let rep = converge(&mut feed, clock.as_ref(), &ScrollOptions::default(), &LoaderOptions::default());
        assert_eq!(rep.outcome, Converged::Bottom);
        assert_eq!(feed.record_count(), 40);
        assert!(rep.loader_waits >= 3);
        assert!(clock.now_ms() < ScrollOptions::default().budget_ms as i64);
    }

    #[test]
    fn stuck_loader_forces_bottom_and_stops() {
        let clock = Arc::new(ManualClock::at(0));
        let mut feed = Feed::new(clock.clone(), 1);
        feed.st.borrow_mut().loading_until = Some(i64::MAX);
        let rep = converge(&mut feed, clock.as_ref(), &ScrollOptions::default(), &LoaderOptions::default());
        assert_eq!(rep.outcome, Converged::LoaderTimedOut);
        assert_eq!(rep.loader_waits, 1);
        assert_eq!(feed.scroll_y(), 900.0);
    }

    #[test]
    fn runaway_page_hits_the_budget() {
        let clock = Arc::new(ManualClock::at(0));
        let mut feed = Feed::new(clock.clone(), 0);
        feed.st.borrow_mut().endless = true;
        let opts = ScrollOptions::default();
        let rep = converge(&mut feed, clock.as_ref(), &opts, &LoaderOptions::default());
        assert_eq!(rep.outcome, Converged::BudgetSpent);
        let step_ms = (opts.step_delay_ms + SCROLL_SLACK_MS) as i64;
        assert!(clock.now_ms() < opts.budget_ms as i64 + step_ms);
        assert!(rep.steps > 10);
    }
}
