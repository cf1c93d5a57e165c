// src/engine/stability.rs
//
// After a load action: wait until the battle count has stopped moving for
// `quiet_ms`, or `max_wait_ms` has passed. Either way the caller proceeds.

use crate::config::options::StabilityOptions;
use crate::core::wait::{poll_until, Deadline};
use crate::core::Clock;
use crate::page::LivePage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settled {
    /// Count went up relative to the baseline.
    pub changed: bool,
    pub count: usize,
    /// False when the wait ran out before the count went quiet.
    pub quiet: bool,
}

/// `baseline` is the count observed right before the load action.
pub fn wait_for_stable_count(
    page: &dyn LivePage,
    clock: &dyn Clock,
    baseline: usize,
    opts: &StabilityOptions,
) -> Settled {
    let deadline = Deadline::after(clock, opts.max_wait_ms);
    let mut last = baseline;
    let mut last_change_at = deadline.started_ms;

    // first look happens one poll after the action
    clock.sleep(opts.poll_ms.max(1));

    let outcome = poll_until(clock, &deadline, opts.poll_ms, |now| {
        let current = page.record_count();
        if current != last {
            last = current;
            last_change_at = now;
        }
        now - last_change_at >= opts.quiet_ms as i64
    });

    let quiet = outcome.satisfied();
    if !quiet {
        logw!("Stability: count still moving after {} ms (at {})", opts.max_wait_ms, last);
    }
    logd!("Stability: baseline {} → {} (quiet: {})", baseline, last, quiet);
    Settled { changed: last > baseline, count: last, quiet }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::page::{LoaderBox, Viewport};
    use std::sync::Arc;

    /// Count follows a schedule of `(from_ms, count)` steps on the shared clock.
    struct Growing {
        clock: Arc<ManualClock>,
        steps: Vec<(i64, usize)>,
    }

    impl LivePage for Growing {
        fn url(&self) -> &str { "https://royaleapi.com/player/X/battles" }
        fn html(&self) -> String { s!() }
        fn record_count(&self) -> usize {
            let now = self.clock.now_ms();
            self.steps.iter().rev().find(|(at, _)| *at <= now).map_or(0, |(_, c)| *c)
        }
        fn scroll_y(&self) -> f64 { 0.0 }
        fn scroll_height(&self) -> f64 { 900.0 }
        fn viewport(&self) -> Viewport { Viewport::default() }
        fn scroll_to(&mut self, _y: f64) {}
        fn loader(&self) -> Option<LoaderBox> { None }
    }

    #[test]
    fn settles_after_quiet_period() {
        let clock = Arc::new(ManualClock::at(0));
        let page = Growing { clock: clock.clone(), steps: vec![(0, 10), (500, 20), (1_000, 25)] };
        let got = wait_for_stable_count(&page, clock.as_ref(), 10, &StabilityOptions::default());
        assert_eq!(got, Settled { changed: true, count: 25, quiet: true });
        // last change seen at 1200, quiet for 900 → 2100
        assert_eq!(clock.now_ms(), 2_100);
    }

    #[test]
    fn unchanged_count_reports_no_growth() {
        let clock = Arc::new(ManualClock::at(0));
        let page = Growing { clock: clock.clone(), steps: vec![(0, 10)] };
        let got = wait_for_stable_count(&page, clock.as_ref(), 10, &StabilityOptions::default());
        assert!(!got.changed);
        assert!(got.quiet);
        assert_eq!(clock.now_ms(), 900);
    }

    #[test]
    fn never_settling_page_is_bounded() {
        let clock = Arc::new(ManualClock::at(0));
        let steps = (0..100).map(|i| (i * 300, i as usize)).collect();
        let page = Growing { clock: clock.clone(), steps };
        let opts = StabilityOptions::default();
        let got = wait_for_stable_count(&page, clock.as_ref(), 0, &opts);
        assert!(!got.quiet);
        assert!(got.changed);
        assert!(clock.now_ms() <= opts.max_wait_ms as i64 + opts.poll_ms as i64);
    }
}
