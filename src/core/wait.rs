// src/core/wait.rs
//
// Bounded waiting. Every poll in the crate has a deadline; when it passes the
// caller gets `TimedOut` and carries on with whatever is on the page.

use super::clock::Clock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied,
    TimedOut,
}

impl WaitOutcome {
    pub fn satisfied(self) -> bool { self == WaitOutcome::Satisfied }
}

#[derive(Clone, Copy, Debug)]
pub struct Deadline {
    pub started_ms: i64,
    pub budget_ms: u64,
}

impl Deadline {
    pub fn after(clock: &dyn Clock, budget_ms: u64) -> Self {
        Self { started_ms: clock.now_ms(), budget_ms }
    }

    pub fn elapsed(&self, now_ms: i64) -> u64 {
        (now_ms - self.started_ms).max(0) as u64
    }

    pub fn expired(&self, now_ms: i64) -> bool {
        self.elapsed(now_ms) >= self.budget_ms
    }
}

/// Check `cond` now, then every `interval_ms`, until it holds or the deadline passes.
/// `cond` receives the current time.
pub fn poll_until<F>(clock: &dyn Clock, deadline: &Deadline, interval_ms: u64, mut cond: F) -> WaitOutcome
where
    F: FnMut(i64) -> bool,
{
    loop {
        let now = clock.now_ms();
        if cond(now) {
            return WaitOutcome::Satisfied;
        }
        if deadline.expired(now) {
            return WaitOutcome::TimedOut;
        }
        clock.sleep(interval_ms.max(1));
    }
}

/// Fixed pause.
pub fn pause(clock: &dyn Clock, ms: u64) {
    if ms > 0 {
        clock.sleep(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;

    #[test]
    fn satisfied_once_condition_holds() {
        let clock = ManualClock::at(0);
        let d = Deadline::after(&clock, 5_000);
        let out = poll_until(&clock, &d, 300, |now| now >= 900);
        assert_eq!(out, WaitOutcome::Satisfied);
        assert_eq!(clock.now_ms(), 900);
    }

    #[test]
    fn times_out_at_deadline() {
        let clock = ManualClock::at(1_000);
        let d = Deadline::after(&clock, 1_000);
        let out = poll_until(&clock, &d, 300, |_| false);
        assert_eq!(out, WaitOutcome::TimedOut);
        // 0, 300, 600, 900, 1200 → expired at 1200
        assert_eq!(clock.now_ms(), 2_200);
    }
}
