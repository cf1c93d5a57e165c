// src/core/clock.rs
use std::{
    sync::atomic::{AtomicI64, Ordering},
    thread,
    time::{Duration, Instant},
};

/// Time source for every suspension point in the crate.
pub trait Clock {
    /// Epoch milliseconds. Must not go backwards.
    fn now_ms(&self) -> i64;
    fn sleep(&self, ms: u64);
}

/// Wall clock anchored once at construction; advances monotonically.
pub struct SystemClock {
    epoch_ms: i64,
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch_ms: chrono::Utc::now().timestamp_millis(), started: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self { Self::new() }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        self.epoch_ms + self.started.elapsed().as_millis() as i64
    }
    fn sleep(&self, ms: u64) {
        thread::sleep(Duration::from_millis(ms));
    }
}

/// Virtual clock: `sleep` just moves time forward. Used by tests and dry runs.
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn at(epoch_ms: i64) -> Self {
        Self { now: AtomicI64::new(epoch_ms) }
    }
    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
    fn sleep(&self, ms: u64) {
        self.advance(ms);
    }
}
