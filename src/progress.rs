// src/progress.rs
/// Lightweight progress reporting used by the autoflow host loop.
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the page-load limit.
    fn begin(&mut self, _max_loads: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called after each page load has been handled.
    fn page_done(&mut self, _index: usize, _url: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
