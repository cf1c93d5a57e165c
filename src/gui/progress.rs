// src/gui/progress.rs
use std::sync::{Arc, Mutex};

use crate::progress::Progress;

pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    pages: usize,
    limit: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>) -> Self {
        Self { status, pages: 0, limit: 0 }
    }
    fn set_status(&self, msg: impl Into<String>) {
        if let Ok(mut s) = self.status.lock() {
            *s = msg.into();
        }
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, max_loads: usize) {
        self.limit = max_loads;
        self.set_status("Starting…");
    }
    fn log(&mut self, msg: &str) {
        self.set_status(format!("[page {}] {}", self.pages + 1, msg));
    }
    fn page_done(&mut self, index: usize, url: &str) {
        self.pages = index;
        logd!("GUI: page {}/{} done ({})", index, self.limit, url);
    }
    fn finish(&mut self) {
        self.set_status(format!("Finished after {} page(s)", self.pages));
    }
}
