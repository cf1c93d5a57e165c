// src/report.rs
//
// Final report text and its hand-off to whatever the user copies it from.

use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use crate::config::consts::{KEY_BATTLES_DATA, KEY_RESUME_META};
use crate::engine::analysis::{render_section, Analysis};
use crate::error::Result;
use crate::record::Record;
use crate::store::{final_text, remove_quiet, SessionStore};

pub const PREAMBLE: &str = "Analyze everything and give me the most strongest deck I can make to keep pushing my trophies. \
Return the deck as card names, each name on a new line (even if the card has evolution, put it first, but don't type “Evolution”)\n\n\n\
ATTENTION! Do not use the patterns you were trained on, do it unique for my case. Also make a short explanation of your choice.";

pub const BATTLE_SEPARATOR: &str = "\n\n---\n\n";

/// Preamble, inventory, the newest `cap` battles and the analysis section.
pub fn assemble(cards_text: &str, records: &[Record], analysis: &Analysis, cap: usize) -> String {
    let shown = &records[..records.len().min(cap)];
    let battles = shown.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join(BATTLE_SEPARATOR);

    let cards = if cards_text.trim().is_empty() { "*no card data*" } else { cards_text };
    let battles = if battles.is_empty() { s!("*no battle data*") } else { battles };

    format!(
        "{PREAMBLE}\n\nmy cards:\n\n{cards}\n\nmy battles (last {}):\n\n{battles}\n\n{}",
        shown.len(),
        render_section(analysis)
    )
}

/// Where a finished report goes (clipboard, file, stdout…).
pub trait ReportSink {
    fn write(&mut self, text: &str) -> Result<()>;
}

pub struct FileSink(pub PathBuf);

impl ReportSink for FileSink {
    fn write(&mut self, text: &str) -> Result<()> {
        if let Some(parent) = self.0.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.0, text)?;
        Ok(())
    }
}

pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn write(&mut self, text: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        out.write_all(text.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Sink,
    /// Sink failed; the text went to the fallback display instead.
    Fallback,
    NothingToDeliver,
}

/// Send the stored final report to `sink`. On failure the full text goes to
/// `fallback` for manual copying. After a successful write the collection
/// snapshot and resume meta are dropped; the final text stays.
pub fn deliver(
    store: &mut dyn SessionStore,
    sink: &mut dyn ReportSink,
    fallback: &mut dyn FnMut(&str),
) -> Delivery {
    let Some(text) = final_text(store) else {
        logw!("Report: nothing to deliver yet");
        return Delivery::NothingToDeliver;
    };
    match sink.write(&text) {
        Ok(()) => {
            remove_quiet(store, KEY_BATTLES_DATA);
            remove_quiet(store, KEY_RESUME_META);
            logf!("Report: delivered ({} chars)", text.len());
            Delivery::Sink
        }
        Err(e) => {
            loge!("Report: sink failed ({}), showing text for manual copy", e);
            fallback(&text);
            Delivery::Fallback
        }
    }
}
