// src/cli.rs
//
// Command-line front end: options → autoflow → report to file or stdout.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::config::consts::KEY_RESUME_META;
use crate::config::options::{normalize_tag, FlowOptions};
use crate::core::net::{DirSource, HttpSource, PageSource};
use crate::core::SystemClock;
use crate::progress::Progress;
use crate::report::{deliver, Delivery, FileSink, ReportSink, StdoutSink};
use crate::runner::run_autoflow;
use crate::store::{self, get_json, FileStore, MemoryStore, ResumeMeta, SessionStore, Stage};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Start {
    /// Site root: fresh run, inventory first.
    Root,
    /// Cards page: keeps stored progress.
    Cards,
    /// First battles page.
    Battles,
    /// Continue at the stored continuation handle.
    Resume,
}

#[derive(Parser, Debug)]
#[command(name = "ra_scrape", version, about = "Collect RoyaleAPI battle history into a deck-building report")]
pub struct Args {
    /// Player tag, with or without '#'
    #[arg(short, long)]
    pub tag: Option<String>,

    /// TOML options file (flags override it)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Max battles kept
    #[arg(long)]
    pub cap: Option<usize>,

    /// Leave cards below this level out of the inventory
    #[arg(long)]
    pub min_level: Option<u32>,

    #[arg(long)]
    pub base_url: Option<String>,

    /// Read saved pages from this directory instead of the network
    #[arg(long)]
    pub offline: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Start::Root)]
    pub start: Start,

    /// Keep session state in memory only (no resume across runs)
    #[arg(long)]
    pub ephemeral: bool,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl Args {
    pub fn flow_options(&self) -> Result<FlowOptions> {
        let mut opts = match &self.config {
            Some(p) => FlowOptions::from_toml_file(p).wrap_err_with(|| format!("reading {}", p.display()))?,
            None => FlowOptions::default(),
        };
        if let Some(t) = &self.tag { opts.tag = normalize_tag(t); }
        if let Some(c) = self.cap { opts.cap = c; }
        if let Some(l) = self.min_level { opts.min_card_level = l; }
        if let Some(b) = &self.base_url { opts.base_url = b.clone(); }
        opts.validate()?;
        Ok(opts)
    }
}

struct CliProgress;

impl Progress for CliProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let opts = args.flow_options()?;

    let mut source: Box<dyn PageSource> = match &args.offline {
        Some(dir) => Box::new(DirSource::new(dir)),
        None => Box::new(HttpSource::new()?),
    };
    let mut session: Box<dyn SessionStore> = if args.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::default_location())
    };

    let start_url = match args.start {
        Start::Root => opts.root_url(),
        Start::Cards => opts.cards_url(),
        Start::Battles => {
            if store::stage(session.as_ref()) == Some(Stage::Done) {
                store::set_stage(session.as_mut(), Stage::CardsCollected);
            }
            opts.battles_url()
        }
        Start::Resume => get_json::<ResumeMeta>(session.as_ref(), KEY_RESUME_META)
            .map(|m| m.continuation)
            .ok_or_else(|| eyre!("nothing to resume"))?,
    };

    let clock = SystemClock::new();
    let summary = run_autoflow(
        &opts,
        source.as_mut(),
        session.as_mut(),
        &clock,
        &start_url,
        Some(&mut CliProgress),
    )?;
    logf!("CLI: {} page loads, {} battles", summary.page_loads, summary.kept);

    let mut sink: Box<dyn ReportSink> = match &args.out {
        Some(p) => Box::new(FileSink(p.clone())),
        None => Box::new(StdoutSink),
    };
    let delivered = deliver(session.as_mut(), sink.as_mut(), &mut |text: &str| {
        eprintln!("Could not write the report; here it is:\n\n{text}");
    });
    match delivered {
        Delivery::NothingToDeliver => Err(eyre!("flow ended without a report (stage: {:?})", store::stage(session.as_ref()))),
        _ => Ok(()),
    }
}
