// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod page;
pub mod record;
pub mod specs;

pub mod engine;
pub mod flow;
pub mod progress;
pub mod report;
pub mod runner;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
pub mod gui;
