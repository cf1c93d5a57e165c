// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific readers for RoyaleAPI. Each one knows *where the ground truth
//! lives in the HTML* of a single page type and *how to extract it robustly*.
//!
//! ## What lives here
//! - **Pure HTML parsing** over `scraper` documents (battle cards, card tiles,
//!   the history link).
//! - **Selector precedence** as explicit fallback chains (`resolver::Chain`):
//!   exact class → class fragment → label text, profile link → tag lists, …
//! - **Tolerant extraction**: missing nodes degrade to empty strings, a card
//!   that cannot be read is skipped, never the whole batch.
//!
//! ## What does **not** live here
//! - **Scrolling and waiting** on a live page (`engine::convergence`,
//!   `engine::stability`).
//! - **Merging, capping, paging decisions** (`engine::merge`,
//!   `engine::pagination`).
//! - **Persistence** across page loads (`store`).
//!
//! ## Typical call chain
//! ```text
//! flow → engine::pagination::step → specs::battle::extract_batch
//!                                 ↘ specs::history::next_history_url
//! flow → specs::cards::collect_cards (cards page only)
//! ```
//!
//! ## Testing notes
//! All specs are tested offline against small HTML fixtures built in the tests.
pub mod battle;
pub mod cards;
pub mod history;
pub mod resolver;
