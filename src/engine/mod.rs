// src/engine/mod.rs
//! Collection engine: everything between "a battles page is open" and
//! "the report has its numbers".
//!
//! - `convergence` scrolls the infinite list until it stops growing.
//! - `stability` waits for the battle count to go quiet.
//! - `merge` folds a batch into the capped, newest-first collection.
//! - `pagination` runs one page through all of the above and picks the next state.
//! - `analysis` ranks opponent cards over the final window.

pub mod analysis;
pub mod convergence;
pub mod merge;
pub mod pagination;
pub mod stability;
