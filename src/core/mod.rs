// src/core/mod.rs

pub mod clock;
pub mod html;
pub mod net;
pub mod sanitize;
pub mod time;
pub mod wait;

pub use clock::{Clock, ManualClock, SystemClock};
