//! Adaptive kana drill engine.
//!
//! Questions are drawn from a pool weighted by past mistakes, answers are
//! padded with distractors that look or sound alike, and every result is
//! booked on per-sign statistics that feed the next pool.

pub mod config;
pub mod engine;
pub mod error;
pub mod kana;
pub mod session;
pub mod store;

pub use error::{DrillError, DrillResult};
