//! # P2DS Common Library
//!
//! Core of the demo splits tool, shared by the `p2ds` binary:
//! - Tick/seconds/clock-string conversion (`timing`)
//! - Grouping of per-file demo records into per-segment groups (`segments`)
//! - Forced-segment override (`forced`)
//! - Sequential completion gating over the canonical segment order (`gate`)
//! - Per-attempt pipeline (`attempt`)
//! - Cross-attempt best-time aggregation (`gold`)
//! - Injected configuration (`config`)

pub mod attempt;
pub mod config;
pub mod error;
pub mod forced;
pub mod gate;
pub mod gold;
pub mod segments;
pub mod timing;

pub use attempt::{process_attempt, AttemptResult};
pub use config::SplitConfig;
pub use error::{Error, Result};
pub use gold::{GoldAggregator, GoldBook, GoldOrigin, GoldRecord};
pub use segments::{DemoRecord, SegmentGroup};
