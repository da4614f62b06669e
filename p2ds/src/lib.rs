//! # p2ds
//!
//! Demo splits tool: reads Source-engine demo recordings of speedrun
//! attempts and writes per-segment times, a LiveSplit splits file, or a
//! best-segment ("gold") summary across attempts.
//!
//! The timing and aggregation engine lives in `p2ds_common`; this crate
//! holds the demo reader, file discovery, renderers and the run modes.

pub mod demo;
pub mod error;
pub mod golds_file;
mod patterns;
pub mod render;
pub mod runner;
pub mod scanner;

pub use error::{AppError, Result};
