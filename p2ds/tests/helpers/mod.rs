//! Test helpers for p2ds integration tests
//!
//! - DemoBuilder: synthetic `.dem` files
//! - attempt_dir: write a numbered demo sequence into a directory

#![allow(dead_code)]

pub mod demo_builder;

use std::path::Path;

pub use demo_builder::DemoBuilder;

/// Write `fullgame_<n>.dem` files, one per `(map, ticks, escape)` entry
pub fn attempt_dir(dir: &Path, demos: &[(&str, i32, bool)]) {
    std::fs::create_dir_all(dir).unwrap();
    for (i, (map, ticks, escape)) in demos.iter().enumerate() {
        let path = dir.join(format!("fullgame_{}.dem", i + 1));
        std::fs::write(path, DemoBuilder::finished_map(map, *ticks, *escape)).unwrap();
    }
}
