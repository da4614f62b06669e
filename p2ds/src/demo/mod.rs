//! Demo file reading
//!
//! Turns one `.dem` file into a [`DemoRecord`]: size guard, header parse,
//! frame walk, tick measurement, map name and completion-marker probe.
//! Every failure degrades to an invalid record; nothing here aborts an
//! attempt.

pub mod frames;
pub mod header;
pub mod probe;
mod reader;

#[cfg(test)]
#[path = "../../tests/helpers/demo_builder.rs"]
pub(crate) mod demo_builder;

use std::path::Path;
use std::sync::OnceLock;

use p2ds_common::segments::UNKNOWN_SEGMENT;
use p2ds_common::{DemoRecord, SplitConfig};
use regex::bytes::Regex as BytesRegex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::patterns::cached_bytes_regex;

pub use frames::{walk_frames, ConsoleCommand, FrameSummary};
pub use header::DemoHeader;
pub use probe::{MarkerHit, MarkerProbe};

/// How far into the file the map-name fallback looks
const MAP_SCAN_BYTES: usize = 8192;

/// Demo parsing errors
#[derive(Debug, Error)]
pub enum DemoError {
    #[error("Not a Source demo (bad magic)")]
    BadMagic,

    #[error("Unsupported demo protocol {0}")]
    UnsupportedProtocol(i32),

    #[error("Truncated demo: needed {needed} bytes at offset {offset}")]
    Truncated { offset: usize, needed: usize },

    #[error("Invalid length {size} at offset {offset}")]
    BadLength { offset: usize, size: i32 },

    #[error("Unknown demo command {byte} at offset {offset}")]
    UnknownCommand { offset: usize, byte: u8 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A parsed demo held in memory
#[derive(Debug)]
pub struct DemoFile {
    pub header: DemoHeader,
    /// `None` when the frame walk failed
    pub frames: Option<FrameSummary>,
    bytes: Vec<u8>,
}

impl DemoFile {
    /// Parse a whole demo; only a broken header is fatal
    pub fn parse(bytes: Vec<u8>) -> Result<Self, DemoError> {
        let header = DemoHeader::parse(&bytes)?;
        let frames = match walk_frames(&bytes, &header) {
            Ok(summary) => Some(summary),
            Err(e) => {
                debug!("Frame walk failed, using header values: {}", e);
                None
            }
        };

        Ok(Self {
            header,
            frames,
            bytes,
        })
    }

    /// Playback ticks: frame measurement when available, else the header
    ///
    /// Never 0; an empty demo counts as one tick.
    pub fn playback_ticks(&self) -> i64 {
        let ticks = self
            .frames
            .as_ref()
            .and_then(FrameSummary::measured_ticks)
            .unwrap_or_else(|| (self.header.playback_ticks as i64).max(0));
        ticks.max(1)
    }

    /// Playback seconds matching [`playback_ticks`](Self::playback_ticks)
    pub fn playback_secs(&self) -> f64 {
        self.playback_ticks() as f64 * self.header.interval_per_tick()
    }

    /// Map the demo was recorded on
    pub fn map_name(&self) -> String {
        let map = self.header.map_name.trim();
        if !map.is_empty() {
            return map.to_string();
        }
        let scan = &self.bytes[..self.bytes.len().min(MAP_SCAN_BYTES)];
        scan_map_token(scan).unwrap_or_else(|| UNKNOWN_SEGMENT.to_string())
    }
}

impl MarkerProbe for DemoFile {
    fn find_marker(&self, needles: &[&str]) -> Option<MarkerHit> {
        match &self.frames {
            Some(summary) => summary.console_commands.find_marker(needles),
            None => self.bytes.find_marker(needles),
        }
    }
}

/// First `sp_[a-z0-9_]+` token, matched case-insensitively
fn scan_map_token(bytes: &[u8]) -> Option<String> {
    static MAP_TOKEN: OnceLock<Result<BytesRegex, String>> = OnceLock::new();
    cached_bytes_regex(&MAP_TOKEN, r"(?i-u)sp_[a-z0-9_]+")?
        .find(bytes)
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
}

/// Read one demo file into a record
///
/// Oversized, unreadable and unparseable files become invalid records.
pub fn read_demo_record(path: &Path, config: &SplitConfig) -> DemoRecord {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let size = match std::fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) => {
            warn!("Cannot stat demo {}: {}", path.display(), e);
            return DemoRecord::invalid(name);
        }
    };
    let limit = config.max_demo_size_bytes();
    if size > limit {
        debug!(
            "Skipping oversized demo: {} ({:.2}MB > {}MB)",
            name,
            size as f64 / 1024.0 / 1024.0,
            config.max_demo_size_mb
        );
        return DemoRecord::invalid(name);
    }

    let demo = match std::fs::read(path)
        .map_err(DemoError::from)
        .and_then(DemoFile::parse)
    {
        Ok(demo) => demo,
        Err(e) => {
            warn!("Cannot parse demo {}: {}", path.display(), e);
            return DemoRecord::invalid(name);
        }
    };

    let map = demo.map_name();
    let needles = config.markers.needles_for(&map);
    let hit = demo.find_marker(&needles);
    let ticks = demo.playback_ticks();

    debug!(
        file = %name,
        map = %map,
        ticks,
        playback_secs = demo.playback_secs(),
        marker = ?hit.as_ref().map(|h| (h.location, h.tick)),
        "parsed demo"
    );

    DemoRecord::new(name, map, ticks, demo.playback_secs(), hit.is_some())
}
