//! JSON reports (`--json`)

use std::path::Path;

use chrono::{DateTime, Utc};
use p2ds_common::gate::GateState;
use p2ds_common::timing::ticks_to_seconds;
use p2ds_common::{AttemptResult, GoldBook, SplitConfig};
use serde::Serialize;

/// One segment of a single attempt
#[derive(Debug, Clone, Serialize)]
pub struct SegmentEntry {
    pub segment_id: String,
    pub ticks: i64,
    pub seconds: f64,
    pub valid: bool,
    pub finished: bool,
    pub sources: Vec<String>,
    /// Gate state, canonical segments only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<GateState>,
}

/// Single-attempt report
#[derive(Debug, Clone, Serialize)]
pub struct AttemptReport {
    pub generated_at: DateTime<Utc>,
    pub attempt_id: String,
    pub finished: usize,
    pub segments: Vec<SegmentEntry>,
}

impl AttemptReport {
    /// Groups in attempt order
    pub fn new(result: &AttemptResult) -> Self {
        Self {
            generated_at: Utc::now(),
            attempt_id: result.attempt_id.clone(),
            finished: result.finished_count(),
            segments: result
                .groups
                .iter()
                .map(|g| SegmentEntry {
                    segment_id: g.segment_id.clone(),
                    ticks: g.ticks,
                    seconds: g.seconds(),
                    valid: g.valid,
                    finished: g.finished,
                    sources: g.source_ids.clone(),
                    state: result.state(&g.segment_id),
                })
                .collect(),
        }
    }
}

/// One canonical segment of the gold summary
#[derive(Debug, Clone, Serialize)]
pub struct GoldEntry {
    pub segment_id: String,
    pub best_ticks: Option<i64>,
    pub best_seconds: Option<f64>,
    pub origin: Option<String>,
}

/// Gold-mode report
#[derive(Debug, Clone, Serialize)]
pub struct GoldReport {
    pub generated_at: DateTime<Utc>,
    pub attempts_folded: usize,
    pub found: usize,
    pub total: usize,
    pub golds: Vec<GoldEntry>,
}

impl GoldReport {
    /// Raw best times (no display offset) in canonical order
    pub fn new(book: &GoldBook, config: &SplitConfig, attempts_folded: usize) -> Self {
        let golds: Vec<GoldEntry> = book
            .in_canonical_order(config)
            .map(|(id, record)| GoldEntry {
                segment_id: id.to_string(),
                best_ticks: record.map(|r| r.best_ticks),
                best_seconds: record.map(|r| ticks_to_seconds(r.best_ticks)),
                origin: record.map(|r| r.origin.to_string()),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            attempts_folded,
            found: golds.iter().filter(|g| g.best_ticks.is_some()).count(),
            total: golds.len(),
            golds,
        }
    }
}

/// Pretty-print a report to `path`
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> crate::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
