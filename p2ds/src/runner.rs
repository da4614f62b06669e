//! Run modes
//!
//! - single: one attempt directory -> map times + `.lss`
//! - gold: every attempt under a root -> best-segment summary
//!
//! Attempts are independent in gold mode: one that fails is logged and
//! skipped while its siblings continue.

use std::path::{Path, PathBuf};

use p2ds_common::{process_attempt, AttemptResult, DemoRecord, GoldAggregator, SplitConfig};
use tracing::{debug, info, warn};

use crate::demo::read_demo_record;
use crate::golds_file::{load_override_table, override_candidates};
use crate::render::report::write_json;
use crate::render::{build_gold_table, build_lss, build_map_times, AttemptReport, GoldReport};
use crate::scanner::{collect_attempt_dirs, collect_demos};
use crate::{AppError, Result};

/// Attempt id used in single-attempt mode
pub const SINGLE_ATTEMPT_ID: &str = "current_run";

/// Where outputs go
#[derive(Debug, Clone)]
pub struct OutputOptions {
    /// Output path prefix (`splits` -> `splits.lss`, `splits_map_times.txt`)
    pub out_base: String,
    /// Optional JSON report path
    pub json: Option<PathBuf>,
}

impl OutputOptions {
    pub fn new(out_base: impl Into<String>) -> Self {
        Self {
            out_base: out_base.into(),
            json: None,
        }
    }

    pub fn map_times_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_map_times.txt", self.out_base))
    }

    pub fn lss_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.lss", self.out_base))
    }

    pub fn gold_table_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_splits_gold.txt", self.out_base))
    }
}

/// Outcome of single-attempt mode
#[derive(Debug)]
pub struct SingleRun {
    pub result: AttemptResult,
    pub map_times_path: PathBuf,
    pub lss_path: PathBuf,
    /// Segments with a best time from the override table
    pub overrides_used: usize,
}

/// Outcome of gold mode
#[derive(Debug)]
pub struct GoldRun {
    pub table_path: PathBuf,
    pub attempts_folded: usize,
    pub attempts_skipped: usize,
    /// Segments with a best time
    pub found: usize,
    /// Canonical segment count
    pub total: usize,
}

/// Read and process one attempt directory
///
/// `Ok(None)` when the directory has no demos or no usable record.
pub fn read_attempt(
    dir: &Path,
    attempt_id: &str,
    config: &SplitConfig,
) -> Result<Option<AttemptResult>> {
    let demos = collect_demos(dir, &config.demo_prefix)?;
    if demos.is_empty() {
        debug!("No demos found in: {}", dir.display());
        return Ok(None);
    }

    let records: Vec<DemoRecord> = demos
        .iter()
        .map(|path| read_demo_record(path, config))
        .collect();

    Ok(process_attempt(attempt_id, &records, config))
}

/// Process `demos_dir` as one attempt and write its outputs
pub fn run_single(
    demos_dir: &Path,
    output: &OutputOptions,
    config: &SplitConfig,
) -> Result<SingleRun> {
    let result = read_attempt(demos_dir, SINGLE_ATTEMPT_ID, config)?
        .ok_or_else(|| AppError::NoDemoData(demos_dir.display().to_string()))?;

    let map_times_path = output.map_times_path();
    std::fs::write(&map_times_path, build_map_times(&result, config).join("\n"))?;
    info!("Wrote map-times to {}", map_times_path.display());

    let overrides = load_override_table(&override_candidates(&output.out_base), config);
    let overrides_used = overrides.as_ref().map_or(0, |table| table.len());
    if overrides_used > 0 {
        info!("Using {} gold splits from file", overrides_used);
    }

    let lss_path = output.lss_path();
    std::fs::write(&lss_path, build_lss(&result, config, overrides.as_ref()))?;
    info!("Wrote LiveSplit .lss to {}", lss_path.display());

    if let Some(json) = &output.json {
        write_json(json, &AttemptReport::new(&result))?;
        info!("Wrote JSON report to {}", json.display());
    }

    Ok(SingleRun {
        result,
        map_times_path,
        lss_path,
        overrides_used,
    })
}

/// Fold every attempt under `root` and write the gold summary
pub fn run_gold(root: &Path, output: &OutputOptions, config: &SplitConfig) -> Result<GoldRun> {
    let attempts = collect_attempt_dirs(root)?;
    let mut golds = GoldAggregator::new(config);
    let mut attempts_skipped = 0;

    for attempt in &attempts {
        debug!("--- Processing run for gold: {} ---", attempt.id);
        match read_attempt(&attempt.path, &attempt.id, config) {
            Ok(Some(result)) => {
                let improved = golds.fold_attempt(&result);
                debug!("{} improved {} golds", attempt.id, improved);
            }
            Ok(None) => {
                debug!("No usable demo data in {}, skipping", attempt.id);
                attempts_skipped += 1;
            }
            Err(e) => {
                warn!("Skipping attempt {}: {}", attempt.id, e);
                attempts_skipped += 1;
            }
        }
    }

    let attempts_folded = golds.attempts_folded();
    let book = golds.finish();

    let table_path = output.gold_table_path();
    std::fs::write(&table_path, build_gold_table(&book, config).join("\n"))?;
    info!("Gold summary written to {}", table_path.display());

    let total = config.segments.len();
    info!("Found {} valid gold splits out of {} maps", book.len(), total);

    if let Some(json) = &output.json {
        write_json(json, &GoldReport::new(&book, config, attempts_folded))?;
        info!("Wrote JSON report to {}", json.display());
    }

    Ok(GoldRun {
        table_path,
        attempts_folded,
        attempts_skipped,
        found: book.len(),
        total,
    })
}
