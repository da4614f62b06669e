//! Demo and attempt discovery
//!
//! An attempt is one directory of `fullgame_<n>.dem` files. Files are
//! processed in natural order (`fullgame_2` before `fullgame_10`), which
//! is the chronological order the game writes them in.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Demo discovery errors
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Directory could not be listed
    #[error("Cannot read directory {0}: {1}")]
    Unreadable(PathBuf, String),
}

/// One attempt directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptDir {
    /// Directory name
    pub id: String,
    pub path: PathBuf,
}

/// Sort key: base name and trailing `_<n>` index
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey {
    pub base: String,
    pub index: u64,
}

impl NaturalKey {
    /// Split `name` (extension `.dem` stripped, any case) into base and index
    ///
    /// Names without a numeric `_<n>` suffix get index 0.
    pub fn of(name: &str) -> Self {
        let stem = strip_dem_extension(name);
        if let Some((base, digits)) = stem.rsplit_once('_') {
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(index) = digits.parse::<u64>() {
                    return Self {
                        base: base.to_string(),
                        index,
                    };
                }
            }
        }
        Self {
            base: stem.to_string(),
            index: 0,
        }
    }
}

fn strip_dem_extension(name: &str) -> &str {
    let split = name.len().saturating_sub(4);
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(ext)) if ext.eq_ignore_ascii_case(".dem") => stem,
        _ => name,
    }
}

fn natural_order(a: &str, b: &str) -> Ordering {
    NaturalKey::of(a)
        .cmp(&NaturalKey::of(b))
        .then_with(|| a.cmp(b))
}

fn list_dir(dir: &Path) -> Result<Vec<walkdir::DirEntry>, ScanError> {
    if !dir.exists() {
        return Err(ScanError::PathNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        match entry {
            Ok(entry) => entries.push(entry),
            // Depth 0 is the directory itself: listing it failed
            Err(e) if e.depth() == 0 => {
                return Err(ScanError::Unreadable(dir.to_path_buf(), e.to_string()));
            }
            Err(e) => tracing::warn!("Error accessing entry: {}", e),
        }
    }
    Ok(entries)
}

/// Demo files of one attempt in natural order
pub fn collect_demos(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>, ScanError> {
    let mut demos: Vec<(String, PathBuf)> = list_dir(dir)?
        .into_iter()
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            let name = e.file_name().to_str()?.to_string();
            name.starts_with(prefix).then(|| (name, e.into_path()))
        })
        .collect();

    demos.sort_by(|(a, _), (b, _)| natural_order(a, b));

    tracing::debug!("Found {} demos in {}", demos.len(), dir.display());
    Ok(demos.into_iter().map(|(_, path)| path).collect())
}

/// Attempt directories under `root`, sorted by name
///
/// When `root` has no subdirectories it is itself the only attempt.
pub fn collect_attempt_dirs(root: &Path) -> Result<Vec<AttemptDir>, ScanError> {
    let mut attempts: Vec<AttemptDir> = list_dir(root)?
        .into_iter()
        .filter(|e| e.file_type().is_dir())
        .map(|e| AttemptDir {
            id: e.file_name().to_string_lossy().into_owned(),
            path: e.into_path(),
        })
        .collect();

    if attempts.is_empty() {
        attempts.push(AttemptDir {
            id: dir_name(root),
            path: root.to_path_buf(),
        });
    }

    attempts.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(attempts)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
