//! Lazily compiled text patterns
//!
//! Patterns are compiled once per process into a `OnceLock`. A pattern that
//! fails to compile is logged once per call site and the caller treats it
//! as "no match".

use std::sync::OnceLock;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;
use tracing::error;

/// Compiled string pattern, or `None` when `pattern` is invalid
pub(crate) fn cached_regex(
    cell: &'static OnceLock<Result<Regex, String>>,
    pattern: &str,
) -> Option<&'static Regex> {
    compiled(cell, pattern, || Regex::new(pattern))
}

/// Compiled byte pattern, for scanning binary data
pub(crate) fn cached_bytes_regex(
    cell: &'static OnceLock<Result<BytesRegex, String>>,
    pattern: &str,
) -> Option<&'static BytesRegex> {
    compiled(cell, pattern, || BytesRegex::new(pattern))
}

fn compiled<T>(
    cell: &'static OnceLock<Result<T, String>>,
    pattern: &str,
    build: impl FnOnce() -> Result<T, regex::Error>,
) -> Option<&'static T> {
    match cell.get_or_init(|| build().map_err(|e| e.to_string())) {
        Ok(re) => Some(re),
        Err(msg) => {
            error!(pattern, error = %msg, "pattern failed to compile");
            None
        }
    }
}
