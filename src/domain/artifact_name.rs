use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

pub const FALLBACK_STEM: &str = "artifact";
pub const DEFAULT_MAX_LENGTH: usize = 80;
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Derives a filesystem-safe file name from arbitrary text.
///
/// Runs of characters outside `[A-Za-z0-9]` collapse into a single hyphen and
/// the stem is cut to `max_length` characters before the extension is
/// appended. A `max_length` of zero disables truncation. Input that leaves
/// nothing behind maps to [`FALLBACK_STEM`].
pub fn safe_filename(name: &str, extension: Option<&str>, max_length: usize) -> String {
    let collapsed = NON_ALPHANUMERIC.replace_all(name, "-");
    let mut stem = collapsed.trim_matches('-').to_string();

    if max_length > 0 && stem.len() > max_length {
        // the stem is pure ASCII at this point, so byte truncation is safe
        stem.truncate(max_length);
        stem = stem.trim_end_matches('-').to_string();
    }

    if stem.is_empty() {
        stem = FALLBACK_STEM.to_string();
    }

    match normalize_extension(extension) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

fn normalize_extension(extension: Option<&str>) -> Option<&str> {
    extension
        .map(|ext| ext.trim().trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
}

/// Builds a stem of the form `{prefix}-{YYYYMMDDTHHMMSS}`.
///
/// Resolution is one second: two calls with the same prefix inside the same
/// second yield the same stem.
pub fn timestamped_stem(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}", prefix, at.format(TIMESTAMP_FORMAT))
}
