//! Subreddit list file: one name per line.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Trim a name and drop an `r/` or `/r/` prefix. Case is preserved.
#[inline]
pub fn normalize_community(s: &str) -> String {
    let s = s.trim();
    let s = s.strip_prefix('/').unwrap_or(s);
    s.strip_prefix("r/").unwrap_or(s).trim_end_matches('/').to_string()
}

/// Read subreddit names in file order. Blank lines and `#` comments are skipped.
/// A file with no names yields an empty list.
pub fn read_communities(path: &Path) -> Result<Vec<String>> {
    let f = File::open(path).with_context(|| format!("open input {}", path.display()))?;
    let mut out = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line.with_context(|| format!("read {}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let name = normalize_community(trimmed);
        if !name.is_empty() {
            out.push(name);
        }
    }
    if out.is_empty() {
        tracing::warn!(path = %path.display(), "no subreddit names in input");
    }
    Ok(out)
}
