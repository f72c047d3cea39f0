use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IdMapError, Result};

/// Read a newline-delimited identifier list
///
/// Lines are trimmed and blank lines skipped; order and duplicates are kept.
pub fn read_identifiers<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| IdMapError::InputUnavailable {
        path: PathBuf::from(path),
        reason: e.to_string(),
    })?;

    Ok(parse_identifiers(&content))
}

/// Split text into identifiers, one per non-blank line
pub fn parse_identifiers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
