use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{IdMapError, Result};

/// Default location of the approved affiliation name list
pub const DEFAULT_VARIANTS_PATH: &str = "approved_variations.json";

#[derive(Debug, Deserialize)]
struct VariantsFile {
    variations: Vec<String>,
}

/// Load the approved institution name variants from a JSON file
///
/// The file must look like `{"variations": ["Name A", "Name B"]}`. A missing
/// file, malformed JSON or an empty list are all configuration errors.
pub fn load_variants<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let unavailable = |reason: String| IdMapError::VariantsUnavailable {
        path: PathBuf::from(path),
        reason,
    };

    let content = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
    let file: VariantsFile =
        serde_json::from_str(&content).map_err(|e| unavailable(e.to_string()))?;

    let variants: Vec<String> = file
        .variations
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();

    if variants.is_empty() {
        return Err(unavailable("no variations listed".to_string()));
    }

    debug!(count = variants.len(), path = %path.display(), "Loaded affiliation variants");
    Ok(variants)
}
