//! Output reports and their on-disk locations
//!
//! Reports are assembled in memory once all network work is done and are
//! written exactly once.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::MappingRecord;

/// Default root directory for all outputs
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// File-name timestamp, e.g. `20240820_101112`
pub fn timestamp_slug(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// `_YYYY` when both dates are present and fall in the same year, else empty
///
/// ```
/// use idmap_client::report::year_suffix;
///
/// assert_eq!(year_suffix(Some("2024/01/01"), Some("2024/12/31")), "_2024");
/// assert_eq!(year_suffix(Some("2023/01/01"), Some("2024/12/31")), "");
/// assert_eq!(year_suffix(Some("2024/01/01"), None), "");
/// ```
pub fn year_suffix(from_date: Option<&str>, to_date: Option<&str>) -> String {
    let (Some(from), Some(to)) = (from_date, to_date) else {
        return String::new();
    };

    let from_year = from.split('/').next().unwrap_or_default();
    let to_year = to.split('/').next().unwrap_or_default();

    if !from_year.is_empty() && from_year == to_year {
        format!("_{from_year}")
    } else {
        String::new()
    }
}

/// Format a count with `,` thousands separators
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Output file layout under a root directory
#[derive(Debug, Clone)]
pub struct OutputPaths {
    root: PathBuf,
}

impl OutputPaths {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/pubmedID/pmids_<ts><suffix>.txt`
    pub fn search_pmids(&self, timestamp: &str, suffix: &str) -> PathBuf {
        self.root
            .join("pubmedID")
            .join(format!("pmids_{timestamp}{suffix}.txt"))
    }

    /// `<root>/search_summary_<ts><suffix>.txt`
    pub fn search_summary(&self, timestamp: &str, suffix: &str) -> PathBuf {
        self.root
            .join(format!("search_summary_{timestamp}{suffix}.txt"))
    }

    /// `<root>/pubmed_centralID/pmcid_map_<ts>.json`
    pub fn conversion_map(&self, timestamp: &str) -> PathBuf {
        self.root
            .join("pubmed_centralID")
            .join(format!("pmcid_map_{timestamp}.json"))
    }
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

/// Summary block of a conversion report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionMetadata {
    pub total_pmids: usize,
    pub pmcids_found: usize,
    pub pmcids_missing: usize,
    pub created: String,
    pub source_file: String,
}

/// JSON report written by the converter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    pub metadata: ConversionMetadata,
    pub mappings: Vec<MappingRecord>,
}

impl ConversionReport {
    /// Build a report; counts are derived from `mappings`
    pub fn new<S: Into<String>>(
        mappings: Vec<MappingRecord>,
        source_file: S,
        created: &DateTime<Local>,
    ) -> Self {
        let total = mappings.len();
        let found = mappings.iter().filter(|m| m.is_found()).count();

        Self {
            metadata: ConversionMetadata {
                total_pmids: total,
                pmcids_found: found,
                pmcids_missing: total - found,
                created: created.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
                source_file: source_file.into(),
            },
            mappings,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "Conversion report saved");
        Ok(())
    }
}

/// Files produced by a search run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFiles {
    pub pmid_file: PathBuf,
    pub summary_file: PathBuf,
}

/// PMID list and human-readable summary written by the searcher
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub pmids: Vec<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub created: DateTime<Local>,
}

impl SearchReport {
    pub fn new(
        pmids: Vec<String>,
        from_date: Option<&str>,
        to_date: Option<&str>,
        created: DateTime<Local>,
    ) -> Self {
        Self {
            pmids,
            from_date: from_date.map(str::to_string),
            to_date: to_date.map(str::to_string),
            created,
        }
    }

    /// Year suffix used in this report's file names
    pub fn suffix(&self) -> String {
        year_suffix(self.from_date.as_deref(), self.to_date.as_deref())
    }

    /// Human-readable `from to to` range, or `None` without a start date
    pub fn date_range_label(&self) -> Option<String> {
        self.from_date.as_ref().map(|from| {
            format!(
                "{from} to {}",
                self.to_date.as_deref().unwrap_or("current")
            )
        })
    }

    /// Summary text referencing the PMID file
    pub fn render_summary(&self, pmid_file: &Path) -> String {
        let mut summary = String::new();
        summary.push_str("PubMed Affiliation Search Results\n");
        summary.push_str(&"=".repeat(50));
        summary.push('\n');
        summary.push_str(&format!(
            "Date: {}\n",
            self.created.format("%Y-%m-%d %H:%M:%S")
        ));
        summary.push_str(&format!("Papers found: {}\n", format_count(self.pmids.len())));
        if let Some(range) = self.date_range_label() {
            summary.push_str(&format!("Date range: {range}\n"));
        }
        summary.push_str(&format!("Output file: {}\n", pmid_file.display()));
        summary
    }

    /// Write the PMID list and summary under `paths`
    pub fn write(&self, paths: &OutputPaths) -> Result<SearchFiles> {
        let timestamp = timestamp_slug(&self.created);
        let suffix = self.suffix();

        let pmid_file = paths.search_pmids(&timestamp, &suffix);
        let summary_file = paths.search_summary(&timestamp, &suffix);

        ensure_parent(&pmid_file)?;
        let mut listing = String::with_capacity(self.pmids.len() * 9);
        for pmid in &self.pmids {
            listing.push_str(pmid);
            listing.push('\n');
        }
        fs::write(&pmid_file, listing)?;

        ensure_parent(&summary_file)?;
        fs::write(&summary_file, self.render_summary(&pmid_file))?;

        info!(
            pmid_file = %pmid_file.display(),
            summary_file = %summary_file.display(),
            "Search results saved"
        );

        Ok(SearchFiles {
            pmid_file,
            summary_file,
        })
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
