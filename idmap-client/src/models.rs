//! Data types produced by the searcher and the converter

use serde::{Deserialize, Serialize};

/// One input PMID paired with the PMCID it resolved to, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub pubmed_id: String,
    pub pmc_id: Option<String>,
}

impl MappingRecord {
    pub fn found<S: Into<String>, T: Into<String>>(pubmed_id: S, pmc_id: T) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
            pmc_id: Some(pmc_id.into()),
        }
    }

    pub fn missing<S: Into<String>>(pubmed_id: S) -> Self {
        Self {
            pubmed_id: pubmed_id.into(),
            pmc_id: None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.pmc_id.is_some()
    }
}

/// Result of a full conversion run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionOutcome {
    /// One record per input identifier, in batch order
    pub mappings: Vec<MappingRecord>,
    /// Number of requests issued
    pub batches_sent: usize,
    /// Requests whose results were replaced by missing records
    pub batches_failed: usize,
}

impl ConversionOutcome {
    pub fn found_count(&self) -> usize {
        self.mappings.iter().filter(|m| m.is_found()).count()
    }

    pub fn missing_count(&self) -> usize {
        self.mappings.len() - self.found_count()
    }
}

/// PMIDs returned by a single ESearch request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Returned PMIDs, in server order
    pub pmids: Vec<String>,
    /// Total number of matches reported by the server
    pub total_count: usize,
    /// How PubMed interpreted the query, when reported
    pub query_translation: Option<String>,
}

impl SearchResult {
    /// True when the server matched more records than it returned
    pub fn is_truncated(&self) -> bool {
        self.total_count > self.pmids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pmids.is_empty()
    }
}
