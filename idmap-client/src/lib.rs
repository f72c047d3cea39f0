//! # idmap-client
//!
//! Retrieve bibliographic identifiers from NCBI:
//!
//! - **Affiliation search**: one ESearch request for every PubMed record whose
//!   affiliation matches an approved list of institution name variants,
//!   optionally restricted to a publication date range.
//! - **PMID → PMCID conversion**: batched lookups against the PMC ID Converter,
//!   where a failed batch degrades to missing mappings instead of failing the run.
//!
//! Everything runs sequentially; requests are never issued concurrently.
//!
//! ## Converting identifiers
//!
//! ```no_run
//! use idmap_client::{ClientConfig, ConversionReport, IdConverter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new().with_email("researcher@university.edu");
//!     let converter = IdConverter::with_config(config)?;
//!
//!     let ids = idmap_client::input::read_identifiers("pmids.txt")?;
//!     let outcome = converter.convert(&ids).await;
//!
//!     let report = ConversionReport::new(outcome.mappings, "pmids.txt", &chrono::Local::now());
//!     report.write_json("pmcid_map.json")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Searching by affiliation
//!
//! ```no_run
//! use idmap_client::{AffiliationSearcher, ClientConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new()
//!         .with_email("researcher@university.edu")
//!         .with_api_key("your_api_key_here");
//!     let searcher = AffiliationSearcher::from_variants_file(config, "approved_variations.json")?;
//!
//!     let result = searcher.search(Some("2024/01/01"), None).await?;
//!     if result.is_truncated() {
//!         println!("Only {} of {} papers returned", result.pmids.len(), result.total_count);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod idconv;
pub mod input;
pub mod models;
pub mod pacing;
pub mod report;
pub mod search;

// Re-export main types for convenience
pub use config::{ClientConfig, Credentials};
pub use error::{IdMapError, Result};
pub use idconv::IdConverter;
pub use models::{ConversionOutcome, MappingRecord, SearchResult};
pub use report::{ConversionReport, OutputPaths, SearchReport};
pub use search::{AffiliationQuery, AffiliationSearcher};
