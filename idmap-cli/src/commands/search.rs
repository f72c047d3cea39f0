use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use idmap_client::config::DEFAULT_MAX_RESULTS;
use idmap_client::report::{DEFAULT_OUTPUT_DIR, format_count};
use idmap_client::search::DEFAULT_VARIANTS_PATH;
use idmap_client::{AffiliationSearcher, OutputPaths, SearchReport};
use tracing::{Instrument, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use super::{build_config, spinner_style};

#[derive(Args, Debug)]
pub struct Search {
    /// Start of the publication date range (YYYY/MM/DD)
    #[arg(value_name = "FROM_DATE")]
    pub from_date: Option<String>,

    /// End of the publication date range (YYYY/MM/DD); open-ended when omitted
    #[arg(value_name = "TO_DATE")]
    pub to_date: Option<String>,

    /// JSON file listing approved affiliation variants
    #[arg(long, default_value = DEFAULT_VARIANTS_PATH)]
    pub variants: PathBuf,

    /// Root directory for result files
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Maximum number of PMIDs requested from ESearch
    #[arg(long, default_value_t = DEFAULT_MAX_RESULTS)]
    pub max_results: usize,
}

impl Search {
    pub async fn execute_with_config(
        &self,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        let config = build_config(api_key, email, tool).with_max_results(self.max_results);

        let searcher = AffiliationSearcher::from_variants_file(config, &self.variants)
            .context("Cannot start affiliation search")?;

        let query = searcher.query(self.from_date.as_deref(), self.to_date.as_deref());

        println!("Searching PubMed for {} affiliation variants...", searcher.variants().len());
        if let Some(from) = query.from_date() {
            println!("Date range: {} to {}", from, query.to_date().unwrap_or("current"));
        }

        let span = info_span!("search");
        span.pb_set_style(&spinner_style()?);
        span.pb_set_message("Querying ESearch");

        let result = searcher
            .search_query(&query)
            .instrument(span)
            .await
            .context("PubMed search failed")?;

        if result.is_empty() {
            println!("No papers found");
            return Ok(());
        }

        if result.is_truncated() {
            println!(
                "Note: Found {} papers total, returned first {}",
                format_count(result.total_count),
                format_count(result.pmids.len())
            );
        }

        let report = SearchReport::new(
            result.pmids,
            query.from_date(),
            query.to_date(),
            chrono::Local::now(),
        );
        let files = report
            .write(&OutputPaths::new(&self.output_dir))
            .context("Failed to write search results")?;

        println!("\nFound {} papers", format_count(report.pmids.len()));
        println!("PMIDs saved to: {}", files.pmid_file.display());
        println!("Summary saved to: {}", files.summary_file.display());

        Ok(())
    }
}
