use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use idmap_client::config::{DEFAULT_BATCH_DELAY, MAX_BATCH_SIZE};
use idmap_client::input::read_identifiers;
use idmap_client::report::timestamp_slug;
use idmap_client::{ConversionReport, IdConverter, OutputPaths};
use tracing::{Instrument, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use super::{build_config, spinner_style};

#[derive(Args, Debug)]
pub struct Convert {
    /// File with one PMID per line
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: PathBuf,

    /// Output JSON path (default: output/pubmed_centralID/pmcid_map_<timestamp>.json)
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// PMIDs per ID Converter request (at most 200)
    #[arg(long, default_value_t = MAX_BATCH_SIZE)]
    pub batch_size: usize,

    /// Pause between requests in milliseconds
    #[arg(long, default_value_t = DEFAULT_BATCH_DELAY.as_millis() as u64)]
    pub delay_ms: u64,
}

impl Convert {
    pub async fn execute_with_config(
        &self,
        api_key: Option<&str>,
        email: Option<&str>,
        tool: &str,
    ) -> Result<()> {
        println!("Reading PMIDs from {}...", self.input_file.display());
        let pmids = read_identifiers(&self.input_file)?;
        println!("Found {} PMIDs to process", pmids.len());

        let created = chrono::Local::now();
        let output_file = self
            .output_file
            .clone()
            .unwrap_or_else(|| OutputPaths::default().conversion_map(&timestamp_slug(&created)));

        // The ID Converter never receives the API key
        let config = build_config(api_key, email, tool)
            .with_batch_size(self.batch_size)
            .with_batch_delay(Duration::from_millis(self.delay_ms));

        let converter = IdConverter::with_config(config)?;

        let span = info_span!("convert");
        span.pb_set_style(&spinner_style()?);
        span.pb_set_message(&format!(
            "Fetching PubMed Central IDs ({} batches)",
            converter.batch_count(pmids.len())
        ));

        let outcome = converter.convert(&pmids).instrument(span).await;
        println!(
            "Found {} PMC IDs out of {} PMIDs",
            outcome.found_count(),
            outcome.mappings.len()
        );
        if outcome.batches_failed > 0 {
            println!(
                "Warning: {} of {} batches failed; their PMIDs are reported without PMC IDs",
                outcome.batches_failed, outcome.batches_sent
            );
        }

        let report = ConversionReport::new(
            outcome.mappings,
            self.input_file.display().to_string(),
            &created,
        );
        report
            .write_json(&output_file)
            .with_context(|| format!("Failed to write {}", output_file.display()))?;

        println!("\nResults saved to {}", output_file.display());
        println!("  Total PMIDs: {}", report.metadata.total_pmids);
        println!("  With PMC IDs: {}", report.metadata.pmcids_found);
        println!("  Without PMC IDs: {}", report.metadata.pmcids_missing);

        Ok(())
    }
}
