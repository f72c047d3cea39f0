use reqwest::{Client, Response};
use tracing::{debug, error, info, instrument, warn};

use crate::config::{ClientConfig, MAX_BATCH_SIZE};
use crate::error::{IdMapError, Result};
use crate::idconv::responses::{IdConvRecord, IdConvResponse};
use crate::models::{ConversionOutcome, MappingRecord};
use crate::pacing::BatchPacer;

/// Batched PMID → PMCID converter backed by the PMC ID Converter API
///
/// Identifiers are sent in contiguous batches of at most `batch_size`. A batch
/// that fails for any reason (transport, HTTP status, unparsable body) turns
/// into missing records for exactly that batch; the run always continues.
#[derive(Clone, Debug)]
pub struct IdConverter {
    client: Client,
    base_url: String,
    batch_size: usize,
    pacer: BatchPacer,
    config: ClientConfig,
}

impl IdConverter {
    /// Create a converter with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::new())
    }

    /// Create a converter with custom configuration
    ///
    /// # Example
    ///
    /// ```
    /// use idmap_client::{ClientConfig, IdConverter};
    /// use std::time::Duration;
    ///
    /// let config = ClientConfig::new()
    ///     .with_email("researcher@university.edu")
    ///     .with_batch_size(100)
    ///     .with_batch_delay(Duration::from_millis(500));
    ///
    /// let converter = IdConverter::with_config(config).unwrap();
    /// assert_eq!(converter.batch_size(), 100);
    /// ```
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = config.build_http_client()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a converter around an existing HTTP client
    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            base_url: config.effective_idconv_base_url().to_string(),
            batch_size: config.batch_size.clamp(1, MAX_BATCH_SIZE),
            pacer: BatchPacer::new(config.batch_delay),
            config,
        }
    }

    /// IDs per request, always within `1..=MAX_BATCH_SIZE`
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Number of requests `convert` issues for `total_ids` identifiers
    pub fn batch_count(&self, total_ids: usize) -> usize {
        total_ids.div_ceil(self.batch_size())
    }

    /// Convert every identifier, one record per input in batch order
    ///
    /// An empty input returns immediately without touching the network.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use idmap_client::IdConverter;
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let converter = IdConverter::new()?;
    ///     let outcome = converter.convert(&["23193287", "31978945"]).await;
    ///     for record in &outcome.mappings {
    ///         println!("{} -> {:?}", record.pubmed_id, record.pmc_id);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip_all, fields(total_ids = ids.len(), batch_size = self.batch_size()))]
    pub async fn convert<S: AsRef<str>>(&self, ids: &[S]) -> ConversionOutcome {
        let mut outcome = ConversionOutcome::default();
        if ids.is_empty() {
            debug!("No identifiers to convert");
            return outcome;
        }

        let total_batches = self.batch_count(ids.len());
        outcome.mappings.reserve(ids.len());

        info!(total_batches, "Converting identifiers in batches");

        for (batch_idx, chunk) in ids.chunks(self.batch_size()).enumerate() {
            let batch: Vec<&str> = chunk.iter().map(|id| id.as_ref()).collect();

            match self.convert_batch(&batch, batch_idx + 1).await {
                Ok(records) => {
                    info!(
                        batch_index = batch_idx + 1,
                        pmcids_found = records.iter().filter(|r| r.is_found()).count(),
                        "Batch processed successfully"
                    );
                    outcome.mappings.extend(records);
                }
                Err(e) => {
                    error!(
                        batch_index = batch_idx + 1,
                        error = %e,
                        "Failed to process batch, marking its identifiers as missing"
                    );
                    outcome.batches_failed += 1;
                    outcome
                        .mappings
                        .extend(batch.iter().map(|id| MappingRecord::missing(*id)));
                }
            }
            outcome.batches_sent += 1;

            self.pacer.pause_after(batch_idx, total_batches).await;
        }

        outcome
    }

    /// Convert a single batch with one request
    ///
    /// Records follow the response order. Requested IDs the response does not
    /// account for are appended as missing, so the result always has exactly
    /// `batch.len()` records.
    #[instrument(skip(self, batch), fields(batch_size = batch.len()))]
    pub async fn convert_batch(
        &self,
        batch: &[&str],
        batch_index: usize,
    ) -> Result<Vec<MappingRecord>> {
        let url = self.build_url(batch);
        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let parsed: IdConvResponse = serde_json::from_str(&body)?;

        if let Some(message) = parsed.error_message() {
            return Err(IdMapError::ApiError {
                status: 200,
                message: format!("ID converter error: {message}"),
            });
        }

        let Some(records) = parsed.records else {
            return Err(IdMapError::ApiError {
                status: 200,
                message: "ID converter response has no records".to_string(),
            });
        };

        Ok(reconcile(batch, records))
    }

    fn build_url(&self, batch: &[&str]) -> String {
        format!(
            "{}/?ids={}&format=json&email={}&tool={}",
            self.base_url,
            urlencoding::encode(&batch.join(",")),
            urlencoding::encode(self.config.effective_email()),
            urlencoding::encode(self.config.effective_tool()),
        )
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        debug!("Making ID converter request to: {url}");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!("ID converter request failed with status: {}", response.status());
            return Err(IdMapError::from_status(response.status()));
        }

        Ok(response)
    }
}

/// Pair response records with the requested IDs of one batch
fn reconcile(requested: &[&str], records: Vec<IdConvRecord>) -> Vec<MappingRecord> {
    let mut consumed = vec![false; requested.len()];
    let mut mappings = Vec::with_capacity(requested.len());

    for record in &records {
        let Some(source) = record.source_id() else {
            warn!("Skipping converter record without an identifier");
            continue;
        };

        let slot = requested
            .iter()
            .enumerate()
            .position(|(i, id)| !consumed[i] && id.trim() == source);

        match slot {
            Some(i) => {
                consumed[i] = true;
                if let Some(errmsg) = &record.errmsg {
                    debug!(id = %source, errmsg = %errmsg, "Converter reported a record error");
                }
                mappings.push(MappingRecord {
                    pubmed_id: source.to_string(),
                    pmc_id: record.target_id().map(str::to_string),
                });
            }
            None => warn!(id = %source, "Skipping converter record that was not requested"),
        }
    }

    for (id, _) in requested
        .iter()
        .zip(consumed.iter())
        .filter(|(_, used)| !**used)
    {
        debug!(id = %id, "No converter record returned, marking as missing");
        mappings.push(MappingRecord::missing(*id));
    }

    mappings
}
