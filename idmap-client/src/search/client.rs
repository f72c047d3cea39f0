use std::path::{Path, PathBuf};

use reqwest::{Client, Response};
use tracing::{debug, info, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{IdMapError, Result};
use crate::models::SearchResult;
use crate::search::query::AffiliationQuery;
use crate::search::responses::ESearchResult;
use crate::search::variants::load_variants;

/// Single-request ESearch client for institution affiliation queries
///
/// Construction fails before any network I/O when credentials or the
/// affiliation variant list are missing.
#[derive(Clone, Debug)]
pub struct AffiliationSearcher {
    client: Client,
    base_url: String,
    variants: Vec<String>,
    config: ClientConfig,
}

impl AffiliationSearcher {
    /// Create a searcher over an in-memory variant list
    ///
    /// # Errors
    ///
    /// * `IdMapError::MissingCredentials` - email or API key unset
    /// * `IdMapError::VariantsUnavailable` - empty variant list
    ///
    /// # Example
    ///
    /// ```
    /// use idmap_client::{AffiliationSearcher, ClientConfig};
    ///
    /// let config = ClientConfig::new()
    ///     .with_email("researcher@university.edu")
    ///     .with_api_key("your_api_key_here");
    ///
    /// let searcher = AffiliationSearcher::with_variants(config, vec!["Example Hospital".to_string()]);
    /// assert!(searcher.is_ok());
    ///
    /// let missing = AffiliationSearcher::with_variants(ClientConfig::new(), vec!["x".to_string()]);
    /// assert!(missing.unwrap_err().is_configuration_error());
    /// ```
    pub fn with_variants(config: ClientConfig, variants: Vec<String>) -> Result<Self> {
        config.require_credentials()?;

        if variants.is_empty() {
            return Err(IdMapError::VariantsUnavailable {
                path: PathBuf::from("<inline>"),
                reason: "no variations provided".to_string(),
            });
        }

        let client = config.build_http_client()?;

        Ok(Self {
            client,
            base_url: config.effective_eutils_base_url().to_string(),
            variants,
            config,
        })
    }

    /// Create a searcher, loading variants from `{"variations": [...]}` JSON
    ///
    /// Credentials are checked before the file is read.
    pub fn from_variants_file<P: AsRef<Path>>(config: ClientConfig, path: P) -> Result<Self> {
        config.require_credentials()?;
        let variants = load_variants(path)?;
        Self::with_variants(config, variants)
    }

    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Query over this searcher's variants and the given date range
    pub fn query(&self, from_date: Option<&str>, to_date: Option<&str>) -> AffiliationQuery {
        AffiliationQuery::new(self.variants.iter().cloned()).date_range(from_date, to_date)
    }

    /// Search PubMed for the configured institution within a date range
    ///
    /// Issues exactly one ESearch request; when the server reports more matches
    /// than it returned, a warning is logged and only the returned page is kept.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use idmap_client::{AffiliationSearcher, ClientConfig};
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let config = ClientConfig::new()
    ///         .with_email("researcher@university.edu")
    ///         .with_api_key("your_api_key_here");
    ///     let searcher = AffiliationSearcher::from_variants_file(config, "approved_variations.json")?;
    ///     let result = searcher.search(Some("2024/01/01"), Some("2024/12/31")).await?;
    ///     println!("Found {} papers", result.pmids.len());
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        from_date: Option<&str>,
        to_date: Option<&str>,
    ) -> Result<SearchResult> {
        let query = self.query(from_date, to_date);
        self.search_query(&query).await
    }

    /// Run a prebuilt query
    #[instrument(skip_all, fields(variants = query.variants().len()))]
    pub async fn search_query(&self, query: &AffiliationQuery) -> Result<SearchResult> {
        let term = query.build();
        debug!(term = %term, "Built affiliation query");

        let url = self.build_url(&term);
        let response = self.make_request(&url).await?;
        let body = response.text().await?;
        let parsed: ESearchResult = serde_json::from_str(&body)?;
        let data = parsed.esearchresult;

        // NCBI sometimes returns 200 OK with an ERROR field
        if let Some(error_msg) = data.error {
            return Err(IdMapError::ApiError {
                status: 200,
                message: format!("NCBI ESearch API error: {error_msg}"),
            });
        }

        // A body without both fields is malformed, not an empty result
        let (Some(count), Some(pmids)) = (data.count, data.idlist) else {
            return Err(IdMapError::ApiError {
                status: 200,
                message: "NCBI ESearch response is missing 'count' or 'idlist'".to_string(),
            });
        };

        let total_count = count.trim().parse().map_err(|_| IdMapError::ApiError {
            status: 200,
            message: format!("NCBI ESearch returned a non-numeric count: {count}"),
        })?;

        let result = SearchResult {
            pmids,
            total_count,
            query_translation: data.querytranslation,
        };

        if result.is_truncated() {
            warn!(
                total = result.total_count,
                returned = result.pmids.len(),
                "Search matched more papers than a single request returns"
            );
        }

        info!(returned = result.pmids.len(), total = result.total_count, "Search completed");
        Ok(result)
    }

    fn build_url(&self, term: &str) -> String {
        let mut url = format!(
            "{}/esearch.fcgi?db=pubmed&term={}&retmax={}&retmode=json",
            self.base_url,
            urlencoding::encode(term),
            self.config.max_results,
        );

        for (key, value) in self.config.build_api_params() {
            url.push_str(&format!("&{}={}", key, urlencoding::encode(&value)));
        }

        url
    }

    async fn make_request(&self, url: &str) -> Result<Response> {
        debug!("Making ESearch API request");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!("ESearch request failed with status: {}", response.status());
            return Err(IdMapError::from_status(response.status()));
        }

        Ok(response)
    }
}
