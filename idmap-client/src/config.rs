//! Client configuration shared by the searcher and the ID converter
//!
//! A [`ClientConfig`] is built once at process start (usually from CLI flags and
//! environment variables) and handed to each client constructor.

use std::time::Duration;

use crate::error::{IdMapError, Result};

/// Default NCBI E-utilities base URL
pub const DEFAULT_EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";

/// Default PMC ID Converter endpoint
pub const DEFAULT_IDCONV_BASE_URL: &str = "https://pmc.ncbi.nlm.nih.gov/tools/idconv/api/v1/articles";

/// Contact email used by the converter when none is configured
pub const DEFAULT_EMAIL: &str = "user@example.com";

/// Default tool name reported to NCBI
pub const DEFAULT_TOOL: &str = "idmap";

/// Maximum number of IDs the converter accepts per request
pub const MAX_BATCH_SIZE: usize = 200;

/// Delay between converter batches (about 3 requests per second)
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(350);

/// Per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Requested page size for ESearch
pub const DEFAULT_MAX_RESULTS: usize = 100_000;

/// Credentials required by the affiliation searcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub api_key: String,
}

/// Configuration for NCBI clients
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// NCBI API key
    pub api_key: Option<String>,
    /// Contact email sent with every request
    pub email: Option<String>,
    /// Tool name sent with every request
    pub tool: Option<String>,
    /// Custom E-utilities base URL
    pub eutils_base_url: Option<String>,
    /// Custom ID Converter base URL
    pub idconv_base_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Number of IDs per converter request
    pub batch_size: usize,
    /// Pause between converter requests
    pub batch_delay: Duration,
    /// `retmax` sent to ESearch
    pub max_results: usize,
}

impl ClientConfig {
    /// Create a configuration with NCBI defaults and no credentials
    ///
    /// # Example
    ///
    /// ```
    /// use idmap_client::ClientConfig;
    ///
    /// let config = ClientConfig::new()
    ///     .with_email("researcher@university.edu")
    ///     .with_api_key("your_api_key_here");
    /// assert_eq!(config.batch_size, 200);
    /// ```
    pub fn new() -> Self {
        Self {
            api_key: None,
            email: None,
            tool: None,
            eutils_base_url: None,
            idconv_base_url: None,
            timeout: DEFAULT_TIMEOUT,
            batch_size: MAX_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_email<S: Into<String>>(mut self, email: S) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_tool<S: Into<String>>(mut self, tool: S) -> Self {
        self.tool = Some(tool.into());
        self
    }

    /// Point ESearch requests at a different host (used by tests)
    pub fn with_eutils_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.eutils_base_url = Some(base_url.into());
        self
    }

    /// Point ID Converter requests at a different host (used by tests)
    pub fn with_idconv_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.idconv_base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the converter batch size, clamped to `1..=MAX_BATCH_SIZE`
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn effective_eutils_base_url(&self) -> &str {
        self.eutils_base_url
            .as_deref()
            .unwrap_or(DEFAULT_EUTILS_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_idconv_base_url(&self) -> &str {
        self.idconv_base_url
            .as_deref()
            .unwrap_or(DEFAULT_IDCONV_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        format!("idmap-client/{}", env!("CARGO_PKG_VERSION"))
    }

    pub fn effective_tool(&self) -> &str {
        self.tool.as_deref().unwrap_or(DEFAULT_TOOL)
    }

    /// Contact email, falling back to the placeholder the converter accepts
    pub fn effective_email(&self) -> &str {
        self.email
            .as_deref()
            .filter(|email| !email.trim().is_empty())
            .unwrap_or(DEFAULT_EMAIL)
    }

    /// Credentials for ESearch; both email and API key must be set and non-empty
    pub fn require_credentials(&self) -> Result<Credentials> {
        match (non_blank(&self.email), non_blank(&self.api_key)) {
            (Some(email), Some(api_key)) => Ok(Credentials {
                email: email.to_string(),
                api_key: api_key.to_string(),
            }),
            (None, Some(_)) => Err(IdMapError::MissingCredentials {
                missing: "NCBI_EMAIL".to_string(),
            }),
            (Some(_), None) => Err(IdMapError::MissingCredentials {
                missing: "NCBI_API_KEY".to_string(),
            }),
            (None, None) => Err(IdMapError::MissingCredentials {
                missing: "NCBI_EMAIL, NCBI_API_KEY".to_string(),
            }),
        }
    }

    /// Query parameters identifying the caller to NCBI (api_key, email, tool)
    ///
    /// Values are trimmed; blank ones are left out.
    pub fn build_api_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(api_key) = non_blank(&self.api_key) {
            params.push(("api_key".to_string(), api_key.to_string()));
        }

        if let Some(email) = non_blank(&self.email) {
            params.push(("email".to_string(), email.to_string()));
        }

        params.push(("tool".to_string(), self.effective_tool().to_string()));

        params
    }

    /// Build the shared HTTP client for this configuration
    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .user_agent(self.effective_user_agent())
            .timeout(self.timeout)
            .build()?;
        Ok(client)
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
