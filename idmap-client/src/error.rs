use std::path::PathBuf;
use std::result;

use thiserror::Error;

/// Error types for search and conversion operations
#[derive(Error, Debug)]
pub enum IdMapError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// Required NCBI credentials are not configured
    #[error("Missing NCBI credentials: {missing} (set NCBI_EMAIL and NCBI_API_KEY)")]
    MissingCredentials { missing: String },

    /// The approved affiliation variant list could not be loaded
    #[error("Affiliation variants unavailable at {}: {reason}", path.display())]
    VariantsUnavailable { path: PathBuf, reason: String },

    /// The identifier input file could not be read
    #[error("Input file {} not found or unreadable: {reason}", path.display())]
    InputUnavailable { path: PathBuf, reason: String },

    /// IO error while writing outputs
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = result::Result<T, IdMapError>;

impl IdMapError {
    /// Whether this error comes from missing or broken local configuration.
    ///
    /// Configuration errors are fatal and are never worth retrying; everything
    /// else is a transport or parse failure tied to one remote call.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            IdMapError::MissingCredentials { .. }
                | IdMapError::VariantsUnavailable { .. }
                | IdMapError::InputUnavailable { .. }
        )
    }

    /// Build an `ApiError` from a non-success HTTP status
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        IdMapError::ApiError {
            status: status.as_u16(),
            message: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        }
    }
}
