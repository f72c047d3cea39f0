pub mod convert;
pub mod search;

use anyhow::Result;
use idmap_client::ClientConfig;
use indicatif::ProgressStyle;

/// Client configuration from the global CLI flags
pub fn build_config(api_key: Option<&str>, email: Option<&str>, tool: &str) -> ClientConfig {
    let mut config = ClientConfig::new().with_tool(tool);

    if let Some(key) = api_key {
        config = config.with_api_key(key);
    }

    if let Some(email) = email {
        config = config.with_email(email);
    }

    config
}

/// Spinner shown while a request or batch run is in flight
pub fn spinner_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")?)
}
