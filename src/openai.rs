//! OpenAI client configuration with sensible defaults.

use crate::config::ApiKey;
use crate::error::{AutolabError, Result};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Default timeout for OpenAI API requests (5 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Create an OpenAI client for the given key with the default timeout.
pub fn create_client(api_key: Option<&ApiKey>) -> Result<Client<OpenAIConfig>> {
    create_client_with_timeout(api_key, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}

/// Create an OpenAI client with a custom timeout.
///
/// Without a key the client is still built; requests then fail with an
/// authentication error from the API.
pub fn create_client_with_timeout(
    api_key: Option<&ApiKey>,
    timeout: Duration,
) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AutolabError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let config = OpenAIConfig::new().with_api_key(api_key.map(ApiKey::expose).unwrap_or_default());

    Ok(Client::with_config(config).with_http_client(http_client))
}
