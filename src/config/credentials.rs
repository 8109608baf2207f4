//! API credential loading.

use std::fmt;
use tracing::{debug, warn};

/// Environment variable holding the OpenAI API key.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// An API key held in memory only. Formatting never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key for building a client.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Load the OpenAI API key from `.env` and the process environment.
///
/// A missing or empty key is logged and `None` is returned; callers keep going
/// and the model call fails later.
pub fn load_api_key() -> Option<ApiKey> {
    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {}", e);
    }
    api_key_from(std::env::var(OPENAI_API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Option<ApiKey> {
    match value {
        Some(key) if !key.trim().is_empty() => Some(ApiKey::new(key.trim())),
        Some(_) => {
            warn!("{} is empty", OPENAI_API_KEY_VAR);
            None
        }
        None => {
            warn!("Error occurred while loading the API key: {} not set", OPENAI_API_KEY_VAR);
            None
        }
    }
}
