//! Google Cloud Speech-to-Text v2 implementation.

use super::{RecognizeResponse, SpeechRecognizer};
use crate::config::TranscriptionSettings;
use crate::error::{AutolabError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Environment variable holding a ready-made OAuth access token.
pub const ACCESS_TOKEN_VAR: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

/// Default timeout for a recognize request (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Speech-to-Text client bound to one recognizer.
pub struct GoogleSpeechClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    location: String,
    recognizer_id: String,
    language_codes: Vec<String>,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    content: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    auto_decoding_config: serde_json::Value,
    language_codes: &'a [String],
    model: &'a str,
    features: RecognitionFeatures,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionFeatures {
    enable_word_time_offsets: bool,
    enable_automatic_punctuation: bool,
}

impl GoogleSpeechClient {
    /// Create a client for the default recognizer endpoint.
    pub fn new(project_id: &str, recognizer_id: &str) -> Result<Self> {
        Self::build(
            "https://speech.googleapis.com",
            project_id,
            "global",
            recognizer_id,
            vec!["en-US".to_string()],
            "long",
        )
    }

    /// Create a client from the transcription section of the pipeline config.
    pub fn from_settings(settings: &TranscriptionSettings) -> Result<Self> {
        Self::build(
            &settings.endpoint,
            &settings.project_id,
            &settings.location,
            &settings.recognizer_id,
            settings.language_codes.clone(),
            &settings.model,
        )
    }

    fn build(
        endpoint: &str,
        project_id: &str,
        location: &str,
        recognizer_id: &str,
        language_codes: Vec<String>,
        model: &str,
    ) -> Result<Self> {
        if project_id.trim().is_empty() || recognizer_id.trim().is_empty() {
            return Err(AutolabError::Config(
                "project_id and recognizer_id must not be empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            location: location.to_string(),
            recognizer_id: recognizer_id.to_string(),
            language_codes,
            model: model.to_string(),
        })
    }

    /// Full resource name of the recognizer.
    pub fn recognizer_name(&self) -> String {
        format!(
            "projects/{}/locations/{}/recognizers/{}",
            self.project_id, self.location, self.recognizer_id
        )
    }

    fn recognize_url(&self) -> String {
        format!("{}/v2/{}:recognize", self.endpoint, self.recognizer_name())
    }

    fn build_request(&self, audio: &[u8]) -> RecognizeRequest<'_> {
        RecognizeRequest {
            config: RecognitionConfig {
                auto_decoding_config: serde_json::json!({}),
                language_codes: &self.language_codes,
                model: &self.model,
                features: RecognitionFeatures {
                    enable_word_time_offsets: true,
                    enable_automatic_punctuation: true,
                },
            },
            content: BASE64.encode(audio),
        }
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechClient {
    #[instrument(skip(self, audio), fields(recognizer = %self.recognizer_id, bytes = audio.len()))]
    async fn speech_to_text(&self, audio: Vec<u8>) -> Result<RecognizeResponse> {
        let token = access_token().await?;
        let request = self.build_request(&audio);

        info!("Sending {} bytes to {}", audio.len(), self.recognizer_name());

        let response = self
            .http
            .post(self.recognize_url())
            .bearer_auth(token)
            .header("x-goog-user-project", &self.project_id)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AutolabError::SpeechApi(format!("{}: {}", status, body)));
        }

        let parsed: RecognizeResponse = response.json().await?;
        debug!("Received {} recognition results", parsed.results.len());
        Ok(parsed)
    }
}

/// Get an OAuth access token from the environment or from gcloud.
async fn access_token() -> Result<String> {
    if let Ok(token) = std::env::var(ACCESS_TOKEN_VAR) {
        if !token.trim().is_empty() {
            return Ok(token.trim().to_string());
        }
    }

    debug!("{} not set, asking gcloud for a token", ACCESS_TOKEN_VAR);

    let result = Command::new("gcloud")
        .args(["auth", "application-default", "print-access-token"])
        .output()
        .await;

    match result {
        Ok(out) if out.status.success() => {
            let token = String::from_utf8_lossy(&out.stdout).trim().to_string();
            if token.is_empty() {
                Err(AutolabError::ToolFailed("gcloud returned an empty access token".into()))
            } else {
                Ok(token)
            }
        }
        Ok(out) => Err(AutolabError::ToolFailed(format!(
            "gcloud auth failed (run 'gcloud auth application-default login'): {}",
            String::from_utf8_lossy(&out.stderr).trim()
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AutolabError::ToolNotFound("gcloud".into()))
        }
        Err(e) => Err(AutolabError::ToolFailed(format!("gcloud error: {e}"))),
    }
}
