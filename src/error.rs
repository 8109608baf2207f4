//! Error types for Autolab.

use thiserror::Error;

/// Library-level error type for Autolab operations.
#[derive(Error, Debug)]
pub enum AutolabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Video conversion failed: {0}")]
    Conversion(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Speech API error: {0}")]
    SpeechApi(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Instruction parsing failed: {0}")]
    InstructionParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),
}

/// Result type alias for Autolab operations.
pub type Result<T> = std::result::Result<T, AutolabError>;
