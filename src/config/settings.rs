//! Pipeline configuration document.

use crate::error::{AutolabError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration file used on Windows hosts.
pub const WINDOWS_CONFIG_FILE: &str = "inputs_win.json";

/// Configuration file used on every other host.
pub const DEFAULT_CONFIG_FILE: &str = "inputs_mac.json";

/// Root configuration structure.
///
/// Field names follow the JSON document (`inputs_*.json`) verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub video_conversion_variables: VideoConversionSettings,
    pub transcription_variables: TranscriptionSettings,
    pub instruction_variables: InstructionSettings,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

/// Video to audio conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConversionSettings {
    /// Lecture video to convert.
    pub input_dir: String,
    /// Audio file to produce.
    pub output_dir: String,
    /// Audio codec requested from ffmpeg.
    #[serde(default = "default_codec")]
    pub codec: String,
}

/// Speech-to-text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Audio file to transcribe.
    pub input_dir: String,
    /// Timestamped transcript text file to produce.
    pub output_dir: String,
    /// Google Cloud project id.
    pub project_id: String,
    /// Speech-to-Text v2 recognizer id (`_` for the default recognizer).
    pub recognizer_id: String,
    /// Recognizer location.
    #[serde(default = "default_location")]
    pub location: String,
    /// API base URL.
    #[serde(default = "default_speech_endpoint")]
    pub endpoint: String,
    /// Languages the recognizer should expect.
    #[serde(default = "default_language_codes")]
    pub language_codes: Vec<String>,
    /// Recognition model.
    #[serde(default = "default_speech_model")]
    pub model: String,
    /// Optional file for the concatenated (untimed) transcript.
    #[serde(default)]
    pub transcript_output_dir: Option<String>,
}

/// Instruction generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructionSettings {
    /// Transcript file the instructions are generated from.
    pub input_dir: String,
    /// Instruction set JSON file to produce.
    pub output_dir: String,
    /// Chat model used for generation.
    pub model: String,
    /// Plain-text rendering of the instruction set. Defaults to `output_dir`
    /// with a `.txt` extension.
    #[serde(default)]
    pub text_output_dir: Option<String>,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// TOML file overriding the default prompt template.
    #[serde(default)]
    pub prompt_file: Option<String>,
    /// Timeout for a single completion request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_codec() -> String {
    "flac".to_string()
}

fn default_location() -> String {
    "global".to_string()
}

fn default_speech_endpoint() -> String {
    "https://speech.googleapis.com".to_string()
}

fn default_language_codes() -> Vec<String> {
    vec!["en-US".to_string()]
}

fn default_speech_model() -> String {
    "long".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    300
}

impl PipelineConfig {
    /// Load the configuration file selected for the host platform.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific path, or the platform default if None.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };

        if !config_path.is_file() {
            return Err(AutolabError::Config(format!(
                "Configuration file '{}' not found",
                config_path.display()
            )));
        }

        let content = std::fs::read_to_string(&config_path)?;
        let mut config = Self::from_json(&content)?;
        config.base_dir = std::env::current_dir()?;
        Ok(config)
    }

    /// Parse a configuration document. Relative paths resolve against the current directory.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Set the directory relative paths are resolved against.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    /// Get the configuration file name for the host platform.
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(config_file_for_os(std::env::consts::OS))
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Expand `~` and resolve relative paths against the base directory.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let expanded = Self::expand(path);
        if expanded.is_absolute() {
            expanded
        } else {
            self.base_dir.join(expanded)
        }
    }

    pub fn video_input(&self) -> PathBuf {
        self.resolve(&self.video_conversion_variables.input_dir)
    }

    pub fn audio_output(&self) -> PathBuf {
        self.resolve(&self.video_conversion_variables.output_dir)
    }

    pub fn audio_input(&self) -> PathBuf {
        self.resolve(&self.transcription_variables.input_dir)
    }

    pub fn transcript_output(&self) -> PathBuf {
        self.resolve(&self.transcription_variables.output_dir)
    }

    pub fn plain_transcript_output(&self) -> Option<PathBuf> {
        self.transcription_variables
            .transcript_output_dir
            .as_deref()
            .map(|p| self.resolve(p))
    }

    pub fn transcript_input(&self) -> PathBuf {
        self.resolve(&self.instruction_variables.input_dir)
    }

    pub fn instructions_output(&self) -> PathBuf {
        self.resolve(&self.instruction_variables.output_dir)
    }

    /// Path of the plain-text instruction rendering.
    pub fn instructions_text_output(&self) -> PathBuf {
        match &self.instruction_variables.text_output_dir {
            Some(p) => self.resolve(p),
            None => self.instructions_output().with_extension("txt"),
        }
    }
}

/// Pick the configuration file name for an operating system name.
pub fn config_file_for_os(os: &str) -> &'static str {
    if os.eq_ignore_ascii_case("windows") {
        WINDOWS_CONFIG_FILE
    } else {
        DEFAULT_CONFIG_FILE
    }
}
