//! Configuration module for Autolab.
//!
//! Handles loading the pipeline document, prompt templates and API credentials.

mod credentials;
mod prompts;
mod settings;

pub use credentials::{load_api_key, ApiKey, OPENAI_API_KEY_VAR};
pub use prompts::{render, InstructionPrompts};
pub use settings::{
    config_file_for_os, InstructionSettings, PipelineConfig, TranscriptionSettings,
    VideoConversionSettings, DEFAULT_CONFIG_FILE, WINDOWS_CONFIG_FILE,
};
