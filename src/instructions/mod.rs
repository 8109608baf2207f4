//! Instruction set generation for Autolab.
//!
//! Turns a lecture transcript into a structured set of lab exercises using a
//! chat-completion model.

mod generator;
mod parse;

pub use generator::OpenAiInstructionGenerator;
pub use parse::{parse_instruction_set, render_text};

use crate::error::AutolabError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// A parsed instruction set together with its plain-text rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedInstructions {
    /// Structured instruction set (JSON object or array).
    pub instruction_set: Value,
    /// Human-readable rendering of `instruction_set`.
    pub text: String,
}

impl GeneratedInstructions {
    /// Build both renderings from a parsed document.
    pub fn from_value(instruction_set: Value) -> Self {
        let text = render_text(&instruction_set);
        Self {
            instruction_set,
            text,
        }
    }
}

/// Why instruction generation produced no instruction set.
#[derive(Error, Debug)]
pub enum InstructionError {
    #[error("Failed to read transcript: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model call failed: {0}")]
    Service(String),

    #[error("Completion is not a valid instruction set: {message}")]
    Parse { message: String, completion: String },
}

impl From<InstructionError> for AutolabError {
    fn from(err: InstructionError) -> Self {
        match err {
            InstructionError::Io(e) => AutolabError::Io(e),
            InstructionError::Service(msg) => AutolabError::OpenAI(msg),
            InstructionError::Parse { message, .. } => AutolabError::InstructionParse(message),
        }
    }
}

/// Trait for instruction set generators.
#[async_trait]
pub trait InstructionGenerator: Send + Sync {
    /// Read the transcript at `transcript_path` and generate an instruction set from it.
    async fn generate_instructions(
        &self,
        transcript_path: &Path,
    ) -> std::result::Result<GeneratedInstructions, InstructionError>;
}
