//! Autolab - lecture video to exercise set pipeline
//!
//! Turns a recorded lecture into a timestamped transcript and a structured set of
//! instructions/exercises by chaining three external services.
//!
//! # Overview
//!
//! A run goes through three stages, strictly in order:
//! 1. Convert the lecture video to a FLAC audio file with ffmpeg
//! 2. Transcribe the audio with Google Cloud Speech-to-Text
//! 3. Generate an instruction set from the transcript with an OpenAI chat model
//!
//! Every stage reads its input from and writes its output to a path declared in
//! the JSON configuration document.
//!
//! # Architecture
//!
//! - `config` - Pipeline configuration, prompt templates and credentials
//! - `audio` - Video to audio conversion
//! - `transcription` - Speech-to-text and transcript flattening
//! - `instructions` - Instruction set generation and parsing
//! - `orchestrator` - Stage sequencing and artifact persistence
//! - `cli` - Command line interface, preflight checks and console output
//!
//! # Example
//!
//! ```rust,no_run
//! use autolab::config::{load_api_key, PipelineConfig};
//! use autolab::orchestrator::Pipeline;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::load()?;
//!     let pipeline = Pipeline::new(config, load_api_key())?;
//!
//!     let report = pipeline.run().await?;
//!     println!("Transcript saved to {}", report.transcript_path.display());
//!
//!     Ok(())
//! }
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod instructions;
pub mod openai;
pub mod orchestrator;
pub mod transcription;

pub use error::{AutolabError, Result};
