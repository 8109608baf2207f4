//! Audio extraction for Autolab.
//!
//! Converts lecture videos into audio files the speech recognizer accepts.

mod converter;

pub use converter::FfmpegTranscoder;

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for media transcoders.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Convert the video at `input` into an audio file at `output`, blocking until done.
    async fn convert(&self, input: &Path, output: &Path) -> Result<()>;
}
