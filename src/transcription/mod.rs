//! Transcription module for Autolab.
//!
//! Sends audio to Google Cloud Speech-to-Text and flattens the recognition
//! response into timestamped segments and a plain transcript.

mod format;
mod google;
mod models;

pub use format::{format_seconds, format_timed_transcript};
pub use google::{GoogleSpeechClient, ACCESS_TOKEN_VAR};
pub use models::{
    concatenate_transcripts, parse_offset, transcript_list_and_times, RecognitionAlternative,
    RecognitionResult, RecognizeResponse, TranscriptSegment, WordInfo,
};

use crate::error::Result;
use async_trait::async_trait;

/// Trait for speech recognition services.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Send raw audio bytes to the recognizer and return its native response.
    async fn speech_to_text(&self, audio: Vec<u8>) -> Result<RecognizeResponse>;
}
