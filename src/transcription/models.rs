//! Data models for transcription.

use serde::{Deserialize, Serialize};

// ============================================================================
// Speech-to-Text v2 response types
// ============================================================================

/// Response of a synchronous `recognize` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognizeResponse {
    /// Sequential recognition results, one per portion of audio.
    #[serde(default)]
    pub results: Vec<RecognitionResult>,
    /// Billing and request metadata, kept as-is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Recognition result for one portion of the audio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionResult {
    /// Alternatives, most probable first.
    #[serde(default)]
    pub alternatives: Vec<RecognitionAlternative>,
    /// Offset of the end of this result relative to the start of the audio, e.g. `"4.250s"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_end_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f32,
    /// Word-level timing, present when word time offsets are enabled.
    #[serde(default)]
    pub words: Vec<WordInfo>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordInfo {
    #[serde(default)]
    pub word: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<String>,
}

impl RecognitionResult {
    /// The most probable alternative, if it carries any text.
    pub fn best(&self) -> Option<&RecognitionAlternative> {
        self.alternatives
            .first()
            .filter(|a| !a.transcript.trim().is_empty())
    }

    /// End offset of this result in seconds.
    pub fn end_seconds(&self) -> Option<f64> {
        self.result_end_offset.as_deref().and_then(parse_offset)
    }
}

/// Parse a protobuf JSON duration such as `"1.500s"` into seconds.
pub fn parse_offset(offset: &str) -> Option<f64> {
    offset.trim().strip_suffix('s')?.parse::<f64>().ok()
}

// ============================================================================
// Core Transcript Types
// ============================================================================

/// A single segment of a transcript with timestamp information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Transcribed text content.
    pub text: String,
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
}

impl TranscriptSegment {
    /// Create a new transcript segment.
    pub fn new(text: String, start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            text,
            start_seconds,
            end_seconds,
        }
    }
}

/// Join the top alternative of every result, in order, separated by single spaces.
pub fn concatenate_transcripts(response: &RecognizeResponse) -> String {
    response
        .results
        .iter()
        .filter_map(RecognitionResult::best)
        .map(|a| a.transcript.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Flatten a response into one segment per non-empty result.
///
/// A segment starts at its first word's offset when word timing is present,
/// otherwise where the previous result ended. It ends at the result's end offset,
/// falling back to its last word. Start times never go backwards.
pub fn transcript_list_and_times(response: &RecognizeResponse) -> Vec<TranscriptSegment> {
    let mut segments = Vec::with_capacity(response.results.len());
    let mut previous_end = 0.0_f64;
    let mut previous_start = 0.0_f64;

    for result in &response.results {
        let Some(best) = result.best() else {
            // Silent portions still advance the clock
            if let Some(end) = result.end_seconds() {
                previous_end = previous_end.max(end);
            }
            continue;
        };

        let first_word_start = best
            .words
            .first()
            .and_then(|w| w.start_offset.as_deref())
            .and_then(parse_offset);
        let last_word_end = best
            .words
            .last()
            .and_then(|w| w.end_offset.as_deref())
            .and_then(parse_offset);

        let start = first_word_start.unwrap_or(previous_end).max(previous_start);
        let end = result
            .end_seconds()
            .or(last_word_end)
            .unwrap_or(start)
            .max(start);

        segments.push(TranscriptSegment::new(best.transcript.trim().to_string(), start, end));

        previous_start = start;
        previous_end = end;
    }

    segments
}
