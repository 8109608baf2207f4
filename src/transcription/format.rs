//! Transcript text formatting.

use super::TranscriptSegment;

/// Format seconds with two decimals, the resolution the recognizer reports.
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.2}", seconds)
}

/// Render segments as `"{text} [{start}-{end}]"` lines, one per segment.
pub fn format_timed_transcript(segments: &[TranscriptSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push_str(&format!(
            "{} [{}-{}]\n",
            segment.text,
            format_seconds(segment.start_seconds),
            format_seconds(segment.end_seconds)
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timed_transcript() {
        let segments = vec![
            TranscriptSegment::new("Hello world".to_string(), 0.0, 1.5),
            TranscriptSegment::new("Open the terminal".to_string(), 1.5, 4.25),
        ];

        assert_eq!(
            format_timed_transcript(&segments),
            "Hello world [0.00-1.50]\nOpen the terminal [1.50-4.25]\n"
        );
    }

    #[test]
    fn test_empty_transcript() {
        assert_eq!(format_timed_transcript(&[]), "");
    }
}
