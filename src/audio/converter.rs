//! Video to audio conversion using ffmpeg.

use super::Transcoder;
use crate::error::{AutolabError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// ffmpeg-backed transcoder.
pub struct FfmpegTranscoder {
    codec: String,
}

impl FfmpegTranscoder {
    /// Create a transcoder producing FLAC audio.
    pub fn new() -> Self {
        Self::with_codec("flac")
    }

    /// Create a transcoder producing audio in the given ffmpeg codec.
    pub fn with_codec(codec: &str) -> Self {
        Self {
            codec: codec.to_string(),
        }
    }

    pub fn codec(&self) -> &str {
        &self.codec
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    #[instrument(skip(self), fields(input = %input.display(), output = %output.display()))]
    async fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        info!("Converting video to {} audio", self.codec);

        let result = Command::new("ffmpeg")
            .arg("-i").arg(input)
            .arg("-vn")
            .arg("-acodec").arg(&self.codec)
            .arg("-n")
            .arg("-loglevel").arg("error")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await;

        match result {
            Ok(out) if out.status.success() => {
                debug!("ffmpeg finished");
                Ok(())
            }
            Ok(out) => {
                let err = String::from_utf8_lossy(&out.stderr);
                Err(AutolabError::Conversion(format!(
                    "ffmpeg exited with {}: {}",
                    out.status,
                    err.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AutolabError::ToolNotFound("ffmpeg".into()))
            }
            Err(e) => Err(AutolabError::Conversion(format!("ffmpeg error: {e}"))),
        }
    }
}
