//! Pipeline orchestrator for Autolab.
//!
//! Runs video conversion, transcription and instruction generation in order,
//! persisting each stage's artifact as soon as the stage completes.

use crate::audio::{FfmpegTranscoder, Transcoder};
use crate::cli::Output;
use crate::config::{ApiKey, InstructionPrompts, PipelineConfig};
use crate::error::{AutolabError, Result};
use crate::instructions::{
    GeneratedInstructions, InstructionError, InstructionGenerator, OpenAiInstructionGenerator,
};
use crate::transcription::{
    concatenate_transcripts, format_timed_transcript, transcript_list_and_times,
    GoogleSpeechClient, SpeechRecognizer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Number of stages in a full run.
pub const STAGE_COUNT: usize = 3;

/// The three-stage lecture pipeline.
pub struct Pipeline {
    config: PipelineConfig,
    transcoder: Arc<dyn Transcoder>,
    recognizer: Arc<dyn SpeechRecognizer>,
    generator: Arc<dyn InstructionGenerator>,
}

/// What instruction generation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum InstructionOutcome {
    /// Both renderings were written.
    Saved { json_path: PathBuf, text_path: PathBuf },
    /// The completion could not be parsed; nothing was written.
    NotGenerated { reason: String },
}

/// Artifacts produced by a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub audio_path: PathBuf,
    pub transcript_path: PathBuf,
    pub plain_transcript_path: Option<PathBuf>,
    pub segment_count: usize,
    pub instructions: InstructionOutcome,
}

impl Pipeline {
    /// Create a pipeline backed by ffmpeg, Google Speech-to-Text and OpenAI.
    pub fn new(config: PipelineConfig, api_key: Option<ApiKey>) -> Result<Self> {
        let transcoder = Arc::new(FfmpegTranscoder::with_codec(
            &config.video_conversion_variables.codec,
        ));

        let recognizer = Arc::new(GoogleSpeechClient::from_settings(
            &config.transcription_variables,
        )?);

        let prompt_file = config
            .instruction_variables
            .prompt_file
            .as_deref()
            .map(|p| config.resolve(p));
        let prompts = InstructionPrompts::load(prompt_file.as_deref())?;

        let generator = Arc::new(OpenAiInstructionGenerator::from_settings(
            &config.instruction_variables,
            prompts,
            api_key.as_ref(),
        )?);

        Ok(Self::with_components(config, transcoder, recognizer, generator))
    }

    /// Create a pipeline with custom stage implementations.
    pub fn with_components(
        config: PipelineConfig,
        transcoder: Arc<dyn Transcoder>,
        recognizer: Arc<dyn SpeechRecognizer>,
        generator: Arc<dyn InstructionGenerator>,
    ) -> Self {
        Self {
            config,
            transcoder,
            recognizer,
            generator,
        }
    }

    /// Run all stages in order. A failing stage aborts the ones after it.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<PipelineReport> {
        // 1) Video -> audio
        let audio_path = self.convert_video().await?;
        Output::stage_done(1, STAGE_COUNT);

        // 2) Audio -> timestamped transcript
        let (transcript_path, plain_transcript_path, segment_count) = self.transcribe().await?;
        Output::stage_done(2, STAGE_COUNT);

        // 3) Transcript -> instruction set
        let instructions = self.generate_instructions().await?;
        if matches!(instructions, InstructionOutcome::Saved { .. }) {
            Output::stage_done(3, STAGE_COUNT);
        }

        Ok(PipelineReport {
            audio_path,
            transcript_path,
            plain_transcript_path,
            segment_count,
            instructions,
        })
    }

    async fn convert_video(&self) -> Result<PathBuf> {
        let input = self.config.video_input();
        let output = self.config.audio_output();

        info!("Converting {} to audio", input.display());
        Output::info("Generating audio file...");

        self.transcoder.convert(&input, &output).await?;

        Ok(output)
    }

    async fn transcribe(&self) -> Result<(PathBuf, Option<PathBuf>, usize)> {
        let audio_path = self.config.audio_input();
        let audio = read_audio(&audio_path).await?;

        Output::info("Generating speech-to-text transcription...");
        let spinner = Output::spinner("Waiting for the speech recognizer...");
        let response = self.recognizer.speech_to_text(audio).await;
        spinner.finish_and_clear();
        let response = response?;

        let segments = transcript_list_and_times(&response);
        info!("Transcription complete ({} segments)", segments.len());
        if segments.is_empty() {
            warn!("Recognizer returned no speech");
        }

        Output::info("Done! Saving...");
        let transcript_path = self.config.transcript_output();
        write_artifact(&transcript_path, &format_timed_transcript(&segments))?;

        let plain_path = self.config.plain_transcript_output();
        if let Some(path) = &plain_path {
            write_artifact(path, &concatenate_transcripts(&response))?;
        }

        Ok((transcript_path, plain_path, segments.len()))
    }

    async fn generate_instructions(&self) -> Result<InstructionOutcome> {
        let transcript_path = self.config.transcript_input();

        Output::info("Generating instructions...");
        let spinner = Output::spinner("Waiting for the language model...");
        let result = self.generator.generate_instructions(&transcript_path).await;
        spinner.finish_and_clear();

        let json_path = self.config.instructions_output();
        let text_path = self.config.instructions_text_output();
        save_instructions(result, &json_path, &text_path)
    }
}

/// Persist a generation result.
///
/// Parse failures are reported and leave no files behind; every other error is
/// returned to the caller.
pub fn save_instructions(
    result: std::result::Result<GeneratedInstructions, InstructionError>,
    json_path: &Path,
    text_path: &Path,
) -> Result<InstructionOutcome> {
    match result {
        Ok(generated) => {
            Output::info("Done! Saving...");
            let json = serde_json::to_string_pretty(&generated.instruction_set)?;
            write_artifact(json_path, &json)?;
            // Both files or neither
            if let Err(e) = write_artifact(text_path, &generated.text) {
                let _ = std::fs::remove_file(json_path);
                return Err(e);
            }
            Ok(InstructionOutcome::Saved {
                json_path: json_path.to_path_buf(),
                text_path: text_path.to_path_buf(),
            })
        }
        Err(InstructionError::Parse { message, completion }) => {
            warn!("Unparseable completion ({} chars): {}", completion.len(), message);
            Output::error("Error: Instruction Set has not been generated");
            Ok(InstructionOutcome::NotGenerated { reason: message })
        }
        Err(other) => Err(other.into()),
    }
}

/// Read the converted audio, which must exist and be non-empty.
async fn read_audio(path: &Path) -> Result<Vec<u8>> {
    let audio = tokio::fs::read(path).await.map_err(|e| {
        AutolabError::Transcription(format!("Cannot read audio '{}': {}", path.display(), e))
    })?;

    if audio.is_empty() {
        return Err(AutolabError::Transcription(format!(
            "Audio file '{}' is empty",
            path.display()
        )));
    }

    Ok(audio)
}

/// Write an artifact, creating parent directories as needed.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::{RecognitionAlternative, RecognitionResult, RecognizeResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    type CallLog = Arc<Mutex<Vec<String>>>;

    struct FakeTranscoder {
        log: CallLog,
        fail: bool,
    }

    #[async_trait]
    impl Transcoder for FakeTranscoder {
        async fn convert(&self, _input: &Path, output: &Path) -> Result<()> {
            self.log.lock().unwrap().push("convert".into());
            if self.fail {
                return Err(AutolabError::Conversion("boom".into()));
            }
            std::fs::create_dir_all(output.parent().unwrap())?;
            std::fs::write(output, vec![1u8; 64])?;
            Ok(())
        }
    }

    struct FakeRecognizer {
        log: CallLog,
        audio_path: PathBuf,
    }

    #[async_trait]
    impl SpeechRecognizer for FakeRecognizer {
        async fn speech_to_text(&self, audio: Vec<u8>) -> Result<RecognizeResponse> {
            // Conversion output must be on disk before recognition starts
            let on_disk = std::fs::metadata(&self.audio_path).map(|m| m.len()).unwrap_or(0);
            self.log
                .lock()
                .unwrap()
                .push(format!("recognize:{}:{}", audio.len(), on_disk));

            let result = |text: &str, end: &str| RecognitionResult {
                alternatives: vec![RecognitionAlternative {
                    transcript: text.to_string(),
                    confidence: 0.9,
                    words: Vec::new(),
                }],
                result_end_offset: Some(end.to_string()),
                language_code: None,
            };
            Ok(RecognizeResponse {
                results: vec![result("Open a terminal.", "2s"), result("Run ls.", "3.5s")],
                metadata: None,
            })
        }
    }

    struct FakeGenerator {
        log: CallLog,
        completion: &'static str,
    }

    #[async_trait]
    impl InstructionGenerator for FakeGenerator {
        async fn generate_instructions(
            &self,
            transcript_path: &Path,
        ) -> std::result::Result<GeneratedInstructions, InstructionError> {
            let transcript = std::fs::read_to_string(transcript_path)?;
            self.log
                .lock()
                .unwrap()
                .push(format!("generate:{}", transcript.lines().count()));
            let value = crate::instructions::parse_instruction_set(self.completion)?;
            Ok(GeneratedInstructions::from_value(value))
        }
    }

    fn chained_config(dir: &TempDir) -> PipelineConfig {
        let json = r#"{
            "video_conversion_variables": {
                "input_dir": "lecture.mp4", "output_dir": "out/lecture.flac"
            },
            "transcription_variables": {
                "input_dir": "out/lecture.flac", "output_dir": "out/transcript_time.txt",
                "project_id": "p", "recognizer_id": "_",
                "transcript_output_dir": "out/transcript.txt"
            },
            "instruction_variables": {
                "input_dir": "out/transcript_time.txt", "output_dir": "out/instructions.json",
                "model": "gpt-3.5-turbo"
            }
        }"#;
        std::fs::write(dir.path().join("lecture.mp4"), b"video").unwrap();
        PipelineConfig::from_json(json).unwrap().with_base_dir(dir.path())
    }

    fn pipeline(
        config: PipelineConfig,
        log: &CallLog,
        fail_conversion: bool,
        completion: &'static str,
    ) -> Pipeline {
        let audio_path = config.audio_output();
        Pipeline::with_components(
            config,
            Arc::new(FakeTranscoder {
                log: log.clone(),
                fail: fail_conversion,
            }),
            Arc::new(FakeRecognizer {
                log: log.clone(),
                audio_path,
            }),
            Arc::new(FakeGenerator {
                log: log.clone(),
                completion,
            }),
        )
    }

    #[tokio::test]
    async fn test_full_run_writes_all_artifacts_in_order() {
        let dir = TempDir::new().unwrap();
        let log: CallLog = Arc::default();
        let p = pipeline(
            chained_config(&dir),
            &log,
            false,
            r#"{"title": "Shell basics", "exercises": [{"title": "Ls", "steps": ["Run ls"]}]}"#,
        );

        let report = p.run().await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["convert", "recognize:64:64", "generate:2"]
        );
        assert_eq!(report.segment_count, 2);

        let timed = std::fs::read_to_string(dir.path().join("out/transcript_time.txt")).unwrap();
        assert_eq!(timed, "Open a terminal. [0.00-2.00]\nRun ls. [2.00-3.50]\n");

        let plain = std::fs::read_to_string(dir.path().join("out/transcript.txt")).unwrap();
        assert_eq!(plain, "Open a terminal. Run ls.");

        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("out/instructions.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["title"], "Shell basics");

        let text = std::fs::read_to_string(dir.path().join("out/instructions.txt")).unwrap();
        assert!(text.contains("Title: Shell basics"));

        assert!(matches!(report.instructions, InstructionOutcome::Saved { .. }));
    }

    #[tokio::test]
    async fn test_conversion_failure_aborts_later_stages() {
        let dir = TempDir::new().unwrap();
        let log: CallLog = Arc::default();
        let p = pipeline(chained_config(&dir), &log, true, "{}");

        let err = p.run().await.unwrap_err();

        assert!(matches!(err, AutolabError::Conversion(_)));
        assert_eq!(*log.lock().unwrap(), vec!["convert"]);
        assert!(!dir.path().join("out/transcript_time.txt").exists());
    }

    #[tokio::test]
    async fn test_unparseable_completion_writes_no_instructions() {
        let dir = TempDir::new().unwrap();
        let log: CallLog = Arc::default();
        let p = pipeline(chained_config(&dir), &log, false, "I could not produce JSON today.");

        let report = p.run().await.unwrap();

        assert!(matches!(report.instructions, InstructionOutcome::NotGenerated { .. }));
        assert!(dir.path().join("out/transcript_time.txt").exists());
        assert!(!dir.path().join("out/instructions.json").exists());
        assert!(!dir.path().join("out/instructions.txt").exists());
    }

    #[tokio::test]
    async fn test_empty_audio_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.flac");
        std::fs::write(&path, b"").unwrap();

        assert!(matches!(
            read_audio(&path).await,
            Err(AutolabError::Transcription(_))
        ));
    }

    #[test]
    fn test_service_error_is_propagated() {
        let dir = TempDir::new().unwrap();
        let result = save_instructions(
            Err(InstructionError::Service("401 Unauthorized".into())),
            &dir.path().join("i.json"),
            &dir.path().join("i.txt"),
        );

        assert!(matches!(result, Err(AutolabError::OpenAI(_))));
        assert!(!dir.path().join("i.json").exists());
    }

    #[test]
    fn test_failed_text_write_removes_json() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        let json_path = dir.path().join("i.json");

        let generated = GeneratedInstructions::from_value(serde_json::json!({"title": "Lab"}));
        let result = save_instructions(Ok(generated), &json_path, &blocker.join("i.txt"));

        assert!(matches!(result, Err(AutolabError::Io(_))));
        assert!(!json_path.exists());
    }
}
