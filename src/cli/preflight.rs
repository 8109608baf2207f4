//! Pre-flight checks before any stage runs.
//!
//! Validates that every stage's input file exists, that no output file would be
//! overwritten, and that required tools are installed.

use crate::config::PipelineConfig;
use crate::error::{AutolabError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    VideoConversion,
    Transcription,
    Instructions,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::VideoConversion => write!(f, "video conversion"),
            Stage::Transcription => write!(f, "transcription"),
            Stage::Instructions => write!(f, "instruction generation"),
        }
    }
}

/// A single failed file check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrecheckFailure {
    /// The stage's input file does not exist.
    MissingInput { stage: Stage, path: PathBuf },
    /// The stage's output file already exists.
    OutputExists { stage: Stage, path: PathBuf },
}

impl fmt::Display for PrecheckFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrecheckFailure::MissingInput { stage, path } => {
                write!(f, "{} input '{}' does not exist", stage, path.display())
            }
            PrecheckFailure::OutputExists { stage, path } => {
                write!(f, "{} output '{}' already exists", stage, path.display())
            }
        }
    }
}

/// Outcome of the directory precheck for the whole batch.
#[derive(Debug, Clone, Default)]
pub struct PrecheckReport {
    pub failures: Vec<PrecheckFailure>,
}

impl PrecheckReport {
    /// True when every check passed.
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn missing_inputs(&self) -> impl Iterator<Item = &PrecheckFailure> {
        self.failures
            .iter()
            .filter(|f| matches!(f, PrecheckFailure::MissingInput { .. }))
    }

    pub fn existing_outputs(&self) -> impl Iterator<Item = &PrecheckFailure> {
        self.failures
            .iter()
            .filter(|f| matches!(f, PrecheckFailure::OutputExists { .. }))
    }
}

/// Verify all files declared in the configuration document.
///
/// An input that is the output of an earlier stage is produced during the run,
/// so it does not have to exist yet.
pub fn directory_precheck(config: &PipelineConfig) -> PrecheckReport {
    let mut report = PrecheckReport::default();

    let stages = [
        (
            Stage::VideoConversion,
            config.video_input(),
            vec![config.audio_output()],
        ),
        (
            Stage::Transcription,
            config.audio_input(),
            std::iter::once(config.transcript_output())
                .chain(config.plain_transcript_output())
                .collect(),
        ),
        (
            Stage::Instructions,
            config.transcript_input(),
            vec![config.instructions_output(), config.instructions_text_output()],
        ),
    ];

    let mut produced: Vec<PathBuf> = Vec::new();

    for (stage, input, outputs) in stages {
        if !produced.contains(&input) && !input.is_file() {
            report
                .failures
                .push(PrecheckFailure::MissingInput { stage, path: input });
        }

        for output in outputs {
            if output.is_file() {
                report.failures.push(PrecheckFailure::OutputExists {
                    stage,
                    path: output.clone(),
                });
            }
            produced.push(output);
        }
    }

    report
}

/// Check a single input/output pair for the instruction-only driver.
pub fn check_input_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(AutolabError::Precondition(format!(
            "Input file '{}' does not exist",
            path.display()
        )))
    }
}

/// Check if an external tool is available.
pub fn check_tool(name: &str) -> Result<()> {
    // ffmpeg uses -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(AutolabError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AutolabError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(AutolabError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Config with independent (unchained) inputs for every stage.
    fn config_in(dir: &TempDir) -> PipelineConfig {
        let json = r#"{
            "video_conversion_variables": {
                "input_dir": "in/video.mp4", "output_dir": "out/audio.flac"
            },
            "transcription_variables": {
                "input_dir": "in/audio.flac", "output_dir": "out/transcript.txt",
                "project_id": "p", "recognizer_id": "_"
            },
            "instruction_variables": {
                "input_dir": "in/transcript.txt", "output_dir": "out/instructions.json",
                "model": "gpt-3.5-turbo"
            }
        }"#;
        PipelineConfig::from_json(json).unwrap().with_base_dir(dir.path())
    }

    fn touch(dir: &TempDir, rel: &str) {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn all_inputs(dir: &TempDir) {
        touch(dir, "in/video.mp4");
        touch(dir, "in/audio.flac");
        touch(dir, "in/transcript.txt");
    }

    #[test]
    fn test_passes_when_inputs_exist_and_outputs_absent() {
        let dir = TempDir::new().unwrap();
        all_inputs(&dir);

        let report = directory_precheck(&config_in(&dir));
        assert!(report.passed(), "unexpected failures: {:?}", report.failures);
    }

    #[test]
    fn test_fails_when_any_input_missing() {
        for missing in ["in/video.mp4", "in/audio.flac", "in/transcript.txt"] {
            let dir = TempDir::new().unwrap();
            all_inputs(&dir);
            fs::remove_file(dir.path().join(missing)).unwrap();

            let report = directory_precheck(&config_in(&dir));
            assert!(!report.passed());
            assert_eq!(report.missing_inputs().count(), 1, "missing {}", missing);
        }
    }

    #[test]
    fn test_fails_when_any_output_exists() {
        for existing in [
            "out/audio.flac",
            "out/transcript.txt",
            "out/instructions.json",
            "out/instructions.txt",
        ] {
            let dir = TempDir::new().unwrap();
            all_inputs(&dir);
            touch(&dir, existing);

            let report = directory_precheck(&config_in(&dir));
            assert!(!report.passed(), "existing {}", existing);
            assert_eq!(report.existing_outputs().count(), 1);
        }
    }

    #[test]
    fn test_chained_inputs_need_not_exist() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "lecture.mp4");
        let json = r#"{
            "video_conversion_variables": {
                "input_dir": "lecture.mp4", "output_dir": "lecture.flac"
            },
            "transcription_variables": {
                "input_dir": "lecture.flac", "output_dir": "transcript.txt",
                "project_id": "p", "recognizer_id": "_"
            },
            "instruction_variables": {
                "input_dir": "transcript.txt", "output_dir": "instructions.json",
                "model": "gpt-4"
            }
        }"#;
        let config = PipelineConfig::from_json(json).unwrap().with_base_dir(dir.path());

        assert!(directory_precheck(&config).passed());

        fs::remove_file(dir.path().join("lecture.mp4")).unwrap();
        let report = directory_precheck(&config);
        assert_eq!(
            report.failures,
            vec![PrecheckFailure::MissingInput {
                stage: Stage::VideoConversion,
                path: dir.path().join("lecture.mp4"),
            }]
        );
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        all_inputs(&dir);
        fs::remove_file(dir.path().join("in/video.mp4")).unwrap();
        fs::create_dir_all(dir.path().join("in/video.mp4")).unwrap();

        assert!(!directory_precheck(&config_in(&dir)).passed());
    }

    #[test]
    fn test_check_input_exists() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "t.txt");
        assert!(check_input_exists(&dir.path().join("t.txt")).is_ok());
        assert!(check_input_exists(&dir.path().join("nope.txt")).is_err());
    }

    #[test]
    fn test_unknown_tool_not_found() {
        assert!(matches!(
            check_tool("autolab-definitely-not-installed"),
            Err(AutolabError::ToolNotFound(_))
        ));
    }
}
