//! Run command - the full lecture pipeline.

use super::{load_config, report_precheck};
use crate::cli::preflight::check_tool;
use crate::cli::{CommandOutcome, Output};
use crate::config::load_api_key;
use crate::orchestrator::{InstructionOutcome, Pipeline};
use anyhow::Result;
use tracing::debug;

/// Run the full pipeline.
pub async fn run_pipeline(config_path: Option<&str>) -> Result<CommandOutcome> {
    Output::banner(None);

    let config = load_config(config_path)?;

    if !report_precheck(&config).passed() {
        return Ok(CommandOutcome::Aborted);
    }

    if let Err(e) = check_tool("ffmpeg") {
        Output::error(&e.to_string());
        return Ok(CommandOutcome::Aborted);
    }

    debug!("Working directory: {}", config.base_dir.display());

    let pipeline = Pipeline::new(config, load_api_key())?;
    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            Output::error(&format!("Pipeline failed: {}", e));
            return Err(e.into());
        }
    };

    Output::rule();
    Output::kv("Audio", &report.audio_path.display().to_string());
    Output::kv("Transcript", &report.transcript_path.display().to_string());
    if let Some(plain) = &report.plain_transcript_path {
        Output::kv("Plain transcript", &plain.display().to_string());
    }

    match &report.instructions {
        InstructionOutcome::Saved { json_path, text_path } => {
            Output::success(&format!("Instructions saved to \"{}\"", json_path.display()));
            Output::kv("Text rendering", &text_path.display().to_string());
        }
        InstructionOutcome::NotGenerated { reason } => {
            Output::warning(&format!("No instructions were saved: {}", reason));
        }
    }
    Output::info("Autolab terminating");

    Ok(CommandOutcome::Completed)
}
