//! Instruct command - generate instructions from an existing transcript.

use crate::cli::preflight::check_input_exists;
use crate::cli::{CommandOutcome, Output};
use crate::config::{load_api_key, InstructionPrompts, PipelineConfig};
use crate::instructions::{InstructionGenerator, OpenAiInstructionGenerator};
use crate::orchestrator::{save_instructions, InstructionOutcome};
use anyhow::Result;
use std::io::{self, BufRead};
use std::path::PathBuf;

/// Arguments of the instruct command.
#[derive(Debug, Clone)]
pub struct InstructArgs {
    pub input: String,
    pub output: String,
    pub text_output: Option<String>,
    pub model: String,
    pub prompt_file: Option<String>,
    pub yes: bool,
}

/// Run the instruct command.
pub async fn run_instruct(args: InstructArgs) -> Result<CommandOutcome> {
    Output::banner(Some("Instruction generation"));

    let input = PipelineConfig::expand(&args.input);
    let json_path = PipelineConfig::expand(&args.output);
    let text_path = args
        .text_output
        .as_deref()
        .map(PipelineConfig::expand)
        .unwrap_or_else(|| json_path.with_extension("txt"));

    if let Err(e) = check_input_exists(&input) {
        Output::error(&format!("{}. Program cannot proceed. Goodbye.", e));
        return Ok(CommandOutcome::Aborted);
    }

    let stdin = io::stdin();
    let outputs = [json_path.clone(), text_path.clone()];
    if !clear_outputs(&outputs, args.yes, &mut stdin.lock())? {
        Output::info("File not deleted. Program cannot proceed. Goodbye.");
        return Ok(CommandOutcome::Aborted);
    }

    let prompt_file = args.prompt_file.as_deref().map(PipelineConfig::expand);
    let prompts = InstructionPrompts::load(prompt_file.as_deref())?;
    let generator = OpenAiInstructionGenerator::new(&args.model, load_api_key().as_ref())?
        .with_prompts(prompts);

    Output::info("Generating Instruction Set...");
    let spinner = Output::spinner(&format!("Waiting for {}...", args.model));
    let result = generator.generate_instructions(&input).await;
    spinner.finish_and_clear();

    if let Ok(generated) = &result {
        Output::success("Done!\n");
        Output::info("Results:");
        println!("{}", generated.text);
    }

    match save_instructions(result, &json_path, &text_path)? {
        InstructionOutcome::Saved { json_path, text_path } => {
            Output::success(&format!("Saved to \"{}\"", json_path.display()));
            Output::kv("Text rendering", &text_path.display().to_string());
        }
        InstructionOutcome::NotGenerated { .. } => {
            Output::error("Error: Cannot save JSON!");
        }
    }

    Ok(CommandOutcome::Completed)
}

/// Make sure none of `paths` exists, asking before deleting any.
///
/// Every existing file is confirmed before the first one is removed. Returns
/// `false`, with nothing deleted, when the user declines any overwrite.
fn clear_outputs(
    paths: &[PathBuf],
    assume_yes: bool,
    answers: &mut impl BufRead,
) -> io::Result<bool> {
    let existing: Vec<&PathBuf> = paths.iter().filter(|p| p.is_file()).collect();

    for path in &existing {
        Output::warning(&format!("File '{}' exists.", path.display()));

        if !assume_yes && !Output::confirm_from("Do you want to overwrite this file?", answers)? {
            return Ok(false);
        }
    }

    for path in existing {
        std::fs::remove_file(path)?;
        Output::info("File deleted.");
    }

    Ok(true)
}
