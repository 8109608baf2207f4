//! CLI module for Autolab.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

/// Autolab - lecture video to exercise set pipeline
///
/// Converts a recorded lecture into a timestamped transcript and a structured
/// set of lab instructions.
#[derive(Parser, Debug)]
#[command(name = "autolab")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the pipeline configuration file
    /// (default: inputs_win.json on Windows, inputs_mac.json elsewhere)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline: video -> audio -> transcript -> instructions
    Run,

    /// Verify the configured files and required tools without running anything
    Check,

    /// Generate an instruction set from an existing transcript
    Instruct {
        /// Transcript file to read
        #[arg(short, long)]
        input: String,

        /// Instruction set JSON file to write
        #[arg(short, long)]
        output: String,

        /// Plain-text rendering to write (default: output with a .txt extension)
        #[arg(long)]
        text_output: Option<String>,

        /// Chat model to use
        #[arg(short, long, default_value = "gpt-3.5-turbo")]
        model: String,

        /// TOML file overriding the prompt template
        #[arg(long)]
        prompt_file: Option<String>,

        /// Overwrite existing output files without asking
        #[arg(short, long)]
        yes: bool,
    },
}

/// How a command finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Ran to completion.
    Completed,
    /// Stopped before doing any work (failed precheck, declined overwrite).
    Aborted,
}

impl From<CommandOutcome> for ExitCode {
    fn from(outcome: CommandOutcome) -> Self {
        match outcome {
            CommandOutcome::Completed => ExitCode::SUCCESS,
            CommandOutcome::Aborted => ExitCode::from(2),
        }
    }
}
