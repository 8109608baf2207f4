//! CLI command implementations.

mod check;
mod instruct;
mod run;

pub use check::run_check;
pub use instruct::{run_instruct, InstructArgs};
pub use run::run_pipeline;

use crate::cli::preflight::{directory_precheck, PrecheckReport};
use crate::cli::Output;
use crate::config::PipelineConfig;
use std::path::PathBuf;

/// Load the pipeline configuration, from `path` or the platform default.
fn load_config(path: Option<&str>) -> crate::error::Result<PipelineConfig> {
    let path = path.map(PathBuf::from);
    let shown = path
        .clone()
        .unwrap_or_else(PipelineConfig::default_config_path);

    Output::info(&format!("Reading {}...", shown.display()));
    let config = PipelineConfig::load_from(path.as_deref())?;
    Output::success("Success!\n");
    Ok(config)
}

/// Run the directory precheck and print what failed.
fn report_precheck(config: &PipelineConfig) -> PrecheckReport {
    let report = directory_precheck(config);

    if report.missing_inputs().next().is_some() {
        Output::error(
            "FAIL: One or more input files do not exist. Please check the input_dir variables in the configuration file.",
        );
    }
    if report.existing_outputs().next().is_some() {
        Output::error(
            "FAIL: One or more of the output files exist. Please check the output_dir variables in the configuration file.",
        );
    }
    for failure in &report.failures {
        Output::error(&format!("  {}", failure));
    }
    if report.passed() {
        Output::success("PASS!");
    }

    report
}
