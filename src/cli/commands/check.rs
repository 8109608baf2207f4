//! Check command - verify configured files and tools.

use super::{load_config, report_precheck};
use crate::cli::preflight::check_tool;
use crate::cli::{CommandOutcome, Output};
use crate::config::{load_api_key, OPENAI_API_KEY_VAR};
use anyhow::Result;

/// Run the check command.
pub fn run_check(config_path: Option<&str>) -> Result<CommandOutcome> {
    Output::banner(Some("Check"));

    let config = load_config(config_path)?;
    let mut ok = report_precheck(&config).passed();

    match check_tool("ffmpeg") {
        Ok(()) => Output::success("ffmpeg found"),
        Err(e) => {
            Output::error(&e.to_string());
            ok = false;
        }
    }

    // A missing key only warns; the run itself continues without one
    if load_api_key().is_none() {
        Output::warning(&format!(
            "{} is not set; instruction generation will fail",
            OPENAI_API_KEY_VAR
        ));
    }

    Ok(if ok {
        CommandOutcome::Completed
    } else {
        CommandOutcome::Aborted
    })
}
