//! Autolab CLI entry point.

use anyhow::Result;
use autolab::cli::{commands, Cli, Commands};
use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("autolab={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    // Execute command
    let outcome = match cli.command {
        Commands::Run => commands::run_pipeline(cli.config.as_deref()).await?,

        Commands::Check => commands::run_check(cli.config.as_deref())?,

        Commands::Instruct {
            input,
            output,
            text_output,
            model,
            prompt_file,
            yes,
        } => {
            commands::run_instruct(commands::InstructArgs {
                input,
                output,
                text_output,
                model,
                prompt_file,
                yes,
            })
            .await?
        }
    };

    Ok(outcome.into())
}
