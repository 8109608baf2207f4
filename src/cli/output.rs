//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, Write};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print the program banner.
    pub fn banner(subtitle: Option<&str>) {
        let title = style(format!("Autolab v{}", env!("CARGO_PKG_VERSION"))).bold();
        match subtitle {
            Some(s) => println!("{} - {}", title, s),
            None => println!("{}", title),
        }
        Self::rule();
    }

    /// Print a horizontal rule.
    pub fn rule() {
        println!("{}\n", style("_".repeat(20)).dim());
    }

    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a stage completion line, e.g. `Success (2/3)`.
    pub fn stage_done(stage: usize, total: usize) {
        println!("{} Success ({}/{})\n", style(">>").green().bold(), stage, total);
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let template = ProgressStyle::default_spinner().template("{spinner:.green} {msg}");
        if let Ok(spinner_style) = template {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
    pub fn confirm(message: &str) -> io::Result<bool> {
        let stdin = io::stdin();
        Self::confirm_from(message, &mut stdin.lock())
    }

    /// Ask a yes/no question, reading the answer from `input`.
    pub fn confirm_from(message: &str, input: &mut impl BufRead) -> io::Result<bool> {
        print!("{} {} ", style("?").cyan(), message);
        print!("{} ", style("[y/N]").dim());
        io::stdout().flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;

        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer == "y" || answer == "yes"
}
