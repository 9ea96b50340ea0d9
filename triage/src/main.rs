//! Bounded-step diagnostic agent CLI.
//!
//! `triage investigate` runs one investigation and prints the transcript to
//! stdout; stable exit codes distinguish a found root cause from partial
//! findings and indecision. `triage config` prints the effective
//! configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use triage::core::prompt::PromptLimits;
use triage::exit_codes;
use triage::investigation::{InvestigationConfig, InvestigationStop, run_investigation};
use triage::io::config::load_config;
use triage::io::engine::HttpEngine;
use triage::io::executor::ShellExecutor;
use triage::logging;

#[derive(Parser)]
#[command(
    name = "triage",
    version,
    about = "Bounded-step autonomous diagnostic agent"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one investigation and print the transcript.
    Investigate {
        /// Natural-language problem statement.
        instruction: String,
        /// Path to the configuration file.
        #[arg(long, default_value = "triage.toml")]
        config: PathBuf,
        /// Override the configured step budget.
        #[arg(long)]
        max_steps: Option<usize>,
    },
    /// Print the effective configuration.
    Config {
        /// Path to the configuration file.
        #[arg(long, default_value = "triage.toml")]
        config: PathBuf,
    },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Investigate {
            instruction,
            config,
            max_steps,
        } => cmd_investigate(&instruction, &config, max_steps),
        Command::Config { config } => cmd_config(&config),
    }
}

fn cmd_investigate(
    instruction: &str,
    config_path: &Path,
    max_steps: Option<usize>,
) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let max_steps = max_steps.unwrap_or(cfg.limits.max_steps);
    let api_key = cfg.engine.api_key()?;

    let limits = PromptLimits {
        max_steps,
        stdout_chars: cfg.limits.prompt_stdout_chars,
        stderr_chars: cfg.limits.prompt_stderr_chars,
    };
    let engine = HttpEngine::new(&cfg.engine, api_key, limits)?;
    let executor = ShellExecutor::new(
        Duration::from_secs(cfg.limits.command_timeout_secs),
        cfg.limits.capture_limit_bytes,
    );
    let loop_config = InvestigationConfig {
        max_steps,
        transcript_output_chars: cfg.limits.transcript_output_chars,
    };

    let outcome = run_investigation(&engine, &executor, &loop_config, instruction, |step| {
        tracing::info!(command = %step.command, exit_code = step.exit_code, "step recorded");
    });

    println!("{}", outcome.transcript);
    Ok(match outcome.stop {
        InvestigationStop::RootCause => exit_codes::OK,
        InvestigationStop::BudgetExhausted => exit_codes::PARTIAL,
        InvestigationStop::Indecisive => exit_codes::INDECISIVE,
    })
}

/// Print the effective configuration as TOML. The credential itself never
/// appears: the config only names the environment variable holding it.
fn cmd_config(config_path: &Path) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let rendered = toml::to_string_pretty(&cfg).context("serialize config toml")?;
    print!("{rendered}");
    let credential = if std::env::var(&cfg.engine.api_key_env).is_ok() {
        "set"
    } else {
        "unset"
    };
    println!("\n# credential: ${} is {}", cfg.engine.api_key_env, credential);
    Ok(exit_codes::OK)
}
