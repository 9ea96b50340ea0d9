//! Investigation tests against a live reasoning engine.
//!
//! These tests verify end-to-end behavior with a real engine endpoint and are
//! excluded from regular CI runs because they require network access and a
//! credential in the configured environment variable.
//!
//! Run with: `cargo test -p triage --test investigation_llm -- --ignored`

use std::time::Duration;

use triage::core::prompt::PromptLimits;
use triage::investigation::{InvestigationConfig, InvestigationStop, run_investigation};
use triage::io::config::TriageConfig;
use triage::io::engine::HttpEngine;
use triage::io::executor::ShellExecutor;

#[test]
#[ignore = "requires a live engine endpoint and credential"]
fn live_engine_investigates_disk_space() {
    let cfg = TriageConfig::default();
    let api_key = cfg.engine.api_key().expect("credential env var");
    let limits = PromptLimits {
        max_steps: cfg.limits.max_steps,
        stdout_chars: cfg.limits.prompt_stdout_chars,
        stderr_chars: cfg.limits.prompt_stderr_chars,
    };
    let engine = HttpEngine::new(&cfg.engine, api_key, limits).expect("engine");
    let executor = ShellExecutor::new(
        Duration::from_secs(cfg.limits.command_timeout_secs),
        cfg.limits.capture_limit_bytes,
    );

    let outcome = run_investigation(
        &engine,
        &executor,
        &InvestigationConfig {
            max_steps: cfg.limits.max_steps,
            transcript_output_chars: cfg.limits.transcript_output_chars,
        },
        "Check disk space on this machine and report whether any filesystem is above 90% full.",
        |step| eprintln!("executed: {} -> {}", step.command, step.exit_code),
    );

    eprintln!("{}", outcome.transcript);
    assert!(outcome.steps.len() <= cfg.limits.max_steps);
    match outcome.stop {
        InvestigationStop::RootCause => {
            assert!(outcome.transcript.contains("**Root cause**"));
        }
        InvestigationStop::BudgetExhausted => {
            assert!(outcome.transcript.contains("Analysis limit reached"));
        }
        InvestigationStop::Indecisive => {
            assert!(outcome.transcript.contains("No verdict"));
        }
    }
}
