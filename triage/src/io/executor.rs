//! Executor abstraction for command execution.
//!
//! The [`Executor`] trait decouples the investigation loop from the shell, so
//! tests use scripted executors that return predetermined results without
//! spawning processes. The real [`ShellExecutor`] is total: gate rejection,
//! spawn failure and timeout all come back as an [`ExecutionResult`] value,
//! never as an error.

use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::core::safety::is_safe;
use crate::core::types::{ExecutionResult, LOCAL_FAILURE_CODE};
use crate::io::process::run_shell_with_timeout;

/// Abstraction over command execution backends.
pub trait Executor {
    /// Run one batched shell command and report its outcome.
    fn execute(&self, command: &str) -> ExecutionResult;
}

/// Executor that runs commands through the host shell.
///
/// This is the system's single most consequential side effect: the command
/// runs as an arbitrary subprocess with the privileges of the host process,
/// restrained only by the deny-list gate and the wall-clock timeout.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    timeout: Duration,
    output_limit_bytes: usize,
}

impl ShellExecutor {
    pub fn new(timeout: Duration, output_limit_bytes: usize) -> Self {
        Self {
            timeout,
            output_limit_bytes,
        }
    }
}

impl Executor for ShellExecutor {
    #[instrument(skip_all, fields(timeout_secs = self.timeout.as_secs()))]
    fn execute(&self, command: &str) -> ExecutionResult {
        if !is_safe(command) {
            warn!("gate rejected command, nothing spawned");
            return ExecutionResult::blocked();
        }
        info!(command = %crate::core::prompt::clip_chars(command, 100), "executing");
        match run_shell_with_timeout(command, self.timeout, self.output_limit_bytes) {
            Ok(output) if output.timed_out => ExecutionResult {
                return_code: LOCAL_FAILURE_CODE,
                // Partial capture is still evidence the engine can use.
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: format!(
                    "Error: command timed out after {}s",
                    self.timeout.as_secs()
                ),
            },
            Ok(output) => ExecutionResult {
                return_code: output.status.code().unwrap_or(LOCAL_FAILURE_CODE),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(err) => {
                warn!(err = %err, "command execution failed locally");
                ExecutionResult::local_failure(format!("Error: {err:#}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::BLOCKED_MESSAGE;

    fn executor() -> ShellExecutor {
        ShellExecutor::new(Duration::from_secs(5), 10_000)
    }

    #[test]
    fn batched_command_reports_exit_status_and_streams() {
        let result = executor().execute("echo out; echo err >&2; exit 3");
        assert_eq!(result.return_code, 3);
        assert_eq!(result.stdout, "out\n");
        assert_eq!(result.stderr, "err\n");
    }

    #[test]
    fn blocked_command_never_spawns() {
        let temp = tempfile::tempdir().expect("tempdir");
        let witness = temp.path().join("ran");
        let command = format!("rm -rf / --no-preserve-root; touch {}", witness.display());

        let result = executor().execute(&command);

        assert_eq!(result.return_code, LOCAL_FAILURE_CODE);
        assert_eq!(result.stderr, BLOCKED_MESSAGE);
        assert!(!witness.exists(), "gate must reject before any spawn");
    }

    #[test]
    fn nonexistent_binary_is_a_result_not_an_error() {
        let result = executor().execute("definitely-not-a-binary-xyz");
        assert_ne!(result.return_code, 0);
        assert!(!result.stderr.is_empty());
    }

    #[test]
    fn timeout_yields_sentinel_with_partial_stdout() {
        let fast = ShellExecutor::new(Duration::from_secs(1), 10_000);
        let result = fast.execute("echo early; sleep 30");
        assert_eq!(result.return_code, LOCAL_FAILURE_CODE);
        assert_eq!(result.stdout, "early\n");
        assert!(result.stderr.contains("timed out after 1s"));
    }
}
