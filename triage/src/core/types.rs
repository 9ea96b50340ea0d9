//! Shared contract types for the investigation loop.
//!
//! These types define stable contracts between the loop, the executor and the
//! reasoning engine. They carry no I/O and must remain deterministic.

use serde::{Deserialize, Serialize};

/// Return code reported when the command never produced its own exit status:
/// gate rejection, spawn failure, timeout, or death by signal.
pub const LOCAL_FAILURE_CODE: i32 = -1;

/// Fixed message placed in `stderr` when the gate rejects a command.
pub const BLOCKED_MESSAGE: &str = "Blocked: high-risk command.";

/// Outcome of one command execution attempt.
///
/// Total by construction: every failure mode (blocked, spawn error, timeout)
/// is represented as a value, so callers never see an error branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Exit status of the command, or [`LOCAL_FAILURE_CODE`] when execution
    /// failed before the command could report one.
    pub return_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ExecutionResult {
    /// Result for a command the gate refused to run.
    pub fn blocked() -> Self {
        Self::local_failure(BLOCKED_MESSAGE)
    }

    /// Result for a failure local to this process (spawn error, timeout).
    pub fn local_failure(message: impl Into<String>) -> Self {
        Self {
            return_code: LOCAL_FAILURE_CODE,
            stdout: String::new(),
            stderr: message.into(),
        }
    }
}

/// One completed decide/execute/observe cycle.
///
/// Immutable once recorded. Owned by the loop's in-memory history and
/// discarded when the investigation ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// The command that was handed to the executor (blocked attempts included).
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Step {
    pub fn from_result(command: String, result: ExecutionResult) -> Self {
        Self {
            command,
            exit_code: result.return_code,
            stdout: result.stdout,
            stderr: result.stderr,
        }
    }
}
