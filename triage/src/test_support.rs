//! Test-only doubles for the reasoning engine and the command executor.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::core::decision::{Decision, decode_decision};
use crate::core::types::{ExecutionResult, Step};
use crate::io::engine::ReasoningEngine;
use crate::io::executor::Executor;

/// A non-final decision proposing `command`.
pub fn command_decision(thought: &str, command: &str) -> Decision {
    Decision {
        thought: thought.to_string(),
        command: Some(command.to_string()),
        is_final: false,
        final_report: String::new(),
    }
}

/// A final decision carrying `report`.
pub fn final_decision(report: &str) -> Decision {
    Decision {
        thought: "root cause identified".to_string(),
        command: None,
        is_final: true,
        final_report: report.to_string(),
    }
}

/// Engine that returns scripted decisions in order.
///
/// Running past the script yields a terminal fault, mirroring how a real
/// engine failure would end the loop.
pub struct ScriptedEngine {
    decisions: RefCell<VecDeque<Decision>>,
}

impl ScriptedEngine {
    pub fn new(decisions: Vec<Decision>) -> Self {
        Self {
            decisions: RefCell::new(decisions.into()),
        }
    }
}

impl ReasoningEngine for ScriptedEngine {
    fn think(&self, _instruction: &str, _history: &[Step]) -> Decision {
        self.decisions
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Decision::fault("Engine fault: script exhausted"))
    }
}

/// Engine that feeds scripted raw reply text through the real decoder,
/// exercising the same salvage and fault paths as `HttpEngine`.
pub struct RawReplyEngine {
    replies: RefCell<VecDeque<String>>,
}

impl RawReplyEngine {
    pub fn new(replies: Vec<&str>) -> Self {
        Self {
            replies: RefCell::new(replies.into_iter().map(str::to_string).collect()),
        }
    }
}

impl ReasoningEngine for RawReplyEngine {
    fn think(&self, _instruction: &str, _history: &[Step]) -> Decision {
        match self.replies.borrow_mut().pop_front() {
            Some(reply) => decode_decision(&reply),
            None => Decision::fault("Engine fault: script exhausted"),
        }
    }
}

/// Executor that records commands and returns scripted results without
/// spawning anything. An empty script returns successes with empty output.
pub struct ScriptedExecutor {
    results: RefCell<VecDeque<ExecutionResult>>,
    executed: RefCell<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new(results: Vec<ExecutionResult>) -> Self {
        Self {
            results: RefCell::new(results.into()),
            executed: RefCell::new(Vec::new()),
        }
    }

    /// Executor whose every command succeeds with empty output.
    pub fn succeeding() -> Self {
        Self::new(Vec::new())
    }

    /// Commands handed to this executor, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.borrow().clone()
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&self, command: &str) -> ExecutionResult {
        self.executed.borrow_mut().push(command.to_string());
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or(ExecutionResult {
                return_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
    }
}
