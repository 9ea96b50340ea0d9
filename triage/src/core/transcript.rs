//! Human-readable Markdown transcript of one investigation.
//!
//! Pure builder: the loop appends events, `render` joins them. Every
//! termination path writes an explicit notice, so a transcript never ends in
//! silent truncation.

use crate::core::prompt::clip_chars;
use crate::core::types::ExecutionResult;

/// Accumulates the transcript for a single investigation.
#[derive(Debug)]
pub struct Transcript {
    lines: Vec<String>,
    output_chars: usize,
}

impl Transcript {
    pub fn new(instruction: &str, output_chars: usize) -> Self {
        Self {
            lines: vec![format!(
                "**Diagnostic agent**: investigating \"{instruction}\"\n"
            )],
            output_chars,
        }
    }

    /// Record the engine's rationale for decision round `step` (1-indexed).
    pub fn push_thought(&mut self, step: usize, thought: &str) {
        self.lines.push(format!("**Step {step}**: {thought}"));
    }

    pub fn push_command(&mut self, command: &str) {
        self.lines.push(format!("> `{command}`"));
    }

    /// Record a fenced view of the command outcome: stdout when present,
    /// stderr otherwise, a placeholder when both are empty.
    pub fn push_result(&mut self, result: &ExecutionResult) {
        let shown = match (result.stdout.trim(), result.stderr.trim()) {
            ("", "") => "(no output)",
            ("", stderr) => stderr,
            (stdout, _) => stdout,
        };
        let clipped = clip_chars(shown, self.output_chars);
        let marker = if clipped.len() < shown.len() {
            "\n[truncated]"
        } else {
            ""
        };
        self.lines.push(format!("```\n{clipped}{marker}\n```\n"));
    }

    pub fn push_root_cause(&mut self, report: &str) {
        self.lines.push(format!("\n**Root cause**:\n{report}"));
    }

    pub fn push_limit_notice(&mut self) {
        self.lines
            .push("\n**Analysis limit reached**: showing partial findings.".to_string());
    }

    pub fn push_indecision_notice(&mut self) {
        self.lines.push(
            "\n**No verdict**: the engine stopped without a command or a root cause.".to_string(),
        );
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
