//! Assembly of the engine request from the instruction and prior steps.
//!
//! Each prior step contributes one assistant/user message pair with the
//! observed output clipped to a fixed character budget, so context grows by a
//! constant amount per step instead of accumulating raw output unbounded.

use minijinja::{Environment, context};
use serde::Serialize;

use crate::core::types::Step;

const SYSTEM_TEMPLATE: &str = include_str!("prompts/system.md");

/// One chat message in the engine request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Per-request sizing policy. All values are configuration, not mechanism.
#[derive(Debug, Clone)]
pub struct PromptLimits {
    /// Step budget quoted to the engine in the system instructions.
    pub max_steps: usize,
    /// Character cap on each step's stdout in the request context.
    pub stdout_chars: usize,
    /// Character cap on each step's stderr in the request context.
    pub stderr_chars: usize,
}

impl Default for PromptLimits {
    fn default() -> Self {
        Self {
            max_steps: 3,
            stdout_chars: 1500,
            stderr_chars: 1000,
        }
    }
}

/// Build the full message sequence for one engine call.
pub fn build_messages(instruction: &str, history: &[Step], limits: &PromptLimits) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2 + history.len() * 2);
    messages.push(ChatMessage::system(render_system(limits.max_steps)));
    messages.push(ChatMessage::user(format!("Task: {instruction}")));
    for step in history {
        messages.push(ChatMessage::assistant(format!("Cmd: {}", step.command)));
        messages.push(ChatMessage::user(format!(
            "Result: {}\nOut: {}\nErr: {}",
            step.exit_code,
            clip_chars(&step.stdout, limits.stdout_chars),
            clip_chars(&step.stderr, limits.stderr_chars),
        )));
    }
    messages
}

fn render_system(max_steps: usize) -> String {
    let mut env = Environment::new();
    env.add_template("system", SYSTEM_TEMPLATE)
        .expect("system template should be valid");
    let template = env
        .get_template("system")
        .expect("system template is registered");
    template
        .render(context! { max_steps => max_steps })
        .expect("system template rendering should not fail")
}

/// Longest prefix of `s` holding at most `limit` characters.
pub(crate) fn clip_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
