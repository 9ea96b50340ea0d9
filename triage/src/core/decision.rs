//! The reasoning engine's structured reply and its tolerant decoder.
//!
//! Engines are asked for a bare JSON object but routinely wrap it in prose or
//! code fences. Decoding therefore extracts the first `{...}` span before
//! parsing, and [`decode_decision`] is total: any input yields a `Decision`,
//! with unusable input collapsing into a terminal fault decision so the loop
//! always ends gracefully instead of iterating on garbage.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// One structured reply from the reasoning engine.
///
/// Transient: consumed by the loop in the iteration that produced it, never
/// stored in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Decision {
    /// Running hypothesis for this step.
    pub thought: String,
    /// Batched shell command to run next. Absent or empty means no action.
    pub command: Option<String>,
    /// When true the investigation ends regardless of remaining budget.
    pub is_final: bool,
    /// Root-cause summary; meaningful only when `is_final` is set.
    pub final_report: String,
}

impl Default for Decision {
    fn default() -> Self {
        Self {
            thought: "(no rationale given)".to_string(),
            command: None,
            is_final: false,
            final_report: String::new(),
        }
    }
}

impl Decision {
    /// Terminal decision used when the engine could not produce a usable
    /// reply. Parse failures and transport failures both collapse into this,
    /// so the caller sees one uniform shape.
    pub fn fault(report: impl Into<String>) -> Self {
        Self {
            thought: "engine fault".to_string(),
            command: None,
            is_final: true,
            final_report: report.into(),
        }
    }

    /// The command to execute this step, if the engine proposed one.
    pub fn action(&self) -> Option<&str> {
        self.command
            .as_deref()
            .map(str::trim)
            .filter(|command| !command.is_empty())
    }
}

/// Why an engine reply could not be parsed as a [`Decision`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionParseError {
    message: String,
}

impl DecisionParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for DecisionParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DecisionParseError {}

/// Parse an engine reply, salvaging JSON wrapped in fences or prose.
pub fn parse_decision(raw: &str) -> Result<Decision, DecisionParseError> {
    let trimmed = raw.trim();
    let payload = if trimmed.starts_with('{') {
        trimmed
    } else {
        extract_object(trimmed)
            .ok_or_else(|| DecisionParseError::new("no JSON object in engine reply"))?
    };
    serde_json::from_str(payload)
        .map_err(|err| DecisionParseError::new(format!("invalid decision JSON: {err}")))
}

/// Total decoder: any input yields a decision, malformed input a terminal one.
pub fn decode_decision(raw: &str) -> Decision {
    match parse_decision(raw) {
        Ok(decision) => decision,
        Err(err) => Decision::fault(format!("Engine fault: {err}")),
    }
}

/// First `{` through last `}`, spanning newlines. Matches the whole object
/// even when the engine nests braces inside string values.
fn extract_object(reply: &str) -> Option<&str> {
    static OBJECT_RE: LazyLock<regex::Regex> =
        LazyLock::new(|| regex::Regex::new(r"(?s)\{.*\}").unwrap());
    OBJECT_RE.find(reply).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json() {
        let decision = parse_decision(
            r#"{"thought": "check disk", "command": "df -h", "is_final": false, "final_report": ""}"#,
        )
        .expect("parse");
        assert_eq!(decision.thought, "check disk");
        assert_eq!(decision.action(), Some("df -h"));
        assert!(!decision.is_final);
    }

    #[test]
    fn parses_json_wrapped_in_code_fences() {
        let reply = "Here is my decision:\n```json\n{\"thought\": \"t\", \"command\": null, \"is_final\": true, \"final_report\": \"disk full\"}\n```";
        let decision = parse_decision(reply).expect("parse");
        assert!(decision.is_final);
        assert_eq!(decision.final_report, "disk full");
    }

    #[test]
    fn missing_fields_take_defaults() {
        let decision = parse_decision(r#"{"command": "uptime"}"#).expect("parse");
        assert_eq!(decision.thought, "(no rationale given)");
        assert!(!decision.is_final);
        assert!(decision.final_report.is_empty());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let decision =
            parse_decision(r#"{"thought": "t", "confidence": 0.9, "command": "ls"}"#).expect("parse");
        assert_eq!(decision.action(), Some("ls"));
    }

    #[test]
    fn null_and_empty_commands_mean_no_action() {
        let null_cmd = parse_decision(r#"{"thought": "t", "command": null}"#).expect("parse");
        assert_eq!(null_cmd.action(), None);
        let empty_cmd = parse_decision(r#"{"thought": "t", "command": "  "}"#).expect("parse");
        assert_eq!(empty_cmd.action(), None);
    }

    #[test]
    fn decoding_is_total_over_garbage() {
        for raw in ["", "no json here", "{broken", "```\nstill not json\n```"] {
            let decision = decode_decision(raw);
            assert!(decision.is_final, "input {raw:?} must terminate the loop");
            assert!(decision.final_report.contains("Engine fault"));
            assert_eq!(decision.action(), None);
        }
    }

    #[test]
    fn decoded_fault_reports_the_parse_problem() {
        let decision = decode_decision("the root cause is probably DNS");
        assert!(decision.final_report.contains("no JSON object"));
    }

    #[test]
    fn wire_shape_round_trips() {
        let wire = r#"{"thought":"t","command":null,"is_final":true,"final_report":"r"}"#;
        let decision: Decision = serde_json::from_str(wire).expect("deserialize");
        let back = serde_json::to_string(&decision).expect("serialize");
        assert_eq!(back, wire);
    }
}
