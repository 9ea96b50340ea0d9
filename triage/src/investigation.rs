//! The bounded decide/execute/observe loop.
//!
//! One investigation proceeds strictly sequentially: each engine call sees
//! exactly the steps recorded before it, and every executed command has first
//! passed the safety gate inside the executor. The loop never fails — it
//! always returns a complete transcript, whether the engine found a root
//! cause, stopped without one, faulted, or ran out of budget.

use tracing::{info, instrument};

use crate::core::transcript::Transcript;
use crate::core::types::Step;
use crate::io::engine::ReasoningEngine;
use crate::io::executor::Executor;

/// Loop policy. Values come from configuration; the loop itself carries no
/// constants.
#[derive(Debug, Clone)]
pub struct InvestigationConfig {
    /// Maximum command-execution cycles for this investigation.
    pub max_steps: usize,
    /// Character cap on the per-step output view in the transcript.
    pub transcript_output_chars: usize,
}

impl Default for InvestigationConfig {
    fn default() -> Self {
        Self {
            max_steps: 3,
            transcript_output_chars: 800,
        }
    }
}

/// Why an investigation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestigationStop {
    /// The engine declared the root cause found (or reported a fault).
    RootCause,
    /// The engine stopped proposing commands without declaring a verdict.
    Indecisive,
    /// The step budget ran out before a verdict.
    BudgetExhausted,
}

/// Result of one investigation.
#[derive(Debug, Clone)]
pub struct InvestigationOutcome {
    /// Rendered human-readable transcript, the caller-facing product.
    pub transcript: String,
    /// Executed steps in causal order; length never exceeds the budget.
    pub steps: Vec<Step>,
    pub stop: InvestigationStop,
}

/// Drive one investigation to completion.
///
/// `on_step` observes each recorded step as it happens (blocked and failed
/// attempts included).
#[instrument(skip_all, fields(max_steps = config.max_steps))]
pub fn run_investigation<E, X, F>(
    engine: &E,
    executor: &X,
    config: &InvestigationConfig,
    instruction: &str,
    mut on_step: F,
) -> InvestigationOutcome
where
    E: ReasoningEngine,
    X: Executor,
    F: FnMut(&Step),
{
    let mut history: Vec<Step> = Vec::new();
    let mut transcript = Transcript::new(instruction, config.transcript_output_chars);

    while history.len() < config.max_steps {
        let decision = engine.think(instruction, &history);
        let round = history.len() + 1;
        info!(round, thought = %decision.thought, is_final = decision.is_final, "engine decided");
        transcript.push_thought(round, &decision.thought);

        if decision.is_final {
            transcript.push_root_cause(&decision.final_report);
            return finish(transcript, history, InvestigationStop::RootCause);
        }

        let Some(command) = decision.action() else {
            transcript.push_indecision_notice();
            return finish(transcript, history, InvestigationStop::Indecisive);
        };

        transcript.push_command(command);
        let result = executor.execute(command);
        transcript.push_result(&result);

        let step = Step::from_result(command.to_string(), result);
        on_step(&step);
        history.push(step);
    }

    transcript.push_limit_notice();
    finish(transcript, history, InvestigationStop::BudgetExhausted)
}

fn finish(
    transcript: Transcript,
    steps: Vec<Step>,
    stop: InvestigationStop,
) -> InvestigationOutcome {
    InvestigationOutcome {
        transcript: transcript.render(),
        steps,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedEngine, ScriptedExecutor, command_decision, final_decision};

    #[test]
    fn final_decision_on_first_round_executes_nothing() {
        let engine = ScriptedEngine::new(vec![final_decision("known issue")]);
        let executor = ScriptedExecutor::succeeding();

        let outcome = run_investigation(
            &engine,
            &executor,
            &InvestigationConfig::default(),
            "task",
            |_| {},
        );

        assert_eq!(outcome.stop, InvestigationStop::RootCause);
        assert!(outcome.steps.is_empty());
        assert!(executor.executed().is_empty());
        assert!(outcome.transcript.contains("known issue"));
    }

    #[test]
    fn indecisive_reply_stops_with_a_distinct_notice() {
        let engine = ScriptedEngine::new(vec![command_decision("looked, unsure", "")]);
        let executor = ScriptedExecutor::succeeding();

        let outcome = run_investigation(
            &engine,
            &executor,
            &InvestigationConfig::default(),
            "task",
            |_| {},
        );

        assert_eq!(outcome.stop, InvestigationStop::Indecisive);
        assert!(outcome.steps.is_empty());
        assert!(outcome.transcript.contains("No verdict"));
    }

    #[test]
    fn budget_of_one_executes_exactly_one_step() {
        let engine = ScriptedEngine::new(vec![command_decision("probe", "df -h")]);
        let executor = ScriptedExecutor::succeeding();
        let config = InvestigationConfig {
            max_steps: 1,
            ..InvestigationConfig::default()
        };

        let outcome = run_investigation(&engine, &executor, &config, "task", |_| {});

        assert_eq!(outcome.stop, InvestigationStop::BudgetExhausted);
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(executor.executed(), vec!["df -h".to_string()]);
    }

    #[test]
    fn on_step_observes_each_recorded_step() {
        let engine = ScriptedEngine::new(vec![
            command_decision("one", "echo 1"),
            command_decision("two", "echo 2"),
            final_decision("done"),
        ]);
        let executor = ScriptedExecutor::succeeding();

        let mut seen = Vec::new();
        let outcome = run_investigation(
            &engine,
            &executor,
            &InvestigationConfig::default(),
            "task",
            |step| seen.push(step.command.clone()),
        );

        assert_eq!(outcome.stop, InvestigationStop::RootCause);
        assert_eq!(seen, vec!["echo 1".to_string(), "echo 2".to_string()]);
        assert_eq!(outcome.steps.len(), 2);
    }
}
