//! Bounded-step autonomous diagnostic agent.
//!
//! Given a natural-language problem statement, the agent repeatedly asks a
//! reasoning engine for one batched diagnostic shell command plus a running
//! hypothesis, executes it under a deny-list safety gate, and feeds the
//! truncated result back as context, until the engine declares the root cause
//! found or a step budget is exhausted. The architecture enforces a strict
//! separation:
//!
//! - **[`core`]**: Pure, deterministic logic (safety gate, decision model and
//!   decoding, prompt assembly, transcript rendering). No I/O, fully testable
//!   in isolation.
//! - **[`io`]**: Side-effecting operations (process execution, engine
//!   transport, configuration). Isolated behind trait seams to enable
//!   scripted doubles in tests.
//!
//! [`investigation`] coordinates core logic with I/O to drive the loop; its
//! rendered transcript is the single caller-facing product.

pub mod core;
pub mod exit_codes;
pub mod investigation;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
