//! Deny-list gate applied before any command execution.
//!
//! This is a substring containment check, not shell-semantics analysis: a
//! last-resort tripwire against known-catastrophic patterns, not a sandbox.
//! Anything the list does not name runs with the host process's privileges.

/// Patterns that must never reach a shell, matched case-insensitively.
const DENY_LIST: &[&str] = &["rm -rf /", "mkfs", "> /dev/sda", ":(){:|:&};:"];

/// Whether `command` may be handed to the executor.
///
/// An empty command is safe (it is a no-op upstream and never spawns).
pub fn is_safe(command: &str) -> bool {
    if command.is_empty() {
        return true;
    }
    let lowered = command.to_lowercase();
    !DENY_LIST.iter().any(|banned| lowered.contains(banned))
}
