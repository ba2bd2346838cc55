//! cc-safegate: a PreToolUse safety hook for Claude Code.
//!
//! This crate evaluates tool calls (shell commands, file reads, file
//! writes/edits) against configurable regex rule sets and returns one of
//! three decisions: [`gate::Decision::Approve`], [`gate::Decision::Block`],
//! or [`gate::Decision::Neutral`] (no opinion; the host proceeds under its
//! default policy). Commands are matched as a whole first, then split at
//! chaining operators with each segment evaluated on its own, so a dangerous
//! suffix cannot hide behind a benign prefix.
//!
//! # Architecture
//!
//! - **[`parse`]** — Quote-aware splitting at `&&`, `||`, `;`, `|`; path helpers.
//! - **[`rules`]** — Compiled case-insensitive pattern rules, first match wins.
//! - **[`gate`]** — The gate itself: decision types, operation types, evaluation.
//! - **[`hook`]** — Stdin/stdout contract with the host's tool-execution loop.
//! - **[`config`]** — Embedded defaults + user overlay merge.
//! - **[`audit`]** — Decision logging to `~/.local/share/cc-safegate/audit.log`.

/// Best-effort audit trail of decisions.
pub mod audit;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Evaluation: gate, decisions, operations, policies.
pub mod gate;
/// Hook input/output records and tool routing.
pub mod hook;
/// Shell segment splitting and path helpers.
pub mod parse;
/// Pattern rule compilation and matching.
pub mod rules;

use gate::{Gate, Operation, Policy, Verdict};

/// Build a gate from the default configuration and evaluate one operation
/// under the auto-approve policy.
///
/// This is the main entry point for tests and simple usage. For CLI usage
/// with `--strict` or a user config overlay, build the [`Gate`] directly.
pub fn evaluate(op: &Operation) -> Verdict {
    let config = config::Config::default_config();
    Gate::from_config(&config).evaluate(op, Policy::AutoApprove)
}

/// Evaluate a shell command with default configuration.
pub fn evaluate_command(command: &str) -> Verdict {
    evaluate(&Operation::ShellCommand(command.to_string()))
}
