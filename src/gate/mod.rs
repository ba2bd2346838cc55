//! The safety gate: rule sets in, one verdict out.
//!
//! A [`Gate`] holds the compiled rule sets and nothing else. It is built
//! once from configuration and passed around explicitly, so evaluation is a
//! pure function of the operation, the rules and the chosen [`Policy`].

pub mod decision;
pub mod operation;

pub use decision::{Decision, Policy, Verdict};
pub use operation::Operation;

use crate::config::Config;
use crate::parse;
use crate::rules::RuleSet;

pub struct Gate {
    shell_deny: RuleSet,
    shell_warn: RuleSet,
    shell_allow: RuleSet,
    write_deny: RuleSet,
    read_deny: RuleSet,
    prompt_suspicious: RuleSet,
}

impl Gate {
    /// Compile all rule sets from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            shell_deny: RuleSet::compile(&config.shell.deny),
            shell_warn: RuleSet::compile(&config.shell.warn),
            shell_allow: RuleSet::compile(&config.shell.allow),
            write_deny: RuleSet::compile(&config.write.deny),
            read_deny: RuleSet::compile(&config.read.deny),
            prompt_suspicious: RuleSet::compile(&config.prompt.suspicious),
        }
    }

    /// Evaluate one operation. Pure and total: always exactly one verdict.
    pub fn evaluate(&self, op: &Operation, policy: Policy) -> Verdict {
        match op {
            Operation::ShellCommand(command) => self.evaluate_command(command, policy),
            Operation::FileWrite(path) => self.evaluate_write(path),
            Operation::FileRead(path) => self.evaluate_read(path, policy),
        }
    }

    /// Evaluate a shell command.
    ///
    /// Deny rules are matched against the full text first, so patterns that
    /// span separator tokens (the fork-bomb idiom, download-pipe-to-shell)
    /// fire before splitting. Only then is the command split at `&&`, `||`,
    /// `;`, `|` and newlines, with each segment evaluated on its own and the
    /// worst decision winning. Deny always has priority over allow.
    pub fn evaluate_command(&self, command: &str, policy: Policy) -> Verdict {
        let command = command.trim();
        if command.is_empty() {
            return Verdict::neutral("empty command");
        }

        if let Some(rule) = self.shell_deny.first_match(command) {
            return Verdict::block(rule.message.clone());
        }

        let segments = parse::split_segments(command);
        if segments.len() > 1 {
            return self.evaluate_chain(&segments, policy);
        }

        for rule in self.shell_warn.matches(command) {
            log::warn!("{}: {command}", rule.message);
        }

        if policy == Policy::AutoApprove
            && let Some(rule) = self.shell_allow.first_match(command)
        {
            return Verdict::approve(format!("auto-approved: {}", rule.message));
        }

        Verdict::neutral(format!("no opinion on: {}", parse::first_word(command)))
    }

    /// Evaluate each segment of a chained command; the worst decision wins.
    fn evaluate_chain(&self, segments: &[String], policy: Policy) -> Verdict {
        let mut worst = Decision::Approve;
        let mut lines = Vec::new();

        for segment in segments {
            let verdict = self.evaluate_command(segment, policy);
            let label: String = segment.chars().take(60).collect();
            lines.push(format!(
                "  [{label}] -> {}: {}",
                verdict.decision.label(),
                verdict.reason
            ));
            if verdict.decision > worst {
                worst = verdict.decision;
            }
        }

        Verdict {
            decision: worst,
            reason: format!(
                "chained command ({} segments):\n{}",
                segments.len(),
                lines.join("\n")
            ),
        }
    }

    /// Evaluate a file write/edit path.
    fn evaluate_write(&self, path: &str) -> Verdict {
        let path = path.trim();
        if path.is_empty() {
            return Verdict::neutral("empty path");
        }

        let expanded = shellexpand::tilde(path);
        for rule in self.write_deny.matches(&expanded) {
            // .git/hooks is user-editable; let the VCS-internals rule pass it
            if expanded.contains(".git/hooks/") && rule.pattern_str().contains(r"\.git/") {
                continue;
            }
            return Verdict::block(rule.message.clone());
        }

        if parse::has_parent_traversal(path) {
            return Verdict::block("path traversal escapes the working tree");
        }

        Verdict::neutral("path is not sensitive")
    }

    /// Evaluate a file read path.
    fn evaluate_read(&self, path: &str, policy: Policy) -> Verdict {
        let path = path.trim();
        if path.is_empty() {
            return Verdict::neutral("empty path");
        }

        let expanded = shellexpand::tilde(path);
        if let Some(rule) = self.read_deny.first_match(&expanded) {
            return Verdict::block(rule.message.clone());
        }

        match policy {
            Policy::AutoApprove => Verdict::approve("reads are generally safe"),
            Policy::Strict => Verdict::neutral("path is not sensitive"),
        }
    }

    /// Scan a submitted prompt for suspicious patterns.
    ///
    /// Log-only: findings go to the diagnostics channel and nothing is ever
    /// blocked on their account.
    pub fn review_prompt(&self, prompt: &str) {
        for rule in self.prompt_suspicious.matches(prompt) {
            let excerpt: String = prompt.chars().take(120).collect();
            log::warn!("suspicious prompt ({}): {excerpt}", rule.message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate() -> Gate {
        Gate::from_config(&Config::default_config())
    }

    fn write_decision(path: &str) -> Decision {
        gate()
            .evaluate(&Operation::FileWrite(path.into()), Policy::AutoApprove)
            .decision
    }

    fn read_decision(path: &str, policy: Policy) -> Decision {
        gate()
            .evaluate(&Operation::FileRead(path.into()), policy)
            .decision
    }

    #[test]
    fn write_env_file_blocks() {
        assert_eq!(write_decision(".env"), Decision::Block);
        assert_eq!(write_decision("config/.env.production"), Decision::Block);
    }

    #[test]
    fn write_source_file_is_neutral() {
        assert_eq!(write_decision("src/app.py"), Decision::Neutral);
    }

    #[test]
    fn write_traversal_blocks() {
        assert_eq!(write_decision("../outside.txt"), Decision::Block);
        let verdict = gate().evaluate(
            &Operation::FileWrite("../outside.txt".into()),
            Policy::AutoApprove,
        );
        assert!(verdict.reason.contains("traversal"), "{}", verdict.reason);
    }

    #[test]
    fn write_git_internals_block_but_hooks_pass() {
        assert_eq!(write_decision(".git/config"), Decision::Block);
        assert_eq!(write_decision(".git/hooks/pre-commit"), Decision::Neutral);
    }

    #[test]
    fn write_tilde_path_blocks() {
        assert_eq!(write_decision("~/.ssh/config"), Decision::Block);
        assert_eq!(write_decision("~/.aws/config"), Decision::Block);
    }

    #[test]
    fn read_key_material_blocks_under_both_policies() {
        assert_eq!(read_decision("~/.ssh/id_rsa", Policy::AutoApprove), Decision::Block);
        assert_eq!(read_decision("~/.ssh/id_rsa", Policy::Strict), Decision::Block);
        assert_eq!(read_decision("server.pem", Policy::Strict), Decision::Block);
    }

    #[test]
    fn read_policy_selects_approve_or_neutral() {
        assert_eq!(read_decision("README.md", Policy::AutoApprove), Decision::Approve);
        assert_eq!(read_decision("README.md", Policy::Strict), Decision::Neutral);
    }

    #[test]
    fn empty_inputs_are_neutral() {
        let g = gate();
        assert_eq!(
            g.evaluate(&Operation::ShellCommand("   ".into()), Policy::AutoApprove)
                .decision,
            Decision::Neutral
        );
        assert_eq!(
            g.evaluate(&Operation::FileWrite("".into()), Policy::AutoApprove)
                .decision,
            Decision::Neutral
        );
    }

    #[test]
    fn strict_policy_never_approves_commands() {
        let g = gate();
        let verdict = g.evaluate_command("git status", Policy::Strict);
        assert_eq!(verdict.decision, Decision::Neutral);
    }

    #[test]
    fn chain_reason_names_the_blocking_segment() {
        let g = gate();
        let verdict = g.evaluate_command("pwd; sudo systemctl restart nginx", Policy::AutoApprove);
        assert_eq!(verdict.decision, Decision::Block);
        assert!(verdict.reason.contains("privilege escalation"), "{}", verdict.reason);
        assert!(verdict.reason.contains("[sudo systemctl restart nginx]"), "{}", verdict.reason);
    }
}
