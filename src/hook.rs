//! The boundary contract with the host's tool-execution loop.
//!
//! Input is one JSON record on stdin; output is one decision record on
//! stdout, or nothing at all when the gate has no opinion. Exit status
//! carries no meaning beyond decision-record presence.

use serde::{Deserialize, Serialize};

use crate::gate::{Decision, Operation, Verdict};

#[derive(Debug, Deserialize)]
pub struct HookInput {
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: ToolInput,
    /// Present on prompt-submission events, which carry no tool.
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ToolInput {
    pub command: Option<String>,
    pub file_path: Option<String>,
}

impl HookInput {
    /// Map the tool call to an operation, or `None` for tools the gate has
    /// nothing to say about.
    pub fn operation(&self) -> Option<Operation> {
        match self.tool_name.as_deref()? {
            "Bash" => self.tool_input.command.clone().map(Operation::ShellCommand),
            "Read" => self.tool_input.file_path.clone().map(Operation::FileRead),
            "Write" | "Edit" | "MultiEdit" | "NotebookEdit" => {
                self.tool_input.file_path.clone().map(Operation::FileWrite)
            }
            _ => None,
        }
    }
}

/// Decision record written to stdout. Neutral verdicts produce no record.
#[derive(Debug, Serialize)]
pub struct HookOutput {
    pub decision: &'static str,
    pub reason: String,
}

impl HookOutput {
    pub fn from_verdict(verdict: &Verdict) -> Option<Self> {
        match verdict.decision {
            Decision::Approve => Some(Self {
                decision: "approve",
                reason: verdict.reason.clone(),
            }),
            Decision::Block => Some(Self {
                decision: "block",
                reason: format!(
                    "SAFETY BLOCK: {}. This operation requires manual execution.",
                    verdict.reason
                ),
            }),
            Decision::Neutral => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> HookInput {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn bash_maps_to_shell_command() {
        let input = parse(r#"{"tool_name": "Bash", "tool_input": {"command": "ls -la"}}"#);
        assert_eq!(
            input.operation(),
            Some(Operation::ShellCommand("ls -la".into()))
        );
    }

    #[test]
    fn read_maps_to_file_read() {
        let input = parse(r#"{"tool_name": "Read", "tool_input": {"file_path": "a.txt"}}"#);
        assert_eq!(input.operation(), Some(Operation::FileRead("a.txt".into())));
    }

    #[test]
    fn edit_variants_map_to_file_write() {
        for tool in ["Write", "Edit", "MultiEdit", "NotebookEdit"] {
            let input = parse(&format!(
                r#"{{"tool_name": "{tool}", "tool_input": {{"file_path": "a.txt"}}}}"#
            ));
            assert_eq!(
                input.operation(),
                Some(Operation::FileWrite("a.txt".into())),
                "tool: {tool}"
            );
        }
    }

    #[test]
    fn unknown_tool_is_none() {
        let input = parse(r#"{"tool_name": "Glob", "tool_input": {"pattern": "*.rs"}}"#);
        assert_eq!(input.operation(), None);
    }

    #[test]
    fn missing_fields_are_none() {
        assert_eq!(parse(r#"{}"#).operation(), None);
        assert_eq!(parse(r#"{"tool_name": "Bash"}"#).operation(), None);
    }

    #[test]
    fn prompt_event_parses() {
        let input = parse(r#"{"prompt": "please refactor"}"#);
        assert_eq!(input.prompt.as_deref(), Some("please refactor"));
        assert_eq!(input.operation(), None);
    }

    #[test]
    fn neutral_produces_no_output() {
        assert!(HookOutput::from_verdict(&Verdict::neutral("n/a")).is_none());
    }

    #[test]
    fn block_output_carries_manual_execution_prefix() {
        let out = HookOutput::from_verdict(&Verdict::block("privilege escalation")).unwrap();
        assert_eq!(out.decision, "block");
        assert!(out.reason.starts_with("SAFETY BLOCK: privilege escalation"));
        assert!(out.reason.contains("manual execution"));
    }

    #[test]
    fn approve_output_passes_reason_through() {
        let out = HookOutput::from_verdict(&Verdict::approve("auto-approved: read-only git"))
            .unwrap();
        assert_eq!(out.decision, "approve");
        assert_eq!(out.reason, "auto-approved: read-only git");
    }

    #[test]
    fn output_serializes_to_decision_record() {
        let out = HookOutput::from_verdict(&Verdict::block("fork bomb")).unwrap();
        let json = serde_json::to_string(&out).unwrap();
        assert!(json.starts_with(r#"{"decision":"block","reason":"#), "{json}");
    }
}
