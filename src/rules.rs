//! Compiled pattern rules: the matching primitive behind every gate check.

use regex::{Regex, RegexBuilder};

use crate::config::RuleEntry;

/// A single compiled rule: case-insensitive regex plus the message reported
/// when it fires.
pub struct Rule {
    pattern: Regex,
    pub message: String,
}

impl Rule {
    /// Compile one rule. All rules are case-insensitive.
    pub fn compile(pattern: &str, message: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self {
            pattern,
            message: message.to_string(),
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// The source pattern, as written in configuration.
    pub fn pattern_str(&self) -> &str {
        self.pattern.as_str()
    }
}

/// An ordered rule list. First match wins for reporting.
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile a rule set from configuration entries.
    ///
    /// Entries that fail to compile are skipped with a diagnostic rather
    /// than aborting: a broken user override must not take the gate down.
    pub fn compile(entries: &[RuleEntry]) -> Self {
        let mut rules = Vec::with_capacity(entries.len());
        for entry in entries {
            match Rule::compile(&entry.pattern, &entry.message) {
                Ok(rule) => rules.push(rule),
                Err(err) => {
                    log::warn!("skipping unparseable rule {:?}: {err}", entry.pattern);
                }
            }
        }
        Self { rules }
    }

    /// The first rule matching `text`, in configuration order.
    pub fn first_match(&self, text: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.is_match(text))
    }

    /// All rules matching `text`, in configuration order.
    pub fn matches<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Rule> {
        self.rules.iter().filter(move |rule| rule.is_match(text))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
