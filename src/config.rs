use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

/// One configured rule: a regex source plus the message reported on match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleEntry {
    pub pattern: String,
    pub message: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub shell: ShellRules,
    #[serde(default)]
    pub write: WriteRules,
    #[serde(default)]
    pub read: ReadRules,
    #[serde(default)]
    pub prompt: PromptRules,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Append a record per decision to the audit log.
    #[serde(default = "default_audit")]
    pub audit: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { audit: true }
    }
}

fn default_audit() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ShellRules {
    #[serde(default)]
    pub deny: Vec<RuleEntry>,
    #[serde(default)]
    pub warn: Vec<RuleEntry>,
    #[serde(default)]
    pub allow: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct WriteRules {
    #[serde(default)]
    pub deny: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct ReadRules {
    #[serde(default)]
    pub deny: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct PromptRules {
    #[serde(default)]
    pub suspicious: Vec<RuleEntry>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    shell: ShellOverlay,
    #[serde(default)]
    write: FileRulesOverlay,
    #[serde(default)]
    read: FileRulesOverlay,
    #[serde(default)]
    prompt: PromptOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    audit: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct ShellOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    deny: Vec<RuleEntry>,
    #[serde(default)]
    warn: Vec<RuleEntry>,
    #[serde(default)]
    allow: Vec<RuleEntry>,
    #[serde(default)]
    remove_deny: Vec<String>,
    #[serde(default)]
    remove_warn: Vec<String>,
    #[serde(default)]
    remove_allow: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FileRulesOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    deny: Vec<RuleEntry>,
    #[serde(default)]
    remove_deny: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct PromptOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    suspicious: Vec<RuleEntry>,
    #[serde(default)]
    remove_suspicious: Vec<String>,
}

// ── Merge logic ──

/// Merge user rules into a default list, keyed by pattern source.
/// In replace mode: user rules replace the defaults entirely.
/// In merge mode: remove listed patterns first, then extend (deduped).
fn merge_rules(base: &mut Vec<RuleEntry>, add: Vec<RuleEntry>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
        return;
    }
    base.retain(|rule| !remove.contains(&rule.pattern));
    for entry in add {
        if !base.iter().any(|rule| rule.pattern == entry.pattern) {
            base.push(entry);
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/cc-safegate/config.toml (if exists)
    ///
    /// User config merges with defaults: rule lists extend, scalars override.
    /// Set `replace = true` in any section to replace its defaults entirely.
    /// Use `remove_<field>` pattern lists to subtract specific defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/cc-safegate/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/cc-safegate/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                log::warn!("user config parse error, ignoring overlay: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        if let Some(v) = overlay.settings.audit {
            self.settings.audit = v;
        }

        let s = overlay.shell;
        merge_rules(&mut self.shell.deny, s.deny, &s.remove_deny, s.replace);
        merge_rules(&mut self.shell.warn, s.warn, &s.remove_warn, s.replace);
        merge_rules(&mut self.shell.allow, s.allow, &s.remove_allow, s.replace);

        let w = overlay.write;
        merge_rules(&mut self.write.deny, w.deny, &w.remove_deny, w.replace);

        let r = overlay.read;
        merge_rules(&mut self.read.deny, r.deny, &r.remove_deny, r.replace);

        let p = overlay.prompt;
        merge_rules(
            &mut self.prompt.suspicious,
            p.suspicious,
            &p.remove_suspicious,
            p.replace,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
