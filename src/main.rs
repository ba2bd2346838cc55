//! cc-safegate: PreToolUse hook entry point.
//!
//! Reads one hook record as JSON from stdin and writes a decision record to
//! stdout, or nothing when the gate has no opinion. Always exits 0: the
//! decision record is authoritative, and nothing from this process may
//! surface to the host as a failure.

use std::io::Read;

use cc_safegate::audit;
use cc_safegate::config::Config;
use cc_safegate::gate::{Gate, Policy};
use cc_safegate::hook::{HookInput, HookOutput};

fn main() {
    init_diagnostics();

    let mut policy = Policy::AutoApprove;
    let mut dump_config = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--strict" => policy = Policy::Strict,
            "--dump-config" => dump_config = true,
            other => log::warn!("ignoring unknown flag: {other}"),
        }
    }

    let config = Config::load();

    if dump_config {
        match toml::to_string_pretty(&config) {
            Ok(text) => print!("{text}"),
            Err(e) => log::warn!("cannot serialize config: {e}"),
        }
        return;
    }

    let gate = Gate::from_config(&config);

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        log::warn!("failed to read stdin");
        return;
    }

    let hook_input: HookInput = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            // Malformed input defers to the host's default policy
            log::warn!("malformed hook input: {e}");
            return;
        }
    };

    if hook_input.tool_name.is_none()
        && let Some(prompt) = hook_input.prompt.as_deref()
    {
        gate.review_prompt(prompt);
        return;
    }

    let Some(op) = hook_input.operation() else {
        return;
    };

    let verdict = gate.evaluate(&op, policy);
    if config.settings.audit {
        audit::record(&op, &verdict);
    }

    if let Some(output) = HookOutput::from_verdict(&verdict)
        && let Ok(json) = serde_json::to_string(&output)
    {
        println!("{json}");
    }
}

/// Route diagnostics to ~/.local/share/cc-safegate/diagnostics.log.
/// Failures degrade to no-op logging; they never affect decisions.
fn init_diagnostics() {
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let dir = std::path::Path::new(&home).join(".local/share/cc-safegate");
    let _ = std::fs::create_dir_all(&dir);
    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("diagnostics.log"))
    else {
        return;
    };
    let _ = simplelog::WriteLogger::init(
        log::LevelFilter::Info,
        simplelog::Config::default(),
        file,
    );
}
