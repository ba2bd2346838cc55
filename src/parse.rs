//! Minimal shell-text parsing: segment splitting and path helpers.
//!
//! The gate matches raw command text, so this module does not build an AST
//! or expand anything. Its one load-bearing job is splitting a compound
//! command at separator tokens so that a dangerous command cannot hide
//! behind a benign prefix (`ls && rm -rf /tmp/x`).

/// Split a command at `&&`, `||`, `;`, `|`, `|&` and newlines.
///
/// Splitting is quote- and escape-aware: separators inside single or double
/// quotes, or preceded by a backslash, do not split. Returned segments are
/// trimmed and non-empty.
pub fn split_segments(command: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = command.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' if !in_single => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '\'' if !in_double => {
                in_single = !in_single;
                current.push(c);
            }
            '"' if !in_single => {
                in_double = !in_double;
                current.push(c);
            }
            _ if in_single || in_double => current.push(c),
            '&' if chars.peek() == Some(&'&') => {
                chars.next();
                flush(&mut segments, &mut current);
            }
            '|' => {
                // `||` and `|&` are two-char separators; plain `|` splits too
                if matches!(chars.peek(), Some(&'|') | Some(&'&')) {
                    chars.next();
                }
                flush(&mut segments, &mut current);
            }
            ';' | '\n' => flush(&mut segments, &mut current),
            _ => current.push(c),
        }
    }
    flush(&mut segments, &mut current);
    segments
}

fn flush(segments: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
    current.clear();
}

/// True when any path segment is `..`.
pub fn has_parent_traversal(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "..")
}

/// First word of a command, for reporting.
pub fn first_word(command: &str) -> String {
    shlex::split(command)
        .and_then(|words| words.into_iter().next())
        .unwrap_or_else(|| {
            // shlex refuses unbalanced quotes; fall back to whitespace
            command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string()
        })
}
