//! `KEY=VALUE` profile file format.
//!
//! Blank lines and lines starting with `#` are ignored. The first `=` splits
//! key from value; the line, key and value are trimmed. Lines with no `=`, an
//! empty key or a key containing whitespace are skipped.

use std::collections::BTreeMap;

pub fn parse(input: &str) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            continue;
        }

        env.insert(key.to_string(), value.trim().to_string());
    }

    env
}

pub fn render(header: &str, env: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    for line in header.lines() {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }

    for (key, value) in env {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }

    out
}
