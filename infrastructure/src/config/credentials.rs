//! Credentials file loading
//!
//! The credentials file uses the Java properties layout:
//!
//! ```text
//! # portal account
//! userName=someone@example.edu
//! pwd: secret
//! ```
//!
//! `ENROLL_USER_NAME` and `ENROLL_PWD` override the file values.

use super::error::ConfigError;
use enroll_domain::Credentials;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

const USER_NAME_KEY: &str = "userName";
const PWD_KEY: &str = "pwd";

/// Loads portal credentials from a properties file and the environment
pub struct CredentialsLoader;

impl CredentialsLoader {
    pub const USER_NAME_ENV: &'static str = "ENROLL_USER_NAME";
    pub const PWD_ENV: &'static str = "ENROLL_PWD";

    /// Read credentials from `path`, letting environment variables win.
    ///
    /// A missing file is only accepted when both environment variables are
    /// set.
    pub fn load(path: &Path) -> Result<Credentials, ConfigError> {
        let env = |key: &str| std::env::var(key).ok();

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e)
                if e.kind() == ErrorKind::NotFound
                    && env(Self::USER_NAME_ENV).is_some()
                    && env(Self::PWD_ENV).is_some() =>
            {
                debug!(
                    "{} not found, using credentials from the environment",
                    path.display()
                );
                String::new()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::resolve(&parse_properties(&text), env)
    }

    /// Combine file properties with environment overrides
    pub fn resolve(
        properties: &HashMap<String, String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Credentials, ConfigError> {
        let lookup = |env_key: &str, key: &str| {
            env(env_key)
                .filter(|value| !value.is_empty())
                .or_else(|| properties.get(key).cloned())
                .unwrap_or_default()
        };

        let user_name = lookup(Self::USER_NAME_ENV, USER_NAME_KEY);
        let pwd = lookup(Self::PWD_ENV, PWD_KEY);
        Credentials::new(user_name, pwd).map_err(ConfigError::from)
    }
}

/// Parse `key=value` / `key: value` lines, skipping `#` and `!` comments.
///
/// A line ending in an odd number of backslashes continues on the next one,
/// whose leading whitespace is dropped. Backslash escapes (`\\`, `\=`, `\:`,
/// `\ `, `\t`, `\n`, `\r`, `\f`, `\uXXXX`) are decoded in keys and values, and
/// an escaped `=` or `:` does not split the entry.
///
/// Leading whitespace of a value is dropped, trailing whitespace is kept.
/// The first occurrence of a key wins over later ones.
pub fn parse_properties(text: &str) -> HashMap<String, String> {
    let mut properties = HashMap::new();
    let mut lines = text.lines().map(|line| line.trim_end_matches('\r'));

    while let Some(line) = lines.next() {
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let mut logical = line.to_string();
        while continues(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_entry(&logical);
        properties
            .entry(unescape(key.trim()))
            .or_insert_with(|| unescape(value.trim_start()));
    }

    properties
}

fn continues(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// Split at the first unescaped `=` or `:`, else at the first unescaped space
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut first_space = None;

    for (index, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => return (&line[..index], &line[index + 1..]),
            c if c.is_whitespace() && first_space.is_none() => first_space = Some(index),
            _ => {}
        }
    }

    match first_space {
        Some(index) => (&line[..index], &line[index..]),
        None => (line, ""),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('u');
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}
