use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use thiserror::Error;

/// `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\{\s*(?P<key>[A-Za-z0-9_.]+)\s*(?:\|\s*default\("(?P<default>[^"]*)"\)\s*)?\}\}"#)
        .expect("placeholder pattern compiles")
});

/// Errors raised while expanding placeholders in configuration text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Referenced variable is unset and no default was given
    #[error("environment variable `{name}` is not set (line {line})")]
    MissingVariable {
        /// Variable name
        name: String,
        /// 1-based line number of the placeholder
        line: usize,
    },

    /// Placeholder is not of the form `env.NAME`
    #[error("unsupported placeholder `{key}` on line {line}; only `env.NAME` is allowed")]
    UnsupportedPlaceholder {
        /// Placeholder key as written
        key: String,
        /// 1-based line number of the placeholder
        line: usize,
    },
}

/// Substitute environment placeholders in raw configuration text
///
/// Comment lines are copied verbatim so that commented-out settings may
/// reference variables that are not set.
pub fn expand_env(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());

    for (index, line) in input.split_inclusive('\n').enumerate() {
        if line.trim_start().starts_with('#') || !line.contains("{{") {
            output.push_str(line);
            continue;
        }
        output.push_str(&expand_line(line, index + 1)?);
    }

    Ok(output)
}

fn expand_line(line: &str, number: usize) -> Result<String, ConfigError> {
    let mut expanded = String::with_capacity(line.len());
    let mut cursor = 0;

    for caps in PLACEHOLDER.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        expanded.push_str(&line[cursor..whole.start()]);
        expanded.push_str(&resolve(&caps, number)?);
        cursor = whole.end();
    }

    expanded.push_str(&line[cursor..]);
    Ok(expanded)
}

fn resolve<'a>(caps: &Captures<'a>, line: usize) -> Result<Cow<'a, str>, ConfigError> {
    let key = caps.name("key").map_or("", |m| m.as_str());
    let Some(name) = key.strip_prefix("env.").filter(|name| !name.is_empty() && !name.contains('.')) else {
        return Err(ConfigError::UnsupportedPlaceholder {
            key: key.to_owned(),
            line,
        });
    };

    match (std::env::var(name), caps.name("default")) {
        (Ok(value), _) => Ok(Cow::Owned(value)),
        (Err(_), Some(default)) => Ok(Cow::Borrowed(default.as_str())),
        (Err(_), None) => Err(ConfigError::MissingVariable {
            name: name.to_owned(),
            line,
        }),
    }
}
