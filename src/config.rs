//! Host configuration parsing and compiler-argument tokenization.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::{AppError, Result};

/// Token pattern for the free-form `compiler_arguments` string.
///
/// Matches, in order of preference: a single-quoted segment (with `\'`
/// escapes), a double-quoted segment (with `\"` escapes), a slash-delimited
/// segment (with `\/` escapes), or a bare run of non-space characters where
/// a backslash-escaped space does not end the token.
const TOKEN_PATTERN: &str = r#"'(?:\\'|[^'])*'|"(?:\\"|[^"])*"|/(?:\\/|[^/])*/|(?:\\ |[^ ])+"#;

/// Host configuration parsed from `config.toml`.
///
/// Both fields are optional: an absent `compiler_dir` simply makes the
/// configuration discovery strategy inapplicable, and an absent
/// `compiler_arguments` yields an empty argument list.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct HostConfig {
    /// Directory expected to contain the compiler executable. Takes
    /// precedence over every other discovery strategy.
    #[serde(default)]
    pub compiler_dir: Option<PathBuf>,
    /// Free-form argument string appended to the compiler's `lsp`
    /// invocation after tokenization.
    #[serde(default)]
    pub compiler_arguments: Option<String>,
}

impl HostConfig {
    /// Load configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        Ok(config)
    }

    /// Tokenized compiler arguments, empty when none are configured.
    #[must_use]
    pub fn arguments(&self) -> Vec<String> {
        self.compiler_arguments
            .as_deref()
            .map(split_arguments)
            .unwrap_or_default()
    }
}

/// Split a free-form argument string into tokens.
///
/// Whitespace separates tokens, except inside single-quoted, double-quoted,
/// or slash-delimited segments, which stay atomic. Quoted segments lose
/// their delimiters and have their inner quote escapes resolved; bare and
/// slash-delimited tokens pass through verbatim, escapes included.
#[must_use]
pub fn split_arguments(raw: &str) -> Vec<String> {
    let Some(re) = token_regex() else {
        // Pattern failure cannot happen for the literal above; degrade to a
        // plain whitespace split rather than panicking.
        return raw.split_whitespace().map(str::to_owned).collect();
    };
    re.find_iter(raw)
        .map(|token| normalize_token(token.as_str()))
        .collect()
}

fn token_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TOKEN_PATTERN).ok()).as_ref()
}

/// Strip quote delimiters and resolve the matching inner escapes.
fn normalize_token(token: &str) -> String {
    if token.len() >= 2 {
        if token.starts_with('\'') && token.ends_with('\'') {
            return token[1..token.len() - 1].replace("\\'", "'");
        }
        if token.starts_with('"') && token.ends_with('"') {
            return token[1..token.len() - 1].replace("\\\"", "\"");
        }
    }
    token.to_owned()
}
