// SPDX-FileCopyrightText: 2026 Worktrack Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment errors into miette diagnostics.
//!
//! Unknown keys get a "did you mean" hint (Jaro-Winkler via `strsim`) and,
//! when the key can be found in one of the TOML sources, a labelled span.

#![allow(unused_assignments)] // emitted by the miette Diagnostic derive

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A configuration problem, renderable with miette.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown configuration key `{key}` in {section}")]
    #[diagnostic(
        code(worktrack::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// `[name]` of the enclosing table, or `top level`.
        section: String,
        suggestion: Option<String>,
        valid_keys: Vec<String>,
        #[label("not a recognized key")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: {detail}")]
    #[diagnostic(code(worktrack::config::invalid_type), help("use a {expected}"))]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(worktrack::config::missing_key),
        help("set `{key}` in worktrack.toml")
    )]
    MissingKey { key: String },

    /// A value deserialized fine but is not acceptable.
    #[error("validation error: {message}")]
    #[diagnostic(code(worktrack::config::validation))]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(worktrack::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &[String]) -> String {
    let valid = valid_keys.join(", ");
    match suggestion {
        Some(s) => format!("did you mean `{s}`? expected one of: {valid}"),
        None => format!("expected one of: {valid}"),
    }
}

/// TOML documents that fed the figment, as `(display name, contents)`.
///
/// Used only to attach source spans to diagnostics.
struct Sources<'a>(&'a [(String, String)]);

impl Sources<'_> {
    /// Locate `field` under `table`, preferring the file figment blamed.
    fn locate(
        &self,
        blamed: Option<&str>,
        table: &[String],
        field: &str,
    ) -> Option<(SourceSpan, NamedSource<String>)> {
        let preferred = blamed.and_then(|b| self.0.iter().find(|(name, _)| name == b));
        preferred
            .into_iter()
            .chain(self.0.iter())
            .find_map(|(name, content)| {
                let offset = find_key_offset(content, table, field)?;
                Some((
                    SourceSpan::new(offset.into(), field.len()),
                    NamedSource::new(name, content.clone()),
                ))
            })
    }
}

/// Convert a `figment::Error` (which may hold several errors) into diagnostics.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    let sources = Sources(toml_sources);

    err.into_iter()
        .map(|error| {
            let table: Vec<String> = error.path.iter().map(ToString::to_string).collect();
            match &error.kind {
                Kind::UnknownField(field, expected) => {
                    let blamed = error
                        .metadata
                        .as_ref()
                        .and_then(|m| m.source.as_ref())
                        .and_then(|s| match s {
                            figment::Source::File(path) => Some(path.display().to_string()),
                            _ => None,
                        });
                    let located = sources.locate(blamed.as_deref(), &table, field);
                    let (span, src) = match located {
                        Some((span, src)) => (Some(span), Some(src)),
                        None => (None, None),
                    };
                    ConfigError::UnknownKey {
                        key: field.clone(),
                        section: match table.as_slice() {
                            [] => "top level".to_string(),
                            parts => format!("[{}]", parts.join(".")),
                        },
                        suggestion: suggest_key(field, *expected),
                        valid_keys: expected.iter().map(|k| k.to_string()).collect(),
                        span,
                        src,
                    }
                }
                Kind::MissingField(field) => ConfigError::MissingKey {
                    key: qualified(&table, field),
                },
                Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                    key: table.join("."),
                    detail: format!("found {actual}"),
                    expected: expected.to_string(),
                },
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

fn qualified(table: &[String], field: &str) -> String {
    if table.is_empty() {
        field.to_string()
    } else {
        format!("{}.{field}", table.join("."))
    }
}

/// Byte offset of `field` as a key inside the `[table]` section of `content`.
///
/// Scans line by line tracking the current table header, so a key with the
/// same name in a different section is never matched. An empty `table` means
/// keys before the first header.
pub fn find_key_offset(content: &str, table: &[String], field: &str) -> Option<usize> {
    let wanted = table.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
        } else if current == wanted {
            let is_key = trimmed
                .strip_prefix(field)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if is_key {
                return Some(offset + (line.len() - trimmed.len()));
            }
        }
        offset += line.len();
    }

    None
}

/// The valid key most similar to `unknown`, if any is similar enough.
pub fn suggest_key<S: AsRef<str>>(unknown: &str, valid_keys: &[S]) -> Option<String> {
    valid_keys
        .iter()
        .map(|k| (strsim::jaro_winkler(unknown, k.as_ref()), k.as_ref()))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print every error to stderr with miette's graphical renderer.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut out = String::new();
        match handler.render_report(&mut out, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{out}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
}
