//! Boolean matchers over a file's path relative to the source root.
//!
//! Predicates within one rule combine with logical AND. Relative paths are
//! always `/`-separated, regardless of platform.

use regex::Regex;
use tracing::warn;

use docpack_shared::{DocpackError, Result};

/// A single boolean matcher over a relative path.
#[derive(Debug, Clone)]
pub enum Predicate {
    /// Regex search anywhere in the path.
    Matches(Regex),
    /// Literal path prefix.
    StartsWith(String),
    /// Exact equality of the path's directory portion (`""` at the root).
    Dirname(String),
    /// Matches nothing. Produced when a predicate description contains no
    /// recognized key, so malformed configuration fails closed.
    Never,
}

impl Predicate {
    /// Regex-search predicate. A malformed pattern is a fatal config error.
    pub fn matches(pattern: &str) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| DocpackError::config(format!("bad predicate regex {pattern:?}: {e}")))?;
        Ok(Self::Matches(re))
    }

    /// Literal-prefix predicate.
    pub fn starts_with(prefix: impl Into<String>) -> Self {
        Self::StartsWith(prefix.into())
    }

    /// Directory-equality predicate.
    pub fn dirname(dir: impl Into<String>) -> Self {
        Self::Dirname(dir.into())
    }

    /// Evaluate against a `/`-separated relative path.
    pub fn eval(&self, rel_path: &str) -> bool {
        match self {
            Self::Matches(re) => re.is_match(rel_path),
            Self::StartsWith(prefix) => rel_path.starts_with(prefix.as_str()),
            Self::Dirname(dir) => dir_of(rel_path) == dir,
            Self::Never => false,
        }
    }
}

/// The directory portion of a relative path (`""` for root-level files).
fn dir_of(rel_path: &str) -> &str {
    match rel_path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    }
}

/// Build predicates from a loosely-typed `(key, value)` vocabulary:
/// `matches`, `startswith`, `dirname`.
///
/// Unknown keys are dropped with a warning. Zero recognized keys yields
/// `[Predicate::Never]` — an invalid predicate matches nothing rather than
/// everything.
pub fn from_entries<'a, I>(entries: I) -> Result<Vec<Predicate>>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut predicates = Vec::new();

    for (key, value) in entries {
        match key {
            "matches" => predicates.push(Predicate::matches(value)?),
            "startswith" => predicates.push(Predicate::starts_with(value)),
            "dirname" => predicates.push(Predicate::dirname(value)),
            other => warn!(key = other, "unknown predicate key"),
        }
    }

    if predicates.is_empty() {
        warn!("predicate has no recognized keys and will always fail");
        predicates.push(Predicate::Never);
    }

    Ok(predicates)
}
