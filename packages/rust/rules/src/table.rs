//! Ordered predicate→action routing. First matching rule wins.

use regex::Regex;
use tracing::trace;

use docpack_shared::{DocpackError, Result};

use crate::predicate::Predicate;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// What to do with a matched file. Plain data; the build orchestrator
/// interprets it.
#[derive(Debug, Clone)]
pub enum Action {
    /// Byte-for-byte duplicate.
    Copy,
    /// Read as text, apply one pure text transform, write the result.
    Patch(TextPatch),
    /// Parse as a document, extract symbols, inject navigation markers,
    /// then serialize-if-modified-else-copy.
    Transform,
}

/// A pure text transform applied by [`Action::Patch`].
#[derive(Debug, Clone)]
pub enum TextPatch {
    /// Append a suffix (e.g., style overrides at the end of a stylesheet).
    Append(String),
    /// Regex substitution over the whole file.
    Replace {
        pattern: Regex,
        replacement: String,
    },
}

impl TextPatch {
    /// Appending patch.
    pub fn append(suffix: impl Into<String>) -> Self {
        Self::Append(suffix.into())
    }

    /// Substitution patch. A malformed pattern is a fatal config error.
    pub fn replace(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let re = Regex::new(pattern)
            .map_err(|e| DocpackError::config(format!("bad patch regex {pattern:?}: {e}")))?;
        Ok(Self::Replace {
            pattern: re,
            replacement: replacement.into(),
        })
    }

    /// Apply the transform to the file contents.
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Append(suffix) => {
                let mut out = String::with_capacity(text.len() + suffix.len());
                out.push_str(text);
                out.push_str(suffix);
                out
            }
            Self::Replace {
                pattern,
                replacement,
            } => pattern.replace_all(text, replacement.as_str()).into_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// One routing rule. `action: None` means the matched file is intentionally
/// dropped: not copied, not indexed, absent from output.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Fires when every predicate passes.
    Conditional {
        predicates: Vec<Predicate>,
        action: Option<Action>,
    },
    /// Unconditional fallback; only valid as the last table entry.
    Default { action: Option<Action> },
}

impl Rule {
    /// Conditional rule running `action`.
    pub fn when(predicates: Vec<Predicate>, action: Action) -> Self {
        Self::Conditional {
            predicates,
            action: Some(action),
        }
    }

    /// Conditional rule dropping the file.
    pub fn drop_when(predicates: Vec<Predicate>) -> Self {
        Self::Conditional {
            predicates,
            action: None,
        }
    }

    /// Unconditional fallback rule.
    pub fn fallback(action: Action) -> Self {
        Self::Default {
            action: Some(action),
        }
    }
}

/// Outcome of dispatching one file through the table.
#[derive(Debug)]
pub enum Selection<'a> {
    /// A rule fired and carries an action.
    Run(&'a Action),
    /// A rule fired with a null action; the file is intentionally dropped.
    Drop,
    /// No rule fired and no default is present.
    NoMatch,
}

/// An ordered rule table. Rules are tried strictly in order; the first rule
/// whose full predicate list passes wins.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Validate and build a table.
    ///
    /// A `Default` rule may only appear last, and a `Conditional` rule must
    /// carry at least one predicate — an empty list is not a hidden default.
    pub fn new(rules: Vec<Rule>) -> Result<Self> {
        let last = rules.len().saturating_sub(1);
        for (i, rule) in rules.iter().enumerate() {
            match rule {
                Rule::Default { .. } if i != last => {
                    return Err(DocpackError::config(format!(
                        "default rule at position {i} must be the last entry"
                    )));
                }
                Rule::Conditional { predicates, .. } if predicates.is_empty() => {
                    return Err(DocpackError::config(format!(
                        "conditional rule at position {i} has no predicates; use a default rule"
                    )));
                }
                _ => {}
            }
        }
        Ok(Self { rules })
    }

    /// Route a relative path to its action.
    pub fn select(&self, rel_path: &str) -> Selection<'_> {
        for rule in &self.rules {
            let action = match rule {
                Rule::Conditional { predicates, action } => {
                    if !predicates.iter().all(|p| p.eval(rel_path)) {
                        continue;
                    }
                    action
                }
                Rule::Default { action } => action,
            };

            trace!(rel_path, ?action, "rule matched");
            return match action {
                Some(action) => Selection::Run(action),
                None => Selection::Drop,
            };
        }

        Selection::NoMatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn css_then_copy() -> RuleTable {
        RuleTable::new(vec![
            Rule::when(
                vec![Predicate::matches(r"\.css$").unwrap()],
                Action::Patch(TextPatch::append("/* extra */")),
            ),
            Rule::when(vec![Predicate::matches(".*").unwrap()], Action::Copy),
        ])
        .unwrap()
    }

    #[test]
    fn first_match_wins() {
        let table = css_then_copy();

        match table.select("main.css") {
            Selection::Run(Action::Patch(_)) => {}
            other => panic!("expected patch, got {other:?}"),
        }
        match table.select("other.txt") {
            Selection::Run(Action::Copy) => {}
            other => panic!("expected copy, got {other:?}"),
        }
    }

    #[test]
    fn null_action_drops() {
        let table = RuleTable::new(vec![
            Rule::drop_when(vec![Predicate::matches(r"\.pdf$").unwrap()]),
            Rule::fallback(Action::Copy),
        ])
        .unwrap();

        assert!(matches!(table.select("manual.pdf"), Selection::Drop));
        assert!(matches!(
            table.select("manual.html"),
            Selection::Run(Action::Copy)
        ));
    }

    #[test]
    fn no_match_is_reported_not_fatal() {
        let table =
            RuleTable::new(vec![Rule::when(
                vec![Predicate::matches(r"\.css$").unwrap()],
                Action::Copy,
            )])
            .unwrap();

        assert!(matches!(table.select("readme.txt"), Selection::NoMatch));
    }

    #[test]
    fn default_must_be_last() {
        let err = RuleTable::new(vec![
            Rule::fallback(Action::Copy),
            Rule::when(vec![Predicate::matches(r"\.css$").unwrap()], Action::Copy),
        ])
        .unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn empty_predicate_list_rejected() {
        let err = RuleTable::new(vec![Rule::when(vec![], Action::Copy)]).unwrap_err();
        assert!(err.to_string().contains("no predicates"));
    }

    #[test]
    fn patch_append_and_replace() {
        let appended = TextPatch::append("\nb").apply("a");
        assert_eq!(appended, "a\nb");

        let replaced = TextPatch::replace(r"color: *red", "color: blue")
            .unwrap()
            .apply("h1 { color: red }");
        assert_eq!(replaced, "h1 { color: blue }");
    }
}
