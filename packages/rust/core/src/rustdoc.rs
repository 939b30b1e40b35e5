//! The rustdoc docset flavor: default rule table, stylesheet overrides,
//! and the raw-kind → display-kind table.
//!
//! Another flavor can supply its own table and map through
//! [`crate::BuildRequest`]; nothing here is consulted implicitly.

use docpack_rules::{Action, Predicate, Rule, RuleTable, TextPatch};
use docpack_shared::{KindMap, Result};

/// Style overrides appended to the rendered docs' main stylesheet so pages
/// read well inside the documentation browser.
pub const CSS_PATCH: &str = "
/* docset overrides */

.sidebar, .sub { display: none; }
.content { margin-left: 0; }
";

/// Display-kind table for rustdoc trees.
pub fn kind_map() -> KindMap {
    KindMap::from_pairs([
        ("gd", "Guide"),
        ("fn", "Function"),
        ("trait", "Trait"),
        ("struct", "Struct"),
        ("structfield", "Field"),
        ("mod", "Module"),
        ("type", "Type"),
        ("static", "Constant"),
        ("macro", "Macro"),
        ("primitive", "Type"),
        ("ffi", "Function"),
        ("ffs", "Constant"),
        ("method", "Method"),
        ("tymethod", "Method"),
        ("field", "Field"),
        ("variant", "Variant"),
        ("enum", "Enum"),
    ])
}

/// The default routing table for a rustdoc tree:
///
/// 1. `main.css` gets the style overrides appended
/// 2. book exports (`epub`/`tex`/`pdf`) are dropped
/// 3. `src/` listings are copied verbatim, never extracted
/// 4. `stability.html` is copied, not treated as a declaration
/// 5. every other HTML page is transformed (classified, extracted,
///    marker-injected)
/// 6. everything else is copied
pub fn default_rules() -> Result<RuleTable> {
    RuleTable::new(vec![
        Rule::when(
            vec![Predicate::matches(r"main\.css$")?],
            Action::Patch(TextPatch::append(CSS_PATCH)),
        ),
        Rule::drop_when(vec![Predicate::matches(r"\.(epub|tex|pdf)$")?]),
        Rule::when(vec![Predicate::starts_with("src")], Action::Copy),
        Rule::when(vec![Predicate::matches(r"stability\.html$")?], Action::Copy),
        Rule::when(vec![Predicate::matches(r"\.html$")?], Action::Transform),
        Rule::fallback(Action::Copy),
    ])
}
