//! Page classification from the path relative to the documentation root.

use docpack_shared::{DocpackError, Result};

/// Module-page stems. `lib.html` is the crate root in older doc trees.
const MODULE_STEMS: [&str; 3] = ["index", "mod", "lib"];

/// What a documentation page documents, derived from its relative path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// A prose page directly at the tree root.
    Guide,
    /// An `index.html`/`mod.html`/`lib.html` module listing.
    Module,
    /// A `<kind>.<identifier>.html` declaration page.
    Declaration { kind: String, name: String },
}

impl PageKind {
    /// Classify a `/`-separated relative path.
    ///
    /// Files at the root are guides regardless of name. A declaration stem
    /// that does not split into exactly kind + name is a naming error; the
    /// caller logs it and copies the file without recording a symbol.
    pub fn classify(rel_path: &str) -> Result<PageKind> {
        let (dir, file_name) = match rel_path.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", rel_path),
        };

        if dir.is_empty() {
            return Ok(PageKind::Guide);
        }

        let stem = match file_name.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => file_name,
        };

        if MODULE_STEMS.contains(&stem) {
            return Ok(PageKind::Module);
        }

        let parts: Vec<&str> = stem.split('.').collect();
        match parts.as_slice() {
            [kind, name] => Ok(PageKind::Declaration {
                kind: (*kind).to_string(),
                name: (*name).to_string(),
            }),
            _ => Err(DocpackError::naming(format!(
                "declaration stem {stem:?} in {rel_path:?} does not split into kind + name"
            ))),
        }
    }
}

/// The directory portion of a relative path as a `::`-joined module prefix.
/// Empty at the tree root — the root module's name is the empty string.
pub fn fqn_prefix(rel_path: &str) -> String {
    match rel_path.rsplit_once('/') {
        Some((dir, _)) => dir.replace('/', "::"),
        None => String::new(),
    }
}

/// A child's fully qualified name under `prefix`.
pub fn make_fqn(prefix: &str, name: &str) -> String {
    format!("{prefix}::{name}")
}
