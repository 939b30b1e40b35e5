//! Core domain types for docpack docsets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// KindMap
// ---------------------------------------------------------------------------

/// Maps raw symbol kinds (`"fn"`, `"mod"`, `"struct"`, …) to the display
/// kinds the documentation browser understands (`"Function"`, `"Module"`, …).
///
/// The set of display-kind strings is an external contract; a map is built
/// per docset flavor and threaded through the build rather than held as
/// global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindMap {
    map: BTreeMap<String, String>,
}

impl KindMap {
    /// Build a map from `(raw, display)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            map: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up the display kind for a raw kind.
    pub fn display_kind(&self, raw: &str) -> Option<&str> {
        self.map.get(raw).map(String::as_str)
    }

    /// Display kind with fallback to the raw string, for navigation markers.
    pub fn display_or_raw<'a>(&'a self, raw: &'a str) -> &'a str {
        self.display_kind(raw).unwrap_or(raw)
    }

    /// Merge `overrides` on top of this map, replacing existing entries.
    pub fn merged(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (k, v) in overrides {
            self.map.insert(k.clone(), v.clone());
        }
        self
    }

    /// Number of mapped kinds.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

// ---------------------------------------------------------------------------
// TitleMap
// ---------------------------------------------------------------------------

/// Display-name overrides for guide pages.
///
/// Rendered guide headings are often verbose ("The Frobnicator Reference
/// Manual"); the override table shortens them for the browser's jump list.
#[derive(Debug, Clone, Default)]
pub struct TitleMap {
    overrides: BTreeMap<String, String>,
}

impl TitleMap {
    /// Build from an override table.
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Resolve a raw heading to its display title.
    pub fn display<'a>(&'a self, raw: &'a str) -> &'a str {
        self.overrides.get(raw).map(String::as_str).unwrap_or(raw)
    }
}

// ---------------------------------------------------------------------------
// DocsetInfo
// ---------------------------------------------------------------------------

/// Identity of the docset being produced, rendered into `Info.plist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsetInfo {
    /// Bundle name, also the `<name>.docset` directory stem.
    pub name: String,
    /// Reverse-DNS-ish bundle identifier.
    pub bundle_id: String,
    /// Docset version string.
    pub version: String,
    /// Landing page within the documents tree.
    pub index_file: String,
    /// Platform family tag for the browser's keyword grouping.
    pub platform_family: String,
}
