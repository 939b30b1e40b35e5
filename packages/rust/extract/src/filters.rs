//! The filter registry: one declarative table keyed by page kind.
//!
//! Each record pairs a CSS selector with a projector and a marker placement.
//! The `role` field says which consumers a record feeds — the symbol index,
//! the navigation markers, or both — so extraction and injection share a
//! single definition wherever the underlying document shape is identical.
//!
//! Selectors are the CSS rendition of the rendered-doc shapes; note that the
//! HTML parser inserts `<tbody>`, so table rows are matched with a
//! descendant combinator (`table tr`), never `table > tr`.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::scrape::Extracted;

/// Which pipeline stages a filter feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Symbol extraction only.
    Index,
    /// Navigation markers only.
    Toc,
    /// Both consumers; the document shape is shared.
    Both,
}

impl Role {
    pub(crate) fn feeds_index(self) -> bool {
        matches!(self, Role::Index | Role::Both)
    }

    pub(crate) fn feeds_toc(self) -> bool {
        matches!(self, Role::Toc | Role::Both)
    }
}

/// Where the navigation marker is inserted relative to the matched node.
#[derive(Debug, Clone, Copy)]
pub enum Placement {
    /// Immediately before the matched node.
    Matched,
    /// Immediately before the node's first `<code>` descendant, so the
    /// marker sits adjacent to the rendered identifier rather than its
    /// containing table cell.
    ChildCode,
}

/// Maps a matched node to an [`Extracted`] record.
#[derive(Debug, Clone, Copy)]
pub enum Projector {
    /// Split the node's `id` attribute on `.`: `method.new` → kind
    /// `method`, name `new`. `anchored` records the full id as the anchor.
    IdParts { anchored: bool },
    /// The node's text with a fixed kind and no anchor.
    Text(&'static str),
    /// The identifier before the first `:` in the node's text (statics
    /// tables render `static NAME: Type`), with a fixed kind.
    IdentBeforeColon(&'static str),
}

/// ` NAME:` inside a rendered static declaration.
static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ([A-Za-z0-9_]+):").expect("ident regex"));

/// A compiled registry record.
pub struct Filter {
    selector: Selector,
    projector: Projector,
    placement: Placement,
    role: Role,
}

impl Filter {
    fn new(selector: &str, projector: Projector, placement: Placement, role: Role) -> Self {
        Self {
            selector: Selector::parse(selector).expect("filter selector"),
            projector,
            placement,
            role,
        }
    }

    /// The compiled node selector.
    pub(crate) fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Which consumers this record feeds.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Marker placement override.
    pub(crate) fn placement(&self) -> Placement {
        self.placement
    }

    /// Run the projector against a matched element. `None` means the node
    /// carries no usable identity (e.g. a malformed `id`) and is skipped.
    pub(crate) fn project(&self, el: ElementRef<'_>) -> Option<Extracted> {
        match self.projector {
            Projector::IdParts { anchored } => {
                let id = el.value().attr("id")?;
                let (kind, name) = id.split_once('.')?;
                Some(Extracted {
                    name: name.to_string(),
                    kind: kind.to_string(),
                    anchor: anchored.then(|| id.to_string()),
                })
            }
            Projector::Text(kind) => Some(Extracted {
                name: el.text().collect::<String>().trim().to_string(),
                kind: kind.to_string(),
                anchor: None,
            }),
            Projector::IdentBeforeColon(kind) => {
                let text: String = el.text().collect();
                let name = IDENT_RE
                    .captures(&text)
                    .map(|caps| caps[1].to_string())
                    .unwrap_or_default();
                Some(Extracted {
                    name,
                    kind: kind.to_string(),
                    anchor: None,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Methods carry their anchor in the `id` attribute.
fn method_filter() -> Filter {
    Filter::new(
        ".method",
        Projector::IdParts { anchored: true },
        Placement::Matched,
        Role::Both,
    )
}

/// Field rows: first cell of every table following the fields heading.
fn fields_filter() -> Filter {
    Filter::new(
        ".fields ~ table tr > td:first-child",
        Projector::IdParts { anchored: false },
        Placement::ChildCode,
        Role::Both,
    )
}

/// Variant rows: first cell of the table adjacent to the variants heading.
fn variants_filter() -> Filter {
    Filter::new(
        ".variants + table tr > td:first-child",
        Projector::IdParts { anchored: false },
        Placement::ChildCode,
        Role::Both,
    )
}

/// Module-page link list with a fixed kind (navigation only).
fn link_filter(class: &'static str) -> Filter {
    Filter::new(
        &format!("a.{class}"),
        Projector::Text(class),
        Placement::Matched,
        Role::Toc,
    )
}

fn statics_filter() -> Filter {
    Filter::new(
        "#statics + table tr > td > code:first-of-type",
        Projector::IdentBeforeColon("static"),
        Placement::Matched,
        Role::Toc,
    )
}

fn modules_filter() -> Filter {
    Filter::new(
        "#modules + table tr > td > a.mod",
        Projector::Text("mod"),
        Placement::Matched,
        Role::Toc,
    )
}

fn primitives_filter() -> Filter {
    Filter::new(
        "#primitives + table tr > td > a.primitive",
        Projector::Text("primitive"),
        Placement::Matched,
        Role::Toc,
    )
}

fn guide_title_filter() -> Filter {
    Filter::new(
        "h1.title",
        Projector::Text("gd"),
        Placement::Matched,
        Role::Index,
    )
}

static REGISTRY: LazyLock<HashMap<&'static str, Vec<Filter>>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    table.insert("struct", vec![method_filter(), fields_filter()]);
    table.insert("trait", vec![method_filter()]);
    table.insert("primitive", vec![method_filter()]);
    table.insert("type", vec![method_filter(), variants_filter()]);
    table.insert("enum", vec![method_filter(), variants_filter()]);
    table.insert(
        "mod",
        vec![
            link_filter("fn"),
            statics_filter(),
            modules_filter(),
            link_filter("struct"),
            link_filter("trait"),
            primitives_filter(),
        ],
    );
    table.insert("gd", vec![guide_title_filter()]);
    table
});

/// The ordered filter list for a page kind. A kind with no entry yields the
/// empty list: the page passes through untouched.
pub fn filters_for(kind: &str) -> &'static [Filter] {
    REGISTRY.get(kind).map(Vec::as_slice).unwrap_or(&[])
}
