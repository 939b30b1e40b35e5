//! Navigation-marker injection.
//!
//! Runs the toc-role filters for a page kind against the parsed tree and
//! inserts an invisible anchor element before every placement node, so the
//! documentation browser can build a jump list without re-parsing page
//! content.

use std::sync::LazyLock;

use ego_tree::NodeId;
use scraper::{Html, Node, Selector};
use tracing::trace;

use docpack_shared::KindMap;

use crate::filters::{Placement, filters_for};

/// Class carried by every injected marker.
pub const MARKER_CLASS: &str = "dashAnchor";

static CODE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("code").expect("code selector"));

static MARKER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("marker selector"));

/// Inject navigation markers for `kind` into `doc`. Returns whether the
/// tree was modified; an unmodified page must be copied byte-for-byte
/// rather than re-serialized.
pub fn inject_markers(doc: &mut Html, kind: &str, kinds: &KindMap) -> bool {
    // Plan first over an immutable borrow, then mutate. Node ids stay
    // valid across insertions.
    let mut plan: Vec<(NodeId, String)> = Vec::new();

    for filter in filters_for(kind).iter().filter(|f| f.role().feeds_toc()) {
        for el in doc.select(filter.selector()) {
            let Some(extracted) = filter.project(el) else {
                continue;
            };

            let display = kinds.display_or_raw(&extracted.kind);
            let reference = format!("//apple_ref/cpp/{display}/{}", extracted.name);

            let target = match filter.placement() {
                Placement::Matched => el.id(),
                Placement::ChildCode => el
                    .select(&CODE_SEL)
                    .next()
                    .map(|code| code.id())
                    .unwrap_or_else(|| el.id()),
            };

            plan.push((target, reference));
        }
    }

    if plan.is_empty() {
        return false;
    }

    trace!(kind, markers = plan.len(), "injecting navigation markers");

    for (target, reference) in plan {
        let Some(marker) = marker_node(&reference) else {
            continue;
        };
        if let Some(mut node) = doc.tree.get_mut(target) {
            node.insert_before(marker);
        }
    }

    true
}

/// Build the marker element by parsing a fragment and lifting its node out.
fn marker_node(reference: &str) -> Option<Node> {
    let fragment = Html::parse_fragment(&format!(
        r#"<a class="{MARKER_CLASS}" name="{}"></a>"#,
        escape_attr(reference)
    ));
    let el = fragment.select(&MARKER_SEL).next()?;
    Some(Node::Element(el.value().clone()))
}

/// Minimal attribute-value escaping.
fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rustdoc_kinds() -> KindMap {
        KindMap::from_pairs([
            ("method", "Method"),
            ("structfield", "Field"),
            ("variant", "Variant"),
            ("fn", "Function"),
            ("static", "Constant"),
            ("mod", "Module"),
        ])
    }

    const STRUCT_PAGE: &str = r#"
<html><body>
<h4 class="method" id="method.new"><code>fn new() -> Foo</code></h4>
<h2 class="fields">Fields</h2>
<table>
  <tr><td id="structfield.cap"><code>cap</code></td><td>capacity</td></tr>
</table>
</body></html>
"#;

    #[test]
    fn struct_page_gets_method_and_field_markers() {
        let mut doc = Html::parse_document(STRUCT_PAGE);
        assert!(inject_markers(&mut doc, "struct", &rustdoc_kinds()));

        let marker_sel = Selector::parse("a.dashAnchor").unwrap();
        let names: Vec<_> = doc
            .select(&marker_sel)
            .filter_map(|el| el.value().attr("name").map(str::to_string))
            .collect();
        assert_eq!(
            names,
            vec![
                "//apple_ref/cpp/Method/new".to_string(),
                "//apple_ref/cpp/Field/cap".to_string(),
            ]
        );
    }

    #[test]
    fn field_marker_sits_before_the_code_element() {
        let mut doc = Html::parse_document(STRUCT_PAGE);
        inject_markers(&mut doc, "struct", &rustdoc_kinds());

        // Placement override: the field marker lands inside the table
        // cell, adjacent to the rendered identifier.
        let in_cell = Selector::parse("td > a.dashAnchor").unwrap();
        assert_eq!(doc.select(&in_cell).count(), 1);

        let html = doc.root_element().html();
        let marker_at = html.find("//apple_ref/cpp/Field/cap").unwrap();
        let code_at = html.find("<code>cap</code>").unwrap();
        assert!(marker_at < code_at);
    }

    #[test]
    fn method_marker_precedes_the_heading() {
        let mut doc = Html::parse_document(STRUCT_PAGE);
        inject_markers(&mut doc, "struct", &rustdoc_kinds());

        let html = doc.root_element().html();
        let marker_at = html.find("//apple_ref/cpp/Method/new").unwrap();
        let heading_at = html.find(r#"<h4 class="method""#).unwrap();
        assert!(marker_at < heading_at);
    }

    #[test]
    fn module_page_link_lists() {
        let page = r#"
<html><body>
<h2 id="functions">Functions</h2>
<table><tr><td><a class="fn" href="fn.min.html">min</a></td></tr></table>
<h2 id="statics">Statics</h2>
<table><tr><td><code>static MAX: uint</code></td><td></td></tr></table>
<h2 id="modules">Modules</h2>
<table><tr><td><a class="mod" href="io/index.html">io</a></td></tr></table>
</body></html>
"#;
        let mut doc = Html::parse_document(page);
        assert!(inject_markers(&mut doc, "mod", &rustdoc_kinds()));

        let html = doc.root_element().html();
        assert!(html.contains("//apple_ref/cpp/Function/min"));
        assert!(html.contains("//apple_ref/cpp/Constant/MAX"));
        assert!(html.contains("//apple_ref/cpp/Module/io"));
    }

    #[test]
    fn unmapped_kind_falls_back_to_raw_string() {
        let page = r#"<html><body><h4 class="method" id="oddity.x"><code>x</code></h4></body></html>"#;
        let mut doc = Html::parse_document(page);
        assert!(inject_markers(&mut doc, "struct", &rustdoc_kinds()));

        let html = doc.root_element().html();
        assert!(html.contains("//apple_ref/cpp/oddity/x"));
    }

    #[test]
    fn no_matches_means_not_modified() {
        let mut doc = Html::parse_document("<html><body><p>nothing here</p></body></html>");
        assert!(!inject_markers(&mut doc, "struct", &rustdoc_kinds()));
        // Guides never receive markers: the guide filter is index-only.
        assert!(!inject_markers(
            &mut Html::parse_document(r#"<html><body><h1 class="title">T</h1></body></html>"#),
            "gd",
            &rustdoc_kinds()
        ));
    }

    #[test]
    fn attr_escaping() {
        assert_eq!(escape_attr(r#"a<b>"c"&d"#), "a&lt;b&gt;&quot;c&quot;&amp;d");
    }
}
