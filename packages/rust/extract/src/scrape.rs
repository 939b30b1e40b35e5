//! Symbol extraction: run the index-role filters for a page kind over a
//! parsed document, in filter order, nodes in document order.

use scraper::Html;

use crate::filters::filters_for;

/// One extracted child declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// The child's own name (unqualified).
    pub name: String,
    /// Raw kind tag (`"method"`, `"variant"`, …).
    pub kind: String,
    /// In-page anchor, when the document shape provides one.
    pub anchor: Option<String>,
}

/// Extract the child declarations of a page of the given kind.
///
/// Results concatenate across filters in list order — e.g. methods before
/// fields — preserving document order within each filter. A kind with no
/// registered filters yields nothing.
pub fn child_decls(doc: &Html, kind: &str) -> Vec<Extracted> {
    filters_for(kind)
        .iter()
        .filter(|f| f.role().feeds_index())
        .flat_map(|f| {
            doc.select(f.selector())
                .filter_map(|el| f.project(el))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// The top heading of a guide page, if any.
pub fn guide_title(doc: &Html) -> Option<String> {
    child_decls(doc, "gd")
        .into_iter()
        .map(|e| e.name)
        .find(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRUCT_PAGE: &str = r#"
<html><body>
<h1>Struct Foo</h1>
<h4 class="method" id="method.new"><code>fn new() -> Foo</code></h4>
<h4 class="method" id="method.len"><code>fn len(&self) -> uint</code></h4>
<h2 class="fields">Fields</h2>
<table>
  <tr><td id="structfield.cap"><code>cap</code></td><td>capacity</td></tr>
</table>
</body></html>
"#;

    const ENUM_PAGE: &str = r#"
<html><body>
<h2 class="variants">Variants</h2>
<table>
  <tr><td id="variant.Some"><code>Some</code></td><td></td></tr>
  <tr><td id="variant.None"><code>None</code></td><td></td></tr>
</table>
</body></html>
"#;

    #[test]
    fn struct_methods_then_fields() {
        let doc = Html::parse_document(STRUCT_PAGE);
        let children = child_decls(&doc, "struct");

        assert_eq!(children.len(), 3);
        assert_eq!(
            children[0],
            Extracted {
                name: "new".into(),
                kind: "method".into(),
                anchor: Some("method.new".into()),
            }
        );
        assert_eq!(children[1].name, "len");
        assert_eq!(
            children[2],
            Extracted {
                name: "cap".into(),
                kind: "structfield".into(),
                anchor: None,
            }
        );
    }

    #[test]
    fn type_page_with_variants() {
        let doc = Html::parse_document(ENUM_PAGE);
        let children = child_decls(&doc, "type");

        assert_eq!(children.len(), 2);
        assert_eq!(children[0].kind, "variant");
        assert_eq!(children[0].name, "Some");
        assert_eq!(children[1].name, "None");
    }

    #[test]
    fn type_page_without_children() {
        let doc = Html::parse_document("<html><body><p>alias</p></body></html>");
        assert!(child_decls(&doc, "type").is_empty());
    }

    #[test]
    fn unregistered_kind_extracts_nothing() {
        let doc = Html::parse_document(STRUCT_PAGE);
        assert!(child_decls(&doc, "macro").is_empty());
    }

    #[test]
    fn malformed_ids_are_skipped() {
        let doc = Html::parse_document(
            r#"<html><body><h4 class="method" id="broken"><code>x</code></h4></body></html>"#,
        );
        assert!(child_decls(&doc, "struct").is_empty());
    }

    #[test]
    fn guide_title_from_heading() {
        let doc =
            Html::parse_document(r#"<html><body><h1 class="title">Intro</h1></body></html>"#);
        assert_eq!(guide_title(&doc).as_deref(), Some("Intro"));

        let doc = Html::parse_document("<html><body><h1>Untitled page</h1></body></html>");
        assert_eq!(guide_title(&doc), None);
    }
}
