//! The build orchestrator: walk the source tree, dispatch every file
//! through the rule table, flush the symbol index exactly once.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, instrument, trace, warn};
use walkdir::WalkDir;

use docpack_rules::{RuleTable, Selection};
use docpack_shared::{DocpackError, DocsetInfo, KindMap, Result, TitleMap};
use docpack_storage::SymbolIndex;

use crate::actions::{self, FileContext, TransformEnv};
use crate::layout::DocsetLayout;
use crate::plist;

/// Inputs for one build over a plain destination tree.
pub struct BuildRequest<'r> {
    /// Root of the rendered documentation to package.
    pub source_root: PathBuf,
    /// Root of the mirrored output tree.
    pub dest_root: PathBuf,
    /// Location of the persisted symbol index.
    pub index_path: PathBuf,
    /// The routing table.
    pub rules: &'r RuleTable,
    /// Raw-kind → display-kind mapping.
    pub kinds: KindMap,
    /// Guide display-name overrides.
    pub titles: TitleMap,
}

/// Result of one build.
#[derive(Debug)]
pub struct BuildSummary {
    /// Symbols written to the index.
    pub symbols: usize,
    /// Files routed to an action.
    pub files_processed: usize,
    /// Files dropped by rule or left unrouted.
    pub files_dropped: usize,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting build status.
pub trait BuildProgress: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after a file is routed and its action has run.
    fn file_processed(&self, rel_path: &str, current: usize);
    /// Called when the build completes.
    fn done(&self, summary: &BuildSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl BuildProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn file_processed(&self, _rel_path: &str, _current: usize) {}
    fn done(&self, _summary: &BuildSummary) {}
}

/// Run one full build: fresh index, full walk, single flush.
///
/// Per-file failures are isolated: a recoverable error logs a warning and
/// the file is copied verbatim as a fallback. Storage and configuration
/// errors abort the build.
#[instrument(skip_all, fields(source = %request.source_root.display()))]
pub async fn build(
    request: &BuildRequest<'_>,
    progress: &dyn BuildProgress,
) -> Result<BuildSummary> {
    let start = Instant::now();

    progress.phase("Preparing symbol index");
    let mut index = SymbolIndex::create(&request.index_path, request.kinds.clone()).await?;

    let env = TransformEnv {
        kinds: &request.kinds,
        titles: &request.titles,
    };

    progress.phase("Processing documentation tree");
    let mut processed = 0usize;
    let mut dropped = 0usize;

    for entry in WalkDir::new(&request.source_root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "walk error, skipping entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(&request.source_root) else {
            continue;
        };
        let rel_str = rel
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");

        match request.rules.select(&rel_str) {
            Selection::Drop => {
                trace!(rel_path = %rel_str, "dropped by rule");
                dropped += 1;
            }
            Selection::NoMatch => {
                debug!(rel_path = %rel_str, "no rule matched, skipping");
                dropped += 1;
            }
            Selection::Run(action) => {
                let dest_path = request.dest_root.join(rel);
                if let Some(parent) = dest_path.parent() {
                    if let Err(err) = std::fs::create_dir_all(parent) {
                        warn!(rel_path = %rel_str, %err, "cannot create destination directory");
                        dropped += 1;
                        continue;
                    }
                }

                let mut ctx =
                    FileContext::new(entry.path().to_path_buf(), dest_path, rel_str.clone());

                if let Err(err) = actions::run_action(action, &mut ctx, &mut index, &env) {
                    if err.is_fatal() {
                        return Err(err);
                    }
                    warn!(rel_path = %rel_str, %err, "action failed, copying verbatim");
                    if let Err(copy_err) = std::fs::copy(&ctx.src_path, &ctx.dest_path) {
                        warn!(rel_path = %rel_str, %copy_err, "fallback copy failed");
                    }
                }

                processed += 1;
                progress.file_processed(&rel_str, processed);
            }
        }
    }

    progress.phase("Writing symbol index");
    let symbols = index.flush().await?;

    let summary = BuildSummary {
        symbols,
        files_processed: processed,
        files_dropped: dropped,
        elapsed: start.elapsed(),
    };
    progress.done(&summary);

    info!(
        symbols = summary.symbols,
        files = summary.files_processed,
        dropped = summary.files_dropped,
        elapsed_ms = summary.elapsed.as_millis(),
        "build complete"
    );

    Ok(summary)
}

// ---------------------------------------------------------------------------
// Docset scaffolding
// ---------------------------------------------------------------------------

/// Inputs for a full docset build.
pub struct DocsetRequest<'r> {
    /// Docset identity, rendered into `Info.plist`.
    pub info: DocsetInfo,
    /// Optional icon file copied to the bundle root.
    pub icon: Option<PathBuf>,
    /// Root of the rendered documentation.
    pub source_root: PathBuf,
    /// Directory receiving `<name>.docset`.
    pub out_dir: PathBuf,
    /// The routing table.
    pub rules: &'r RuleTable,
    /// Raw-kind → display-kind mapping.
    pub kinds: KindMap,
    /// Guide display-name overrides.
    pub titles: TitleMap,
}

/// Result of a docset build.
#[derive(Debug)]
pub struct DocsetSummary {
    /// Path of the produced `<name>.docset` bundle.
    pub docset_path: PathBuf,
    /// The inner build result.
    pub build: BuildSummary,
}

/// Scaffold the `<name>.docset` layout, write `Info.plist`, copy the icon,
/// and run the build with the index at `Resources/docSet.dsidx`.
pub async fn build_docset(
    request: DocsetRequest<'_>,
    progress: &dyn BuildProgress,
) -> Result<DocsetSummary> {
    progress.phase("Scaffolding docset bundle");

    let docset = DocsetLayout::new(&request.info.name, &request.out_dir);
    let documents_dir = docset.documents_dir();
    std::fs::create_dir_all(&documents_dir).map_err(|e| DocpackError::io(&documents_dir, e))?;

    let plist_path = docset.plist_path();
    std::fs::write(&plist_path, plist::info_plist(&request.info))
        .map_err(|e| DocpackError::io(&plist_path, e))?;

    if let Some(icon) = &request.icon {
        if icon.exists() {
            let target = docset.root_dir().join("icon.png");
            std::fs::copy(icon, &target).map_err(|e| DocpackError::io(icon, e))?;
        } else {
            warn!(icon = %icon.display(), "icon file not found, skipping");
        }
    }

    let build_request = BuildRequest {
        source_root: request.source_root,
        dest_root: documents_dir,
        index_path: docset.index_path(),
        rules: request.rules,
        kinds: request.kinds,
        titles: request.titles,
    };

    let summary = build(&build_request, progress).await?;

    Ok(DocsetSummary {
        docset_path: docset.root_dir().to_path_buf(),
        build: summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rustdoc;
    use std::path::Path;

    /// Lay out a small documentation tree covering every routing case.
    fn write_source_tree(root: &Path) {
        let files: &[(&str, &str)] = &[
            (
                "index.html",
                r#"<!DOCTYPE html><html><body><h1 class="title">Intro</h1></body></html>"#,
            ),
            ("main.css", "body { }\n"),
            ("manual.pdf", "%PDF-1.4 not really"),
            (
                "src/lib.rs.html",
                r#"<html><body><h1 class="title">source listing</h1></body></html>"#,
            ),
            (
                "foo/index.html",
                "<html><body><p>module foo</p></body></html>",
            ),
            (
                "foo/bar/struct.Baz.html",
                r#"<html><body>
<h4 class="method" id="method.new"><code>fn new()</code></h4>
<h2 class="fields">Fields</h2>
<table><tr><td id="structfield.cap"><code>cap</code></td></tr></table>
</body></html>"#,
            ),
            (
                "foo/type.Alias.html",
                "<html><body><p>alias page</p></body></html>",
            ),
            ("LICENSE.txt", "do what you like\n"),
        ];

        for (rel, contents) in files {
            let path = root.join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, contents).unwrap();
        }
    }

    fn find(rows: &[docpack_storage::Symbol], name: &str) -> (String, String) {
        let row = rows
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("no row named {name:?}"));
        (row.kind.clone(), row.path.clone())
    }

    #[tokio::test]
    async fn end_to_end_build() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc");
        let dest = dir.path().join("out");
        let index_path = dir.path().join("docSet.dsidx");
        write_source_tree(&source);

        let rules = rustdoc::default_rules().unwrap();
        let request = BuildRequest {
            source_root: source.clone(),
            dest_root: dest.clone(),
            index_path: index_path.clone(),
            rules: &rules,
            kinds: rustdoc::kind_map(),
            titles: TitleMap::default(),
        };

        let summary = build(&request, &SilentProgress).await.unwrap();

        // index.html guide + foo module + Baz + 2 children + Alias
        assert_eq!(summary.symbols, 6);
        // The pdf was dropped by rule.
        assert_eq!(summary.files_dropped, 1);
        assert!(!dest.join("manual.pdf").exists());

        let rows = SymbolIndex::read_all(&index_path).await.unwrap();
        assert_eq!(rows.len(), 6);

        assert_eq!(find(&rows, "Intro"), ("Guide".into(), "index.html".into()));
        assert_eq!(find(&rows, "foo"), ("Module".into(), "foo/index.html".into()));
        assert_eq!(
            find(&rows, "foo::bar::Baz"),
            ("Struct".into(), "foo/bar/struct.Baz.html".into())
        );
        assert_eq!(
            find(&rows, "foo::bar::Baz::new"),
            (
                "Method".into(),
                "foo/bar/struct.Baz.html#method.new".into()
            )
        );
        assert_eq!(
            find(&rows, "foo::bar::Baz::cap"),
            ("Field".into(), "foo/bar/struct.Baz.html".into())
        );
        // No children, so the alias kept its kind.
        assert_eq!(
            find(&rows, "foo::Alias"),
            ("Type".into(), "foo/type.Alias.html".into())
        );

        // The guide was copied byte-for-byte, with no markers.
        let guide = std::fs::read_to_string(dest.join("index.html")).unwrap();
        assert_eq!(
            guide,
            std::fs::read_to_string(source.join("index.html")).unwrap()
        );
        assert!(!guide.contains("dashAnchor"));

        // The struct page was re-serialized with markers.
        let baz = std::fs::read_to_string(dest.join("foo/bar/struct.Baz.html")).unwrap();
        assert!(baz.contains("//apple_ref/cpp/Method/new"));

        // src pages are copied verbatim and never indexed.
        assert!(dest.join("src/lib.rs.html").exists());
        assert!(!rows.iter().any(|r| r.name == "source listing"));

        // The stylesheet was patched.
        let css = std::fs::read_to_string(dest.join("main.css")).unwrap();
        assert!(css.starts_with("body { }"));
        assert!(css.contains("display: none"));

        // The default rule copied the stray text file.
        assert!(dest.join("LICENSE.txt").exists());
    }

    #[tokio::test]
    async fn docset_scaffolding() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc");
        write_source_tree(&source);

        let rules = rustdoc::default_rules().unwrap();
        let request = DocsetRequest {
            info: DocsetInfo {
                name: "Demo".into(),
                bundle_id: "demo".into(),
                version: "0.1".into(),
                index_file: "index.html".into(),
                platform_family: "rust".into(),
            },
            icon: None,
            source_root: source,
            out_dir: dir.path().join("out"),
            rules: &rules,
            kinds: rustdoc::kind_map(),
            titles: TitleMap::default(),
        };

        let summary = build_docset(request, &SilentProgress).await.unwrap();
        let root = &summary.docset_path;

        assert!(root.ends_with("Demo.docset"));
        assert!(root.join("Contents/Info.plist").exists());
        assert!(root.join("Contents/Resources/docSet.dsidx").exists());
        assert!(
            root.join("Contents/Resources/Documents/index.html")
                .exists()
        );
        assert_eq!(summary.build.symbols, 6);

        let plist = std::fs::read_to_string(root.join("Contents/Info.plist")).unwrap();
        assert!(plist.contains("<string>demo</string>"));
    }

    #[tokio::test]
    async fn guide_title_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("doc");
        std::fs::create_dir_all(&source).unwrap();
        std::fs::write(
            source.join("tutorial.html"),
            r#"<html><body><h1 class="title">The Demo Language Tutorial</h1></body></html>"#,
        )
        .unwrap();

        let mut overrides = std::collections::BTreeMap::new();
        overrides.insert(
            "The Demo Language Tutorial".to_string(),
            "Tutorial".to_string(),
        );

        let rules = rustdoc::default_rules().unwrap();
        let request = BuildRequest {
            source_root: source,
            dest_root: dir.path().join("out"),
            index_path: dir.path().join("docSet.dsidx"),
            rules: &rules,
            kinds: rustdoc::kind_map(),
            titles: TitleMap::new(overrides),
        };

        build(&request, &SilentProgress).await.unwrap();

        let rows = SymbolIndex::read_all(&dir.path().join("docSet.dsidx"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Tutorial");
    }
}
