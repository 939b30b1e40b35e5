//! The action layer: copy, patch, and transform, executed against one file.

use std::path::PathBuf;

use scraper::Html;
use tracing::warn;

use docpack_extract::page::{self, PageKind};
use docpack_extract::{child_decls, guide_title, inject_markers};
use docpack_rules::{Action, TextPatch};
use docpack_shared::{DocpackError, KindMap, Result, TitleMap};
use docpack_storage::SymbolIndex;

/// Per-file transient state.
pub struct FileContext {
    /// Absolute source path.
    pub src_path: PathBuf,
    /// Mirrored destination path.
    pub dest_path: PathBuf,
    /// `/`-separated path relative to the source root.
    pub rel_path: String,
    /// Parsed document, populated at most once per file.
    doc: Option<Html>,
    /// Whether the parsed tree was mutated and must be re-serialized.
    modified: bool,
}

impl FileContext {
    pub fn new(src_path: PathBuf, dest_path: PathBuf, rel_path: String) -> Self {
        Self {
            src_path,
            dest_path,
            rel_path,
            doc: None,
            modified: false,
        }
    }

    /// The cached parsed document, parsing on first access. A file that
    /// cannot be read as text is a parse error (recoverable: the caller
    /// falls back to a verbatim copy).
    fn document(&mut self) -> Result<&mut Html> {
        if self.doc.is_none() {
            let text = std::fs::read_to_string(&self.src_path).map_err(|e| {
                DocpackError::parse(format!("cannot read {}: {e}", self.src_path.display()))
            })?;
            self.doc = Some(Html::parse_document(&text));
        }
        Ok(self.doc.as_mut().expect("document cache populated"))
    }
}

/// Shared lookup tables threaded through a transform.
pub struct TransformEnv<'a> {
    pub kinds: &'a KindMap,
    pub titles: &'a TitleMap,
}

/// Execute `action` for one file. The destination's parent directory
/// already exists.
pub fn run_action(
    action: &Action,
    ctx: &mut FileContext,
    index: &mut SymbolIndex,
    env: &TransformEnv<'_>,
) -> Result<()> {
    match action {
        Action::Copy => copy_file(ctx),
        Action::Patch(patch) => patch_file(patch, ctx),
        Action::Transform => transform(ctx, index, env),
    }
}

/// Byte-for-byte duplicate, permissions preserved.
fn copy_file(ctx: &FileContext) -> Result<()> {
    std::fs::copy(&ctx.src_path, &ctx.dest_path)
        .map_err(|e| DocpackError::io(&ctx.src_path, e))?;
    Ok(())
}

/// Read as text, apply the patch, write the result.
fn patch_file(patch: &TextPatch, ctx: &FileContext) -> Result<()> {
    let text = std::fs::read_to_string(&ctx.src_path)
        .map_err(|e| DocpackError::io(&ctx.src_path, e))?;
    std::fs::write(&ctx.dest_path, patch.apply(&text))
        .map_err(|e| DocpackError::io(&ctx.dest_path, e))?;
    Ok(())
}

/// Parse the page, extract symbols into the index, inject navigation
/// markers, then serialize-if-modified-else-copy.
///
/// Failure handling follows the per-file contract: a naming error skips
/// symbol extraction, a parse error skips the whole transform; both still
/// copy the file verbatim.
fn transform(
    ctx: &mut FileContext,
    index: &mut SymbolIndex,
    env: &TransformEnv<'_>,
) -> Result<()> {
    let result = match PageKind::classify(&ctx.rel_path) {
        Ok(PageKind::Guide) => add_guide(ctx, index, env),
        Ok(PageKind::Module) => add_module(ctx, index, env),
        Ok(PageKind::Declaration { kind, name }) => {
            add_declaration(ctx, index, env, &kind, &name)
        }
        Err(err) => {
            warn!(rel_path = %ctx.rel_path, %err, "copying without recording a symbol");
            Ok(())
        }
    };

    match result {
        Ok(()) => write_output(ctx),
        Err(DocpackError::Parse { message }) => {
            warn!(rel_path = %ctx.rel_path, message, "parse failed, copying verbatim");
            copy_file(ctx)
        }
        Err(other) => Err(other),
    }
}

/// Guide pages index their top heading (display-mapped) and never receive
/// navigation markers.
fn add_guide(
    ctx: &mut FileContext,
    index: &mut SymbolIndex,
    env: &TransformEnv<'_>,
) -> Result<()> {
    let title = guide_title(ctx.document()?);
    if let Some(title) = title {
        index.add(env.titles.display(&title), "gd", &ctx.rel_path);
    }
    Ok(())
}

/// Module pages index the directory portion of the path as a `::`-joined
/// name — empty at the root — and take the `mod` navigation filters.
fn add_module(
    ctx: &mut FileContext,
    index: &mut SymbolIndex,
    env: &TransformEnv<'_>,
) -> Result<()> {
    let modified = inject_markers(ctx.document()?, "mod", env.kinds);
    ctx.modified |= modified;

    let name = page::fqn_prefix(&ctx.rel_path);
    index.add(&name, "mod", &ctx.rel_path);
    Ok(())
}

/// Declaration pages index the page symbol plus its extracted children.
fn add_declaration(
    ctx: &mut FileContext,
    index: &mut SymbolIndex,
    env: &TransformEnv<'_>,
    kind: &str,
    name: &str,
) -> Result<()> {
    let fqn = page::make_fqn(&page::fqn_prefix(&ctx.rel_path), name);

    // Children are computed first: a type alias has none, so a `type` page
    // with children is really an enum. The final kind drives both the
    // indexed row and the marker filters.
    let children = child_decls(ctx.document()?, kind);
    let kind = if kind == "type" && !children.is_empty() {
        "enum"
    } else {
        kind
    };

    index.add(&fqn, kind, &ctx.rel_path);

    for child in &children {
        let location = match &child.anchor {
            Some(anchor) => format!("{}#{anchor}", ctx.rel_path),
            None => ctx.rel_path.clone(),
        };
        index.add(&page::make_fqn(&fqn, &child.name), &child.kind, &location);
    }

    let modified = inject_markers(ctx.document()?, kind, env.kinds);
    ctx.modified |= modified;
    Ok(())
}

/// Serialize the mutated tree, or copy the original untouched so unmodified
/// pages stay byte-identical.
fn write_output(ctx: &mut FileContext) -> Result<()> {
    if !ctx.modified {
        return copy_file(ctx);
    }

    let html = serialize_document(ctx.document()?);
    std::fs::write(&ctx.dest_path, html).map_err(|e| DocpackError::io(&ctx.dest_path, e))?;
    Ok(())
}

fn serialize_document(doc: &Html) -> String {
    format!("<!DOCTYPE html>{}", doc.root_element().html())
}
