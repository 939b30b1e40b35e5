//! Filesystem layout of a `<name>.docset` bundle.

use std::path::{Path, PathBuf};

/// Path arithmetic for the fixed docset directory shape:
///
/// ```text
/// <out>/<name>.docset/
///   Contents/
///     Info.plist
///     Resources/
///       docSet.dsidx
///       Documents/        ← mirrored documentation tree
/// ```
#[derive(Debug, Clone)]
pub struct DocsetLayout {
    root: PathBuf,
}

impl DocsetLayout {
    pub fn new(name: &str, out_dir: &Path) -> Self {
        Self {
            root: out_dir.join(format!("{name}.docset")),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    pub fn contents_dir(&self) -> PathBuf {
        self.root.join("Contents")
    }

    pub fn resources_dir(&self) -> PathBuf {
        self.contents_dir().join("Resources")
    }

    pub fn documents_dir(&self) -> PathBuf {
        self.resources_dir().join("Documents")
    }

    pub fn plist_path(&self) -> PathBuf {
        self.contents_dir().join("Info.plist")
    }

    pub fn index_path(&self) -> PathBuf {
        self.resources_dir().join("docSet.dsidx")
    }
}
