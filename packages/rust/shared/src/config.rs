//! Build configuration for docpack.
//!
//! Config lives in a project-local `docpack.toml` next to the documentation
//! being packaged. CLI flags override config file values, which override
//! defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocpackError, Result};
use crate::types::{DocsetInfo, KindMap, TitleMap};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "docpack.toml";

// ---------------------------------------------------------------------------
// Config structs (matching docpack.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// `[docset]` — identity of the docset to produce.
    #[serde(default)]
    pub docset: DocsetSection,

    /// `[kinds]` — display-kind overrides merged over the flavor defaults.
    #[serde(default)]
    pub kinds: BTreeMap<String, String>,

    /// `[guide_titles]` — display-name overrides for guide headings.
    #[serde(default)]
    pub guide_titles: BTreeMap<String, String>,
}

/// `[docset]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocsetSection {
    /// Bundle name (required).
    #[serde(default)]
    pub name: String,

    /// Bundle identifier (required).
    #[serde(default)]
    pub bundle_id: String,

    /// Docset version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Landing page within the documents tree.
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Platform family tag.
    #[serde(default = "default_platform_family")]
    pub platform_family: String,

    /// Optional icon file, resolved relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Documentation source directory, resolved relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_dir: Option<String>,

    /// Output directory, resolved relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<String>,
}

impl Default for DocsetSection {
    fn default() -> Self {
        Self {
            name: String::new(),
            bundle_id: String::new(),
            version: default_version(),
            index_file: default_index_file(),
            platform_family: default_platform_family(),
            icon: None,
            doc_dir: None,
            out_dir: None,
        }
    }
}

fn default_version() -> String {
    "0.1".into()
}
fn default_index_file() -> String {
    "index.html".into()
}
fn default_platform_family() -> String {
    "rust".into()
}

impl AppConfig {
    /// The docset identity carried into `Info.plist`.
    pub fn docset_info(&self) -> DocsetInfo {
        DocsetInfo {
            name: self.docset.name.clone(),
            bundle_id: self.docset.bundle_id.clone(),
            version: self.docset.version.clone(),
            index_file: self.docset.index_file.clone(),
            platform_family: self.docset.platform_family.clone(),
        }
    }

    /// Flavor kind map with `[kinds]` overrides applied.
    pub fn kind_map(&self, flavor_defaults: KindMap) -> KindMap {
        flavor_defaults.merged(&self.kinds)
    }

    /// Guide-title override table.
    pub fn title_map(&self) -> TitleMap {
        TitleMap::new(self.guide_titles.clone())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocpackError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocpackError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Load `docpack.toml` from `dir`, or defaults if the file does not exist.
pub fn load_config(dir: &Path) -> Result<AppConfig> {
    let path = dir.join(CONFIG_FILE_NAME);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Create a default config file in `dir`. Returns the path to the created file.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| DocpackError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocpackError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocpackError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Validate required config values. Fatal at startup when they are missing.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    let mut missing = Vec::new();
    if config.docset.name.is_empty() {
        missing.push("[docset.name]");
    }
    if config.docset.bundle_id.is_empty() {
        missing.push("[docset.bundle_id]");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DocpackError::config(format!(
            "{} should have a value",
            missing.join(", ")
        )))
    }
}
