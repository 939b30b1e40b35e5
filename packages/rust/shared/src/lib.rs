//! Shared types, error model, and configuration for docpack.
//!
//! This crate is the foundation depended on by all other docpack crates.
//! It provides:
//! - [`DocpackError`] — the unified error type
//! - Domain types ([`KindMap`], [`TitleMap`], [`DocsetInfo`])
//! - Configuration ([`AppConfig`], config loading and validation)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DocsetSection, init_config, load_config, load_config_from, validate_config,
};
pub use error::{DocpackError, Result};
pub use types::{DocsetInfo, KindMap, TitleMap};
