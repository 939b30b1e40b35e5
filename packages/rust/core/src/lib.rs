//! Build orchestration and the action layer for docpack.
//!
//! This crate ties together rule dispatch, symbol extraction, marker
//! injection, and the symbol index into the end-to-end docset build:
//! walk the source tree, route each file through the rule table, execute
//! the chosen action, flush the index once.

pub mod actions;
pub mod builder;
pub mod layout;
pub mod plist;
pub mod rustdoc;

pub use builder::{
    BuildProgress, BuildRequest, BuildSummary, DocsetRequest, DocsetSummary, SilentProgress,
    build, build_docset,
};
pub use layout::DocsetLayout;
