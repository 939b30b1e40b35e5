//! Rule-dispatch engine: boolean path predicates and the ordered
//! predicate→action routing table.
//!
//! This crate provides:
//! - [`Predicate`] — boolean matchers over a file's relative path
//! - [`Rule`], [`RuleTable`] — first-match-wins routing to an [`Action`]
//! - [`Action`], [`TextPatch`] — the actions as plain data, interpreted by
//!   the build orchestrator

pub mod predicate;
pub mod table;

pub use predicate::{Predicate, from_entries};
pub use table::{Action, Rule, RuleTable, Selection, TextPatch};
