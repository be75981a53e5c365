//! Core data structures shared by the rtsopen crates.
//!
//! Everything in here is plain data: grid cells, visibility records, ruleset rows
//! and persistent identifiers. The algorithms that operate on them live in
//! `rtsopen_core`.

pub mod data;

pub use data::grid::GridCell;
pub use data::persistent_id::PersistentId;
pub use data::ruleset::{OperandSource, RowHandle, RulesetOpType, RulesetOperator, RulesetRow};
pub use data::visibility::{VisibilityState, VisitedWorldDatum, WorldDescriptor, WorldExtent};
