pub mod grid;
pub mod persistent_id;
pub mod ruleset;
pub mod visibility;
