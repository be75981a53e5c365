//! # rtsopen Core
//!
//! Engine-independent building blocks of the rtsopen strategy game.
//!
//! This crate contains:
//! - Uniform hash-grid spatial indexing
//! - Per-observer fog-of-war tracking with RGBA raster synthesis
//! - Precedence-tiered arithmetic rulesets with nested rows
//! - Persistent 32-bit id allocation
//! - Configuration, error types and structured logging
//!
//! ## Example
//!
//! ```
//! use rtsopen_core::fog_of_war::VisibilityMap;
//! use rtsopen_core::spatial_hash::HashGrid;
//! use rtsopen_data::WorldDescriptor;
//!
//! let mut map = VisibilityMap::new(WorldDescriptor::positive(10.0, 10.0), HashGrid::new(1.0).unwrap());
//! map.initialize().unwrap();
//! map.visit_location([0.0, 0.0, 0.0]).unwrap();
//!
//! assert_eq!(map.texel(0, 0), Some([255, 255, 255, 255]));
//! assert_eq!(map.texel(9, 9), Some([0, 0, 0, 255]));
//! ```

/// Configuration loading and validation
pub mod config;
/// Error types shared by every subsystem
pub mod error;
/// Visibility rasters and the per-observer tracker
pub mod fog_of_war;
/// Fog-of-war counters and logging setup
pub mod metrics;
/// Random-start persistent id allocation
pub mod persistent_id;
/// Ruleset evaluation, row tables and tag registry
pub mod ruleset;
/// Uniform grid cell math
pub mod spatial_hash;

pub use config::RtsConfig;
pub use error::{CoreError, FogError, Result, RulesetError};
pub use fog_of_war::{FogOfWarTracker, NetMode, VisibilityMap};
pub use persistent_id::{PersistentIdAllocator, TrackedIds};
pub use ruleset::{EvalContext, RulesetEvaluator, RulesetLibrary, RulesetTable};
pub use spatial_hash::HashGrid;
