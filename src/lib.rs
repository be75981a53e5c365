//! Command-line harness around `rtsopen_core`.
//!
//! The binary's subcommands live in [`commands`]; [`ppm`] writes fog-of-war
//! rasters to portable pixmaps and [`visit`] parses `x,y[,state]` arguments.

pub mod commands;
pub mod ppm;
pub mod visit;

pub use ppm::PpmSink;
pub use visit::{VisitArg, VisitArgError};
