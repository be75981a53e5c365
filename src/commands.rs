//! Subcommand implementations. Each `run` returns a report that `main` prints.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rtsopen_core::config::RtsConfig;
use rtsopen_core::fog_of_war::VisibilityMap;
use rtsopen_core::persistent_id::{PersistentIdAllocator, TrackedIds};
use rtsopen_core::ruleset::{EvalContext, RulesetLibrary};
use rtsopen_core::spatial_hash::HashGrid;
use rtsopen_data::{PersistentId, WorldDescriptor, WorldExtent};
use serde::Serialize;

use crate::ppm::PpmSink;
use crate::visit::VisitArg;

#[derive(Args, Debug, Clone, Default)]
pub struct FogArgs {
    /// World width in world units (defaults to the config's fog_of_war extent)
    #[arg(long)]
    pub width: Option<f64>,

    /// World height in world units
    #[arg(long)]
    pub height: Option<f64>,

    /// Hash grid cell size (defaults to hash_grid.uniform_cell_size)
    #[arg(long)]
    pub cell_size: Option<f64>,

    /// Visited positions as x,y[,visible|obscured|hidden]; repeatable
    #[arg(long = "visit")]
    pub visits: Vec<VisitArg>,

    /// Reveal the whole map after applying visits
    #[arg(long)]
    pub reveal_all: bool,

    /// Write the raster as a binary PPM
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FogReport {
    pub width: usize,
    pub height: usize,
    pub cell_size: f64,
    pub visited_cells: usize,
    pub repaints: u64,
    pub revealed_texels: usize,
    pub written: Option<PathBuf>,
}

/// Builds one visibility map, applies the visits and optionally writes it out.
pub fn run_fog(config: &RtsConfig, args: &FogArgs) -> Result<FogReport> {
    let grid = match args.cell_size {
        Some(size) => HashGrid::new(size)?,
        None => HashGrid::from_config(&config.hash_grid)?,
    };
    let mut world = config.fog_of_war.world();
    if args.width.is_some() || args.height.is_some() {
        world = WorldDescriptor {
            size_positive: WorldExtent::new(
                args.width.unwrap_or(world.size_positive.x),
                args.height.unwrap_or(world.size_positive.y),
            ),
            size_negative: WorldExtent::new(0.0, 0.0),
            center: WorldExtent::new(0.0, 0.0),
        };
    }

    let mut map = VisibilityMap::new(world, grid);
    map.initialize()?;
    for visit in &args.visits {
        let datum = visit.to_datum(&grid);
        let repainted = map.visit(datum)?;
        tracing::debug!(cell = ?datum.cell, state = ?datum.state, repainted, "applied visit");
    }
    if args.reveal_all {
        map.fill_all(true)?;
    }

    if let Some(path) = &args.out {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut sink = PpmSink::new(BufWriter::new(file));
        map.sync(&mut sink)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "fog of war raster written");
    }

    let revealed_texels = map
        .pixels()
        .map(|p| p.chunks_exact(4).filter(|t| t[0] == 255).count())
        .unwrap_or(0);
    Ok(FogReport {
        width: map.width(),
        height: map.height(),
        cell_size: grid.cell_size(),
        visited_cells: map.len(),
        repaints: map.repaint_count(),
        revealed_texels,
        written: args.out.clone(),
    })
}

#[derive(Args, Debug, Clone)]
pub struct EvalArgs {
    /// Rules file with [[rulesets]] and [operators.*] tables
    #[arg(long)]
    pub table: PathBuf,

    /// Tag of the ruleset to evaluate
    #[arg(long)]
    pub ruleset: String,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub self_value: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub other_value: f64,

    /// Used by static operands without a fallback
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub static_value: f64,

    /// Evaluate in floating point instead of truncating inputs to integers
    #[arg(long)]
    pub float: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct EvalReport {
    pub ruleset: String,
    pub value: f64,
}

pub fn run_eval(config: &RtsConfig, args: &EvalArgs) -> Result<EvalReport> {
    let library = RulesetLibrary::load(&args.table)?;
    let max_depth = config.ruleset.max_depth;
    let value = if args.float {
        let ctx = EvalContext::new(args.self_value, args.other_value, args.static_value);
        library.evaluate_tag(&args.ruleset, &ctx, max_depth)?
    } else {
        let ctx = EvalContext::new(
            args.self_value as i64,
            args.other_value as i64,
            args.static_value as i64,
        );
        library.evaluate_tag(&args.ruleset, &ctx, max_depth)? as f64
    };
    Ok(EvalReport {
        ruleset: args.ruleset.clone(),
        value,
    })
}

#[derive(Args, Debug, Clone)]
pub struct IdsArgs {
    /// How many ids to allocate
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Seed for reproducible allocation
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON file of ids already in use; updated with the new ids
    #[arg(long)]
    pub tracked: Option<PathBuf>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct IdsReport {
    pub ids: Vec<PersistentId>,
    pub tracked: usize,
}

pub fn run_ids(args: &IdsArgs) -> Result<IdsReport> {
    let mut tracked = match &args.tracked {
        Some(path) if path.exists() => {
            let content =
                fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<TrackedIds>(&content)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        _ => TrackedIds::new(),
    };

    let mut allocator = match args.seed {
        Some(seed) => PersistentIdAllocator::from_seed(seed),
        None => PersistentIdAllocator::from_entropy(),
    };
    let ids: Vec<PersistentId> = (0..args.count)
        .map(|_| allocator.generate_new_id(&mut tracked))
        .collect();
    if ids.iter().any(|id| !id.is_valid()) {
        anyhow::bail!("persistent id space exhausted");
    }

    if let Some(path) = &args.tracked {
        let json = serde_json::to_string(&tracked)?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(IdsReport {
        ids,
        tracked: tracked.len(),
    })
}
