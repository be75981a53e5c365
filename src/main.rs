use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rtsopen_core::config::RtsConfig;
use rtsopen_core::metrics::init_logging;
use rtsopen_lib::commands::{self, EvalArgs, FogArgs, IdsArgs};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file path; missing files fall back to defaults
    #[arg(short, long, global = true, default_value = "rtsopen.toml")]
    config: PathBuf,

    /// Log filter, overrides logging.level from the config
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print reports as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint a fog-of-war raster from visited positions
    Fog(FogArgs),
    /// Evaluate a ruleset from a rules file
    Eval(EvalArgs),
    /// Allocate persistent ids
    Ids(IdsArgs),
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = RtsConfig::load_or_default(&args.config)?;
    init_logging(args.log_level.as_deref().unwrap_or(&config.logging.level));
    tracing::debug!(config = %args.config.display(), "configuration loaded");

    match &args.command {
        Command::Fog(fog) => {
            let report = commands::run_fog(&config, fog)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{}x{} raster, cell size {}: {} cells visited, {} repaints, {} texels revealed",
                    report.width,
                    report.height,
                    report.cell_size,
                    report.visited_cells,
                    report.repaints,
                    report.revealed_texels
                );
                if let Some(path) = &report.written {
                    println!("wrote {}", path.display());
                }
            }
        }
        Command::Eval(eval) => {
            let report = commands::run_eval(&config, eval)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} = {}", report.ruleset, report.value);
            }
        }
        Command::Ids(ids) => {
            let report = commands::run_ids(ids)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for id in &report.ids {
                    println!("{id}");
                }
            }
        }
    }

    Ok(())
}
