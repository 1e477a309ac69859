#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives Scurry stages headlessly.

mod authoring;
mod config;
mod driver;
mod resources;
mod share;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scurry_core::{Improvement, Stage, StageInfo};
use scurry_persistence::{load_stage, save_stage, FsStorage, LoadOutcome};

use crate::{
    authoring::StageAuthor, config::Config, driver::Simulation, resources::ResourcePacks,
};

/// Headless driver for Scurry stages.
#[derive(Debug, Parser)]
#[command(name = "scurry", version, about = "Headless driver for Scurry stages")]
struct Cli {
    /// Configuration file; defaults to ./scurry.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Runs a stage for a fixed span of simulated time and reports outcomes.
    Simulate {
        /// Stage file to run.
        stage: PathBuf,
        /// Simulated seconds to run for.
        #[arg(long, default_value_t = 30.0)]
        seconds: f64,
    },
    /// Prints stage metadata, contents and resolved music asset.
    Inspect {
        /// Stage file to describe.
        stage: PathBuf,
    },
    /// Writes a blank stage.
    New {
        /// Destination stage file.
        stage: PathBuf,
        #[arg(long)]
        rows: u32,
        #[arg(long)]
        columns: u32,
        /// Wall off the seams so movers cannot wrap.
        #[arg(long)]
        border_walls: bool,
        #[arg(long, default_value = "Untitled")]
        name: String,
        #[arg(long, default_value = "theme_a")]
        music: String,
        #[arg(long, default_value = "default")]
        pack: String,
    },
    /// Writes a stage filled with seeded random content.
    Scramble {
        /// Destination stage file.
        stage: PathBuf,
        #[arg(long)]
        rows: u32,
        #[arg(long)]
        columns: u32,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Prints a single-line share code for a stage.
    Share {
        /// Stage file to encode.
        stage: PathBuf,
    },
    /// Writes the stage carried by a share code.
    Import {
        /// Share code produced by `scurry share`.
        code: String,
        /// Destination stage file.
        stage: PathBuf,
    },
}

/// Entry point for the Scurry command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        CliCommand::Simulate { stage, seconds } => simulate(&config, &stage, seconds),
        CliCommand::Inspect { stage } => inspect(&config, &stage),
        CliCommand::New {
            stage,
            rows,
            columns,
            border_walls,
            name,
            music,
            pack,
        } => {
            let info = StageInfo::new(name, music, pack);
            let mut author = StageAuthor::new(config.world_config(), rows, columns, info)?;
            if border_walls {
                author.add_border_walls();
            }
            write_stage(&stage, &author.finish())
        }
        CliCommand::Scramble {
            stage,
            rows,
            columns,
            seed,
        } => {
            let info = StageInfo::new(
                format!("Scramble {seed:#x}"),
                "theme_a",
                config.resources.default_pack.clone(),
            );
            let mut author = StageAuthor::new(config.world_config(), rows, columns, info)?;
            author.scramble(&mut ChaCha8Rng::seed_from_u64(seed));
            write_stage(&stage, &author.finish())
        }
        CliCommand::Share { stage } => {
            let stage = read_stage(&config, &stage)?;
            println!("{}", share::encode(&stage));
            Ok(())
        }
        CliCommand::Import { code, stage } => {
            let decoded = share::decode(&code, config.simulation.tile_size)
                .context("failed to decode share code")?;
            write_stage(&stage, &decoded)
        }
    }
}

fn simulate(config: &Config, path: &Path, seconds: f64) -> Result<()> {
    if !(seconds.is_finite() && seconds >= 0.0) {
        bail!("--seconds must be a non-negative number");
    }
    let stage = read_stage(config, path)?;
    let mut simulation = Simulation::new(config);
    simulation.start(stage);
    let steps = simulation.advance(Duration::from_secs_f64(seconds));

    let summary = simulation.summary();
    let remaining = scurry_world::query::mover_view(simulation.world()).len();
    println!("steps:         {steps}");
    println!("running ticks: {}", summary.ticks);
    println!("spawned:       {}", summary.spawned);
    println!("reached goal:  {}", summary.reached_goal);
    println!("fell in hole:  {}", summary.fell_in_hole);
    println!("caught:        {}", summary.caught);
    println!("arrows broken: {}", summary.arrows_broken);
    println!("still moving:  {remaining}");
    Ok(())
}

fn inspect(config: &Config, path: &Path) -> Result<()> {
    let stage = read_stage(config, path)?;
    let grid = &stage.grid;

    let mut holes = 0;
    let mut goals = 0;
    let mut spawners = 0;
    let mut arrows = 0;
    let mut occupants = 0;
    let mut wall_sides = 0;
    for tile in grid.tiles() {
        match tile.improvement() {
            Improvement::None => {}
            Improvement::Hole => holes += 1,
            Improvement::Goal => goals += 1,
            Improvement::Spawner(_) => spawners += 1,
            Improvement::Arrow(_) => arrows += 1,
        }
        if tile.occupant().is_some() {
            occupants += 1;
        }
        wall_sides += tile.walls().count();
    }

    println!("name:       {}", stage.info.name);
    println!("music:      {}", stage.info.music_track);
    println!("pack:       {}", stage.info.resource_pack);
    println!("size:       {}x{}", grid.rows(), grid.columns());
    println!("holes:      {holes}");
    println!("goals:      {goals}");
    println!("spawners:   {spawners}");
    println!("arrows:     {arrows}");
    println!("occupants:  {occupants}");
    println!("wall sides: {wall_sides}");

    let manifest = &config.resources.manifest;
    if manifest.exists() {
        let packs = ResourcePacks::load(manifest, &config.resources.default_pack)?;
        let music = packs.resolve(&stage.info.resource_pack, &stage.info.music_track)?;
        println!("music file: {}", music.display());
    } else {
        warn!("no pack manifest at {}; skipping asset resolution", manifest.display());
    }
    Ok(())
}

fn storage_for(path: &Path) -> Result<(FsStorage, String)> {
    let file = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} does not name a file", path.display()))?;
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok((FsStorage::new(directory), file.to_owned()))
}

fn read_stage(config: &Config, path: &Path) -> Result<Stage> {
    let (storage, file) = storage_for(path)?;
    match load_stage(&storage, &file, config.simulation.tile_size)
        .with_context(|| format!("failed to load stage {}", path.display()))?
    {
        LoadOutcome::Loaded(stage) => Ok(*stage),
        LoadOutcome::Missing => bail!("no stage at {}", path.display()),
        LoadOutcome::Rejected { found } => {
            bail!("stage {} uses unsupported format version {found}", path.display())
        }
    }
}

fn write_stage(path: &Path, stage: &Stage) -> Result<()> {
    let (mut storage, file) = storage_for(path)?;
    save_stage(&mut storage, &file, stage)
        .with_context(|| format!("failed to save stage {}", path.display()))?;
    println!(
        "wrote '{}' ({}x{}) to {}",
        stage.info.name,
        stage.grid.rows(),
        stage.grid.columns(),
        path.display()
    );
    Ok(())
}
