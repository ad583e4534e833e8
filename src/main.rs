//! World Forge - command line entry point
//!
//! Forges one world from a seed and writes it out as World-Weave text and,
//! optionally, JSON.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use world_forge::catalog::Catalog;
use world_forge::core::error::{ForgeError, Result};
use world_forge::forge::{forge_world, ForgeConfig, PlayerCharacter};

/// Forge a tabletop campaign world
#[derive(Parser, Debug)]
#[command(name = "world-forge")]
#[command(about = "Generate a complete, internally consistent RPG world")]
struct Args {
    /// Random seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// TOML config file; defaults are used for anything it leaves out
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of catalog TOML files; the built-in catalog when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Only the capital: no settlements, dungeons or islands
    #[arg(long, default_value_t = false)]
    minimal: bool,

    /// Where to write the World-Weave text; stdout when omitted
    #[arg(long)]
    weave: Option<PathBuf>,

    /// Also write the full world as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    #[arg(long, default_value = "Wanderer")]
    player_name: String,

    #[arg(long, default_value = "Human")]
    player_race: String,

    #[arg(long, default_value = "Fighter")]
    player_class: String,
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| ForgeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("world_forge=info")))
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ForgeConfig::from_toml_file(path)?,
        None => ForgeConfig::default(),
    };
    if args.minimal {
        config.locations = ForgeConfig::minimal().locations;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let catalog = match &args.catalog {
        Some(dir) => Catalog::load_dir(dir)?,
        None => Catalog::embedded()?,
    };

    let player = PlayerCharacter::new(args.player_name, args.player_race, args.player_class);
    let output = forge_world(&config, &catalog, player)?;

    let weave = output.weave();
    match &args.weave {
        Some(path) => {
            write_file(path, &weave)?;
            tracing::info!("World-Weave written to {}", path.display());
        }
        None => println!("{}", weave),
    }
    if let Some(path) = &args.json {
        write_file(path, &output.to_json())?;
        tracing::info!("JSON written to {}", path.display());
    }

    eprintln!("{}", output.summary());
    Ok(())
}
