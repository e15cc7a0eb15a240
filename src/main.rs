//! # Dungeon Forge Command Line
//!
//! Collects generation parameters, runs the layout generator, and prints the
//! result as a glyph dump or JSON.

use clap::{Parser, ValueEnum};
use dungeon_forge::{config, DungeonLayout, ForgeResult, GenerationConfig, LayoutGenerator};
use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

/// Command line arguments for the layout generator.
#[derive(Parser, Debug)]
#[command(name = "dungeon-forge")]
#[command(about = "Generate a constrained dungeon layout")]
#[command(version)]
struct Args {
    /// Random seed for layout generation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Grid rows, wall ring included (random in 12..=18 when unset)
    #[arg(short, long)]
    rows: Option<u32>,

    /// Grid columns, wall ring included (random in 12..=18 when unset)
    #[arg(short, long)]
    cols: Option<u32>,

    /// Extra chests besides the key and weapon chests
    #[arg(long)]
    chests: Option<u32>,

    /// Enemies to place
    #[arg(long)]
    enemies: Option<u32>,

    /// Generation attempts before giving up
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Search steps allowed per attempt
    #[arg(long)]
    step_limit: Option<u32>,

    /// JSON generation config; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log filter (error, warn, info, debug, trace, or an env_logger spec)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ForgeResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Dungeon Forge v{}", dungeon_forge::VERSION);

    let config = build_config(&args)?;
    info!("Generating layout with seed: {}", config.seed);

    let layout = match LayoutGenerator::new().generate_layout(&config) {
        Ok(layout) => layout,
        Err(e) => {
            error!("{}", e);
            error!("Try a larger grid, fewer entities, or looser spacing rules");
            return Err(e);
        }
    };

    match args.format {
        OutputFormat::Text => print_text(&layout),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&layout)?),
    }

    Ok(())
}

/// Initializes env_logger, letting `RUST_LOG` override the flag.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

/// Merges the config file (if any) with command line overrides.
fn build_config(args: &Args) -> ForgeResult<GenerationConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading generation config from {}", path.display());
            let mut loaded = GenerationConfig::from_json_file(path)?;
            if let Some(seed) = args.seed {
                loaded.seed = seed;
            }
            loaded
        }
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            let mut rng = StdRng::seed_from_u64(seed);
            let rows = rng.gen_range(config::RANDOM_DIMENSION_RANGE);
            let cols = rng.gen_range(config::RANDOM_DIMENSION_RANGE);
            GenerationConfig::new(seed).with_dimensions(rows, cols)
        }
    };

    if let Some(rows) = args.rows {
        config.rows = rows;
    }
    if let Some(cols) = args.cols {
        config.cols = cols;
    }
    if args.chests.is_some() {
        config.chest_count = args.chests;
    }
    if args.enemies.is_some() {
        config.enemy_count = args.enemies;
    }
    if let Some(max_attempts) = args.max_attempts {
        config.max_attempts = max_attempts;
    }
    if let Some(step_limit) = args.step_limit {
        config.step_limit = step_limit;
    }

    Ok(config)
}

fn print_text(layout: &DungeonLayout) {
    println!("{}", layout.grid);
    println!();
    println!("player start: {}", layout.player.position);
    println!("exit:         {}", layout.exit);
    println!("key chest:    {}", layout.key_chest);
    println!("weapon chest: {}", layout.weapon_chest);
    println!(
        "player:       health {}, weapon durability {}",
        layout.player.health, layout.player.weapon_durability
    );
    println!("attempts:     {}", layout.attempts);
}
