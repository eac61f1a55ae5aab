//! Headless match runner
//!
//! Generates a map, seats a few factions and plays rounds with scripted
//! orders, printing a per-round summary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use hex_dominion::core::config::GameConfig;
use hex_dominion::core::error::{CoreError, Result};
use hex_dominion::core::types::FactionId;
use hex_dominion::data::StaticData;
use hex_dominion::entity::{Actor, Entity};
use hex_dominion::map::generate;
use hex_dominion::world::World;

const FACTION_COLORS: [(&str, &str); 4] = [
    ("Crimson", "#c0392b"),
    ("Azure", "#2e86c1"),
    ("Verdant", "#229954"),
    ("Amber", "#d68910"),
];

/// How far a scripted move order reaches
const WANDER_RADIUS: u32 = 5;

const PRODUCTION_CHOICES: [&str; 4] = ["warrior", "archer", "cavalry", "settler"];

/// Headless runner - scripted factions on a generated map
#[derive(Parser, Debug)]
#[command(name = "hex-dominion")]
#[command(about = "Run a scripted match on a generated hex map")]
struct Args {
    /// Game config (TOML); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Static data tables (TOML); the built-in tables are used when absent
    #[arg(long)]
    tables: Option<PathBuf>,

    /// Overrides the config seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of rounds to play
    #[arg(long, default_value_t = 20)]
    rounds: u32,

    /// Number of factions (1 to 4)
    #[arg(long, default_value_t = 2)]
    factions: usize,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,

    /// Write the final map snapshot to this file
    #[arg(long)]
    save_map: Option<PathBuf>,
}

#[derive(Serialize)]
struct MatchReport {
    seed: u64,
    rounds: u32,
    explored: usize,
    factions: Vec<FactionReport>,
    winner: Option<u32>,
}

#[derive(Serialize)]
struct FactionReport {
    name: String,
    units: usize,
    settlements: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hex_dominion=info")),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let data = match &args.tables {
        Some(path) => StaticData::load(path)?,
        None => StaticData::builtin()?,
    };
    if !(1..=FACTION_COLORS.len()).contains(&args.factions) {
        return Err(CoreError::InvalidConfig(format!(
            "factions must be between 1 and {}",
            FACTION_COLORS.len()
        )));
    }

    let grid = generate(&config, Arc::new(data))?;
    let mut world = World::new(grid);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    for &(name, color) in FACTION_COLORS.iter().take(args.factions) {
        let faction = world.add_faction(name, color);
        seat_faction(&mut world, faction, &mut rng)?;
    }
    world.refresh_visibility();

    for _ in 0..args.rounds {
        let factions: Vec<FactionId> = world.surviving_factions();
        for faction in factions {
            issue_orders(&mut world, faction, &mut rng)?;
        }
        let summary = world.advance_round()?;
        if args.format == "text" {
            println!(
                "round {:>3}: {} acted, {} spawned, {} explored",
                summary.round,
                summary.acted,
                summary.spawned.len(),
                world.grid().explored_count()
            );
        }
        if world.winner().is_some() {
            break;
        }
    }

    if let Some(path) = &args.save_map {
        world.grid().save_json(path)?;
    }

    let report = MatchReport {
        seed: config.seed,
        rounds: world.round(),
        explored: world.grid().explored_count(),
        factions: world
            .factions()
            .map(|f| FactionReport {
                name: f.name().to_string(),
                units: f.units().count(),
                settlements: f.settlements().count(),
            })
            .collect(),
        winner: world.winner().map(|f| f.0),
    };
    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            for f in &report.factions {
                println!("{}: {} units, {} settlements", f.name, f.units, f.settlements);
            }
        }
    }
    Ok(())
}

/// Settle a founding settler and give it a warrior escort
fn seat_faction(world: &mut World, faction: FactionId, rng: &mut ChaCha8Rng) -> Result<()> {
    let site = world
        .grid()
        .random_tile_where(rng, |t| {
            t.tile_type().is_land() && t.occupant().is_none() && !t.has_static_feature()
        })
        .ok_or_else(|| CoreError::InvalidConfig("no free land to place a faction".into()))?;

    let name = format!("{} capital", world.faction(faction)?.name());
    let settler = world.spawn_unit(faction, "settler", site)?;
    let capital = world.settle(settler, &name)?;
    world.start_production(capital, "warrior")?;
    world.spawn_unit(faction, "warrior", site)?;
    Ok(())
}

/// Give every free entity of a faction something to do
fn issue_orders(world: &mut World, faction: FactionId, rng: &mut ChaCha8Rng) -> Result<()> {
    while let Some(id) = world.next_action(faction)? {
        let unit_tile = match world.entity(id)? {
            Actor::Unit(unit) => Some(unit.tile()),
            Actor::Settlement(_) => None,
        };
        match unit_tile {
            Some(here) => {
                let options = world.grid().neighbors(here, WANDER_RADIUS);
                let moved = match options.choose(rng) {
                    Some(&goal) => world.order_move(id, goal)?.is_some(),
                    None => false,
                };
                if !moved {
                    world.hold_unit(id)?;
                }
            }
            None => {
                if let Some(template) = PRODUCTION_CHOICES.choose(rng) {
                    world.start_production(id, template)?;
                }
            }
        }
    }
    Ok(())
}
