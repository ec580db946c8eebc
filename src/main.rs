use wumpus_rust::config::{Cli, Config};
use wumpus_rust::map::Map;
use wumpus_rust::stat::Stats;
use wumpus_rust::world::run_game;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("cannot read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let map = match config.world_path.as_ref() {
        Some(world_path) => Map::from_file(world_path)?,
        None => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            info!(
                "generating a {}x{} world with seed {}",
                config.width, config.height, config.seed
            );
            Map::generate(config.width, config.height, config.pit_probability, &mut rng)?
        }
    };

    let mut stats = Stats::default();
    let outcome = run_game(map, config.max_steps, config.show_board, &mut stats)?;
    info!("game over: {outcome:?}");
    stats.print();

    if let Some(output_path) = config.output_path.as_ref() {
        stats
            .write_json(output_path)
            .with_context(|| format!("error writing stats to {output_path}"))?;
    }

    Ok(())
}
