use anyhow::anyhow;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug, Default)]
#[command(
    name = "Rust Wumpus",
    about = "A logic-engine robot playing Hunt the Wumpus.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the world file; a random world is generated when absent")]
    pub world_path: Option<String>,

    #[arg(long, help = "Width of a generated world")]
    pub width: Option<usize>,

    #[arg(long, help = "Height of a generated world")]
    pub height: Option<usize>,

    #[arg(long, help = "Probability of a pit in each cell of a generated world")]
    pub pit_probability: Option<f64>,

    #[arg(long, help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(long, help = "Maximum number of moves before the game is abandoned")]
    pub max_steps: Option<usize>,

    #[arg(long, help = "Path to the JSON statistics output file")]
    pub output_path: Option<String>,

    #[arg(long, help = "Print the board after every step", default_value_t = false)]
    pub show_board: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub world_path: Option<String>,
    pub width: usize,
    pub height: usize,
    pub pit_probability: f64,
    pub seed: u64,
    pub max_steps: usize,
    pub output_path: Option<String>,
    pub show_board: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world_path: None,
            width: 4,
            height: 4,
            pit_probability: 0.2,
            seed: 0,
            max_steps: 1000,
            output_path: None,
            show_board: false,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Command line values win over the file. Validates the merged result.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(world_path) = &cli.world_path {
            self.world_path = Some(world_path.clone());
        }
        if let Some(width) = cli.width {
            self.width = width;
        }
        if let Some(height) = cli.height {
            self.height = height;
        }
        if let Some(pit_probability) = cli.pit_probability {
            self.pit_probability = pit_probability;
        }
        if let Some(seed) = cli.seed {
            self.seed = seed;
        }
        if let Some(max_steps) = cli.max_steps {
            self.max_steps = max_steps;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }
        self.show_board |= cli.show_board;

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.world_path.is_none() && self.width * self.height < 3 {
            return Err(anyhow!(
                "Generated world must have at least 3 cells, got {}x{}",
                self.width,
                self.height
            ));
        }
        if !(0.0..=1.0).contains(&self.pit_probability) {
            return Err(anyhow!(
                "Pit probability must be within [0, 1], got {}",
                self.pit_probability
            ));
        }
        if self.max_steps == 0 {
            return Err(anyhow!("Max steps must be positive"));
        }
        Ok(())
    }
}
