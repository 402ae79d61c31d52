use clap::Parser;
use grid_astar::{
    CostModel, Grid, GridConfig, SearchEngine, SearchStatus, StepDriver, TextRenderer,
};
use std::io;
use std::thread;
use std::time::Duration;

// Runs A* on a random grid and prints one frame per step:
// - # marks a wall
// - o marks the open set, x the closed set
// - * marks the best path to the node being expanded, or the final path
// - S and G mark start and goal

#[derive(Parser, Debug)]
#[command(about = "Watch A* explore a random grid step by step")]
struct Args {
    #[arg(long, default_value_t = 20)]
    cols: usize,

    #[arg(long, default_value_t = 20)]
    rows: usize,

    #[arg(long, default_value_t = grid_astar::DEFAULT_WALL_PROBABILITY)]
    wall_probability: f64,

    /// Seed for wall placement, random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// chebyshev, euclidean or unit-step-euclidean
    #[arg(long, default_value = "chebyshev")]
    cost_model: CostModel,

    /// Pause between frames
    #[arg(long, default_value_t = 100)]
    delay_ms: u64,

    #[arg(long)]
    max_steps: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut config = GridConfig::new()
        .with_size(args.cols, args.rows)
        .with_wall_probability(args.wall_probability)
        .with_cost_model(args.cost_model);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut engine = SearchEngine::new(Grid::from_config(&config)?);
    let driver = StepDriver {
        max_steps: args.max_steps,
    };
    let mut renderer = TextRenderer::new(io::stdout());
    let delay = Duration::from_millis(args.delay_ms);
    let status = driver.run_with(&mut engine, &mut renderer, |_| thread::sleep(delay))?;

    match status {
        SearchStatus::Succeeded(path) => {
            println!("Path:");
            for p in path {
                println!("{:?}", p);
            }
        }
        SearchStatus::Failed => println!("No solution"),
        SearchStatus::Running => println!("Stopped after {} steps", engine.steps()),
    }
    Ok(())
}
