use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use skirmish_mapgen::evaluate::score_breakdown;
use skirmish_mapgen::export;
use skirmish_mapgen::generator::MutationPolicy;
use skirmish_mapgen::optimizer::CandidateStrategy;
use skirmish_mapgen::{generate_and_climb, MapgenConfig, MapgenError};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Clone,
    Rollback,
}

impl From<StrategyArg> for CandidateStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Clone => CandidateStrategy::Clone,
            StrategyArg::Rollback => CandidateStrategy::Rollback,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "skirmish_mapgen")]
#[command(about = "Generate and hill-climb a two-player strategy game map")]
struct Args {
    /// Map width in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Map height in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Hill-climb iterations
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Where to write the game state
    #[arg(short, long, default_value = "map.xml")]
    output: PathBuf,

    /// JSON config file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// How search candidates are built
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Let mutations paint over player, mine and peasant cells
    #[arg(long)]
    unrestricted: bool,

    /// Print the final map and its score breakdown
    #[arg(long)]
    preview: bool,
}

fn build_config(args: &Args) -> Result<MapgenConfig, MapgenError> {
    let mut config = match &args.config {
        Some(path) => MapgenConfig::load(path)?,
        None => MapgenConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(iterations) = args.iterations {
        config.climb.iterations = iterations;
    }
    if let Some(strategy) = args.strategy {
        config.climb.strategy = strategy.into();
    }
    if args.unrestricted {
        config.climb.policy = MutationPolicy::Unrestricted;
    }

    config.validate()?;
    Ok(config)
}

fn run(args: Args) -> Result<(), MapgenError> {
    let config = build_config(&args)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    info!(seed, width = config.width, height = config.height, "generating map");

    let report = generate_and_climb(&config, &mut rng)?;
    info!(
        initial_score = report.initial_score,
        best_score = report.best_score,
        accepted = report.accepted,
        "search complete"
    );

    if args.preview {
        let breakdown = score_breakdown(&report.best);
        print!("{}", report.best);
        println!(
            "score {} = base distance {} + resource balance {} + map geometry {}",
            breakdown.total(),
            breakdown.base_distance,
            breakdown.resource_balance,
            breakdown.map_geometry
        );
    }

    export::save_to_file(&report.best, &args.output)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skirmish_mapgen=info")),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
