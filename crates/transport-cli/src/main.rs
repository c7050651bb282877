use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;
use transport_core::{Mode, Op, Restriction, TransportTable};

mod problem;

use problem::ProblemFile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a transportation problem read from a JSON problem file.
    Solve {
        /// Path to the problem file
        #[arg(short, long)]
        input: PathBuf,

        /// Initial-basic-feasible-solution heuristic used for `--basic-only`
        #[arg(long, value_enum, default_value_t = HeuristicArg::MinCost)]
        mode: HeuristicArg,

        /// Stop after the initial heuristic instead of optimizing
        #[arg(long)]
        basic_only: bool,

        /// Solve via the capacitated driver (requires the problem file to
        /// carry a `capacities` grid)
        #[arg(long)]
        capacity: bool,

        /// Override the capacitated driver's basis-sampling seed
        #[arg(long)]
        seed: Option<u64>,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum HeuristicArg {
    Nw,
    MinCost,
    Vogel,
}

impl From<HeuristicArg> for Mode {
    fn from(value: HeuristicArg) -> Self {
        match value {
            HeuristicArg::Nw => Mode::NorthWest,
            HeuristicArg::MinCost => Mode::MinCost,
            HeuristicArg::Vogel => Mode::Vogel,
        }
    }
}

fn build_table(problem: &ProblemFile) -> anyhow::Result<TransportTable> {
    let mut table = TransportTable::new(
        problem.suppliers.clone(),
        problem.consumers.clone(),
        problem.prices.clone(),
        problem.capacities.clone(),
    )?;

    if !problem.restrictions.is_empty() {
        let mut restrictions = transport_core::RestrictionMap::new();
        for (key, value) in &problem.restrictions {
            let (row, col) = Restriction::parse_key(key)?;
            let restriction = Restriction::parse_value(value)?;
            restrictions.insert((row, col), restriction);
        }
        table = table.with_restrictions(restrictions)?;
    }

    Ok(table)
}

fn run_solve(
    input: &PathBuf,
    mode: HeuristicArg,
    basic_only: bool,
    capacity: bool,
    seed: Option<u64>,
    pretty: bool,
) -> anyhow::Result<()> {
    let problem = ProblemFile::load(input)?;
    let mut table = build_table(&problem)?;
    if let Some(seed) = seed {
        table = table.with_seed(seed);
    }

    if basic_only {
        info!("running {mode:?} heuristic only");
        let (cells, cost) = table.create_basic_plan(mode.into());
        print_json(&serde_json::json!({ "roots": cells, "price": cost }), pretty)
    } else if capacity {
        info!("solving capacitated plan");
        let solution = table.solve_capacity_plan()?;
        print_json(&solution, pretty)
    } else {
        info!("solving optimal plan");
        let solution = table.create_optimal_plan()?;
        print_json(&solution, pretty)
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{rendered}");
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let result = match &cli.command {
        Commands::Solve {
            input,
            mode,
            basic_only,
            capacity,
            seed,
            pretty,
        } => run_solve(input, *mode, *basic_only, *capacity, *seed, *pretty),
    };

    if let Err(err) = result {
        error!("solve failed: {err}");
        std::process::exit(1);
    }
}
