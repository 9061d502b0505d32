use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use satlab::{
    benchmark::{self, Outcome},
    dimacs, Algorithm, Solution, WalkSat,
};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Debug, Parser)]
#[command(version, about = "Classic SAT algorithms on DIMACS CNF files")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve one DIMACS file
    Solve {
        #[arg(value_enum)]
        algorithm: Algorithm,
        path: PathBuf,
        /// Print the solution as JSON instead of the competition format
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        walksat: WalkSatArgs,
    },
    /// Solve every `.cnf` file under a directory
    Bench {
        #[arg(value_enum)]
        algorithm: Algorithm,
        dir: PathBuf,
        /// Append results to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[command(flatten)]
        walksat: WalkSatArgs,
    },
}

#[derive(Debug, Args)]
struct WalkSatArgs {
    /// Flip budget of WalkSAT
    #[arg(long, default_value_t = 10_000)]
    max_flips: usize,
    /// Probability of a random walk step of WalkSAT
    #[arg(long, default_value_t = 0.5)]
    noise: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl From<&WalkSatArgs> for WalkSat {
    fn from(args: &WalkSatArgs) -> Self {
        WalkSat {
            max_flips: args.max_flips,
            noise: args.noise,
            seed: args.seed,
        }
    }
}

fn solve(algorithm: Algorithm, path: &Path, json: bool, walksat: WalkSat) -> Result<()> {
    let input =
        dimacs::parse_file(path).with_context(|| format!("Cannot read {}", path.display()))?;
    log::info!(
        "{}: {} variables declared, {} clauses",
        path.display(),
        input.num_vars,
        input.num_clauses()
    );
    let mut solver = algorithm.solver(walksat);
    let solution = solver.solve(&input.cnf);

    if json {
        println!("{}", serde_json::to_string_pretty(&solution)?);
        return Ok(());
    }
    match &solution {
        Solution::Sat(state) => {
            println!("s SATISFIABLE");
            if state.is_empty() {
                println!("v 0");
            } else {
                println!("v {} 0", state);
            }
        }
        Solution::UnSat => println!("s UNSATISFIABLE"),
        Solution::Unknown => println!("s UNKNOWN"),
    }
    Ok(())
}

fn bench(
    algorithm: Algorithm,
    dir: &Path,
    csv: Option<PathBuf>,
    json: Option<PathBuf>,
    timeout: Option<Duration>,
    walksat: WalkSat,
) -> Result<()> {
    let paths = benchmark::find_instances(dir)?;
    let report = benchmark::benchmark(&paths, algorithm, walksat, timeout);
    eprintln!(
        "{} SAT, {} UNSAT, {} unknown, {} timeout, {} errors",
        report.count(&Outcome::Sat),
        report.count(&Outcome::UnSat),
        report.count(&Outcome::Unknown),
        report.count(&Outcome::Timeout),
        report
            .records
            .iter()
            .filter(|r| matches!(r.outcome, Outcome::Error(_)))
            .count()
    );
    if let Some(csv) = csv {
        benchmark::append_csv(&csv, &report.records)?;
    }
    if let Some(json) = json {
        let out = serde_json::to_string_pretty(&report)?;
        std::fs::write(&json, out).with_context(|| format!("Cannot write {}", json.display()))?;
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Solve {
            algorithm,
            path,
            json,
            walksat,
        } => solve(algorithm, &path, json, WalkSat::from(&walksat)),
        Command::Bench {
            algorithm,
            dir,
            csv,
            json,
            timeout_secs,
            walksat,
        } => bench(
            algorithm,
            &dir,
            csv,
            json,
            timeout_secs.map(Duration::from_secs),
            WalkSat::from(&walksat),
        ),
    }
}
