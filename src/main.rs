use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};

use slider_astar::render;
use slider_astar::wire::{SolveRequest, SolveResponse};
use slider_astar::{Puzzle, SearchLimits, SearchOutcome, Solver};

/// Optimal sliding-tile puzzle solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Puzzle file: JSON {"puzzle": [[..]], "goal": [[..]]} or rows of numbers.
    /// Read from stdin when no file and no generator is given.
    #[arg(short, long, conflicts_with_all = ["shuffle", "scramble"])]
    input: Option<PathBuf>,

    /// Goal file in the same formats; defaults to 1..N*N-1 with the blank last
    #[arg(short, long)]
    goal: Option<PathBuf>,

    /// Side length for generated puzzles
    #[arg(short, long, default_value_t = 4)]
    size: usize,

    /// Solve a uniformly random solvable puzzle
    #[arg(long, conflicts_with = "scramble")]
    shuffle: bool,

    /// Solve a puzzle made by a random walk of this many moves from the goal
    #[arg(long, value_name = "STEPS")]
    scramble: Option<usize>,

    /// Seed for --shuffle and --scramble
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after expanding this many configurations
    #[arg(short = 'm', long)]
    max_expansions: Option<usize>,

    /// Print the result as a JSON response
    #[arg(long)]
    json: bool,

    /// Only print the move count
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let debug_enabled = std::env::var("SLIDER_DEBUG").is_ok();
    slider_astar::log::init_logger(debug_enabled);

    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let (start, request_goal) = load_start(&cli)?;
    let goal = match &cli.goal {
        Some(path) => SolveRequest::parse(&fs::read_to_string(path)?)?.start()?,
        None => match request_goal {
            Some(goal) => goal,
            None => Puzzle::goal(start.side())?,
        },
    };

    if !cli.quiet && !cli.json {
        println!("Puzzle:\n{start}");
    }
    if !start.is_solvable_towards(&goal) {
        log::info!("start and goal differ in parity; the search will exhaust the reachable space");
    }

    let solver = Solver::new(SearchLimits {
        max_expansions: cli.max_expansions,
    });
    let t_solve = Instant::now();
    let outcome = solver.solve(&start, &goal)?;
    let solve_secs = t_solve.elapsed().as_secs_f64();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&SolveResponse::from(&outcome))?);
    } else {
        match &outcome {
            SearchOutcome::Solved(solution) if cli.quiet => println!("{}", solution.move_count()),
            SearchOutcome::Solved(solution) => render::write_solution(&mut io::stdout().lock(), solution)?,
            SearchOutcome::NoSolution(_) => println!("No solution found."),
            SearchOutcome::LimitExceeded(stats) => {
                println!("Search limit exceeded after {} expansions.", stats.expanded)
            }
        }
    }

    let stats = outcome.stats();
    eprintln!(
        "Expanded {} configurations ({} discovered, {} stale) in {:.3}s.",
        stats.expanded, stats.discovered, stats.stale_skipped, solve_secs
    );

    Ok(())
}

/// Start puzzle plus any goal carried by a JSON request.
fn load_start(cli: &Cli) -> Result<(Puzzle, Option<Puzzle>), Box<dyn std::error::Error>> {
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if cli.shuffle {
        return Ok((Puzzle::shuffled(cli.size, &mut rng)?, None));
    }
    if let Some(steps) = cli.scramble {
        return Ok((Puzzle::scrambled(cli.size, steps, &mut rng)?, None));
    }

    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let request = SolveRequest::parse(&text)?;
    let goal = request.goal.as_ref().map(|_| request.goal()).transpose()?;
    Ok((request.start()?, goal))
}
