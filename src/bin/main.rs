use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use owo_colors::OwoColorize;
use thiserror::Error;

use robot_nav::algorithms::DEFAULT_DEPTH_LIMIT;
use robot_nav::algorithms::StrategyName;
use robot_nav::multi_goal::nearest_leg;
use robot_nav::multi_goal::plan_tour;
use robot_nav::problem::Problem;
use robot_nav::problems::robot_nav::RobotNavParseError;
use robot_nav::search::Solution;
use robot_nav::space::Coordinate;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Finds a path for a robot through a maze.
#[derive(Parser, Debug)]
#[clap(long_version = robot_nav::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Problem in the robot navigation format.
    #[arg()]
    pub file: PathBuf,

    /// Search method, one of DFS, BFS, GBFS, AS, CUS1 or CUS2.
    #[arg()]
    pub method: StrategyName,

    /// Visit every goal instead of stopping at the nearest one.
    #[arg(long)]
    pub all_goals: bool,

    /// Depth at which CUS1 stops expanding nodes.
    #[arg(long, env = "ROBOT_NAV_DEPTH_LIMIT", default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth_limit: u32,

    /// Print memory statistics of the search to stderr.
    #[arg(long)]
    pub stats: bool,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    Parse(#[from] RobotNavParseError),
    #[error("Failed to write the solution: {0}")]
    Io(#[from] std::io::Error),
}

fn print_solution(args: &Args, reached: &[Coordinate], solution: &Solution) {
    println!("{} {}", args.file.display(), args.method);
    if !solution.is_found() {
        println!(
            "{}; {}",
            "No goal is reachable".red(),
            solution.node_count()
        );
        return;
    }

    let reached: Vec<String> = reached.iter().map(|g| g.to_string()).collect();
    println!("{} {}", reached.join(" "), solution.node_count());
    println!("{solution}");
}

fn run(args: &Args) -> Result<(), MainError> {
    let problem = Problem::try_from(args.file.as_path())?;
    log::debug!("Loaded {problem}");
    let strategy = args.method.strategy(args.depth_limit);

    let (reached, solution) = if args.all_goals {
        let tour = plan_tour(&problem, strategy);
        (tour.visits, tour.solution)
    } else {
        match nearest_leg(problem.space(), problem.start(), problem.goals(), &strategy) {
            Some(leg) => (vec![leg.goal], leg.solution),
            None => (vec![], Solution::empty()),
        }
    };

    print_solution(args, &reached, &solution);
    if args.stats {
        let mut err = anstream::stderr().lock();
        solution.write_memory_stats(&mut err)?;
        err.flush()?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    args.color.write_global();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}
