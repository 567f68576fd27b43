/// Comparison tool
///
/// Runs every strategy on random instances of each maze and writes an org
/// report with what each of them found and how long it took.
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anstream::eprintln;
use anstream::println;
use clap::Parser;
use hrsw::Stopwatch;
use human_duration::human_duration;
use owo_colors::OwoColorize;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use robot_nav::algorithms::DEFAULT_DEPTH_LIMIT;
use robot_nav::algorithms::StrategyName;
use robot_nav::debug::write_type_sizes;
use robot_nav::multi_goal::plan_tour;
use robot_nav::problem::Problem;
use robot_nav::problems::robot_nav::write_problem;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(long_version = robot_nav::build::CLAP_LONG_VERSION)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(short, long, env = "LOGS_COMPARE", default_value = "logs/compare.org")]
    pub output: PathBuf,

    #[arg()]
    pub problems: Vec<PathBuf>,

    #[arg(long, default_value_t = 10u64)]
    pub num_instances: u64,
    #[arg(long, default_value_t = 3u16)]
    pub instance_goals: u16,
    #[arg(long, env = "ROBOT_NAV_DEPTH_LIMIT", default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth_limit: u32,

    #[command(flatten)]
    color: colorchoice_clap::Color,
}

fn write_header<W: Write>(out: &mut W) -> std::io::Result<()> {
    writeln!(out, ":PROPERTIES:")?;
    writeln!(out, ":VERSION: {:?}", robot_nav::build::PKG_VERSION)?;
    writeln!(out, ":GIT_BRANCH: {:?}", shadow_rs::branch())?;
    writeln!(out, ":BUILD_IS_DEBUG: {}", shadow_rs::is_debug())?;
    if robot_nav::build::GIT_CLEAN {
        writeln!(out, ":GIT_STATUS: CLEAN")?;
    } else {
        writeln!(out, ":GIT_STATUS: DIRTY")?;
    }
    writeln!(out, ":END:")?;
    writeln!(out, "#+title: Robot navigation strategies")?;
    writeln!(out)?;
    writeln!(out, "* Types")?;
    write_type_sizes(out)?;
    writeln!(out)
}

fn compare<W: Write>(out: &mut W, problem: &Problem, depth_limit: u32) -> std::io::Result<()> {
    writeln!(out, "| Method | Status | Visits | Path | Nodes | Time |")?;
    writeln!(out, "|--------+--------+--------+------+-------+------|")?;
    for name in StrategyName::ALL {
        let mut stopwatch = Stopwatch::new_started();
        let tour = plan_tour(problem, name.strategy(depth_limit));
        stopwatch.stop();

        writeln!(
            out,
            "| {name} | {} | {}/{} | {} | {} | {} |",
            tour.solution.status,
            tour.visits.len(),
            problem.goals().len(),
            tour.solution.path.len(),
            tour.solution.node_count(),
            human_duration(&stopwatch.elapsed()),
        )?;
    }
    Ok(())
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();
    args.color.write_global();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    println!("Logging to {:?}", args.output.yellow());

    if let Some(dir) = args.output.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = File::create(&args.output)?;
    let mut out = BufWriter::new(file);
    write_header(&mut out)?;

    writeln!(out, "* Runs")?;
    for path in &args.problems {
        let base_problem = match Problem::try_from(path.as_path()) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{} {path:?}: {e}", "Skipping".red());
                continue;
            }
        };
        writeln!(out, "** Maze {:?} {}", path, base_problem.space().size())?;
        writeln!(out, "*** Map")?;
        writeln!(out, "#+begin_quote\n{base_problem}\n#+end_quote")?;
        writeln!(out, "*** Given goals")?;
        compare(&mut out, &base_problem, args.depth_limit)?;
        writeln!(out, "*** Problems")?;

        for instance in 0..args.num_instances {
            writeln!(out, "**** Problem {instance}")?;
            let mut rng = ChaCha8Rng::seed_from_u64(instance);
            if let Some(problem) = base_problem.randomize(&mut rng, args.instance_goals) {
                writeln!(out, "- Start: {}", problem.start())?;
                writeln!(out, "- Goals:")?;
                for goal in problem.goals() {
                    writeln!(out, "  - {goal}")?;
                }
                writeln!(out, "#+begin_src text")?;
                write_problem(&problem, &mut out)?;
                writeln!(out, "#+end_src")?;
                compare(&mut out, &problem, args.depth_limit)?;
            } else {
                writeln!(
                    out,
                    "FIXME Failed to generate random problem with seed {} with {} goals",
                    instance, args.instance_goals,
                )?;
            }
        }
    }

    out.flush()
}
