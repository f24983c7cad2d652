//! Genetic IK search - command line front end
//!
//! Runs one search over a bounded real vector space described in the config
//! file (bounds, goal ball, spherical obstacles, hint states) and prints the
//! report as JSON. Exits with status 1 when no valid state was found.

mod config;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;

use genetic_ik::real_vector::{BallGoal, RealVectorSpace};
use genetic_ik::{Gaik, GenerationStats, Phase, SearchReport};

use config::{Args, Config};

#[derive(Serialize)]
struct Output<'a> {
    solved: bool,
    phase: Phase,
    state: Option<&'a [f64]>,
    distance: Option<f64>,
    valid: Option<bool>,
    generations: usize,
    total_evaluated: u64,
    elapsed_secs: f64,
    history: &'a [GenerationStats],
}

impl<'a> Output<'a> {
    fn from_report(report: &'a SearchReport<Vec<f64>>) -> Self {
        Self {
            solved: report.solved,
            phase: report.phase,
            state: report.best.as_ref().map(|b| b.state().as_slice()),
            distance: report.best.as_ref().map(|b| b.distance()),
            valid: report.best.as_ref().map(|b| b.is_valid()),
            generations: report.generations,
            total_evaluated: report.total_evaluated,
            elapsed_secs: report.elapsed.as_secs_f64(),
            history: &report.history,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = Config::load(&args.config);
    config.apply_args(&args);

    let budget = config.budget()?;

    let problem = &config.problem;
    problem.validate().context("invalid problem")?;

    let obstacles = problem.obstacles.clone();
    let space = RealVectorSpace::new(problem.bounds.clone())
        .context("invalid space bounds")?
        .with_validity(move |state: &Vec<f64>| !obstacles.iter().any(|o| o.contains(state)));
    let goal = BallGoal::new(problem.target.clone(), problem.goal_radius, problem.threshold);

    let solver = Gaik::with_config(space, config.solver.clone()).context("invalid solver configuration")?;

    log::info!(
        "Searching {}-D space for {:.2}s (pool {}, expansion {}, range {:.4}, {} hints, {} obstacles)",
        problem.bounds.len(),
        config.budget_secs,
        solver.pool_size(),
        solver.pool_expansion_size(),
        solver.range(),
        problem.hints.len(),
        problem.obstacles.len()
    );

    let report = solver.solve_with_report(budget, &goal, &problem.hints)?;

    println!("{}", serde_json::to_string_pretty(&Output::from_report(&report))?);

    if !report.solved {
        std::process::exit(1);
    }
    Ok(())
}
