//! Configuration loading and CLI argument parsing

use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use serde::Deserialize;

use genetic_ik::real_vector::euclidean;
use genetic_ik::GaikConfig;

/// Default time budget for one search, in seconds
pub const DEFAULT_BUDGET_SECS: f64 = 1.0;

#[derive(Parser, Debug)]
#[command(name = "ik_search")]
#[command(about = "Find a valid goal state for a motion planner with genetic IK")]
pub struct Args {
    /// Path to config file
    #[arg(short = 'c', long, default_value = "ik_search.toml")]
    pub config: String,

    /// Time budget in seconds (overrides config)
    #[arg(short = 'b', long)]
    pub budget: Option<f64>,

    /// RNG seed for a reproducible search (overrides config)
    #[arg(short = 's', long)]
    pub seed: Option<u64>,

    /// Do not check states for validity
    #[arg(long)]
    pub no_validity: bool,

    /// Verbose debug output (one line per generation)
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_budget")]
    pub budget_secs: f64,
    #[serde(default)]
    pub solver: GaikConfig,
    #[serde(default)]
    pub problem: ProblemConfig,
}

fn default_budget() -> f64 {
    DEFAULT_BUDGET_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            budget_secs: default_budget(),
            solver: GaikConfig::default(),
            problem: ProblemConfig::default(),
        }
    }
}

/// A spherical region of the space where states are invalid.
#[derive(Debug, Clone, Deserialize)]
pub struct Obstacle {
    pub center: Vec<f64>,
    pub radius: f64,
}

impl Obstacle {
    pub fn contains(&self, state: &[f64]) -> bool {
        euclidean(state, &self.center) <= self.radius
    }
}

#[derive(Debug, Deserialize)]
pub struct ProblemConfig {
    #[serde(default = "default_bounds")]
    pub bounds: Vec<(f64, f64)>,
    #[serde(default = "default_target")]
    pub target: Vec<f64>,
    #[serde(default)]
    pub goal_radius: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub hints: Vec<Vec<f64>>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

fn default_bounds() -> Vec<(f64, f64)> {
    vec![(-1.0, 1.0), (-1.0, 1.0)]
}
fn default_target() -> Vec<f64> {
    vec![0.5, 0.5]
}
fn default_threshold() -> f64 {
    0.01
}

impl ProblemConfig {
    /// Reject points whose dimension does not match the bounds.
    pub fn validate(&self) -> anyhow::Result<()> {
        let dimension = self.bounds.len();
        check_dimension("target", &self.target, dimension)?;
        for (i, hint) in self.hints.iter().enumerate() {
            check_dimension(&format!("hint {}", i), hint, dimension)?;
        }
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            check_dimension(&format!("obstacle {} center", i), &obstacle.center, dimension)?;
        }
        Ok(())
    }
}

fn check_dimension(what: &str, point: &[f64], dimension: usize) -> anyhow::Result<()> {
    if point.len() != dimension {
        bail!(
            "{} has {} coordinates but the space has {} dimensions",
            what,
            point.len(),
            dimension
        );
    }
    Ok(())
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
            target: default_target(),
            goal_radius: 0.0,
            threshold: default_threshold(),
            hints: Vec::new(),
            obstacles: Vec::new(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("Failed to parse {}: {}", path, e);
                Config::default()
            }),
            Err(_) => {
                log::warn!("No config file at {}, using defaults", path);
                Config::default()
            }
        }
    }

    /// Time budget for the search. Zero or negative means a single
    /// best-effort pass; an unrepresentably large one never runs out.
    pub fn budget(&self) -> anyhow::Result<Duration> {
        if self.budget_secs.is_nan() {
            bail!("time budget is not a number");
        }
        if self.budget_secs <= 0.0 {
            return Ok(Duration::ZERO);
        }
        Ok(Duration::try_from_secs_f64(self.budget_secs).unwrap_or(Duration::MAX))
    }

    /// Apply CLI overrides on top of the file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(budget) = args.budget {
            self.budget_secs = budget;
        }
        if args.seed.is_some() {
            self.solver.seed = args.seed;
        }
        if args.no_validity {
            self.solver.validity = genetic_ik::ValidityPolicy::Ignored;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
budget_secs = 0.5

[solver]
pool_size = 10
pool_expansion = 5
seed = 7

[problem]
bounds = [[-2.0, 2.0], [-2.0, 2.0], [0.0, 1.0]]
target = [1.0, 1.0, 0.5]
threshold = 0.1
hints = [[0.0, 0.0, 0.0]]

[[problem.obstacles]]
center = [0.5, 0.5, 0.5]
radius = 0.2
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap());

        assert_eq!(config.budget_secs, 0.5);
        assert_eq!(config.solver.pool_size, 10);
        assert_eq!(config.solver.pool_expansion, 5);
        assert_eq!(config.solver.seed, Some(7));
        assert_eq!(config.problem.bounds.len(), 3);
        assert_eq!(config.problem.hints, vec![vec![0.0, 0.0, 0.0]]);
        assert_eq!(config.problem.obstacles.len(), 1);
        assert!(config.problem.obstacles[0].contains(&[0.5, 0.6, 0.5]));
        assert!(!config.problem.obstacles[0].contains(&[0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = Config::load(path.to_str().unwrap());

        assert_eq!(config.budget_secs, DEFAULT_BUDGET_SECS);
        assert_eq!(config.solver, GaikConfig::default());
        assert_eq!(config.problem.target, default_target());
    }

    #[test]
    fn test_args_override_file() {
        let mut config = Config::load("/nonexistent/ik_search.toml");
        let args = Args::parse_from(["ik_search", "--budget", "2.5", "--seed", "9", "--no-validity"]);

        config.apply_args(&args);

        assert_eq!(config.budget_secs, 2.5);
        assert_eq!(config.solver.seed, Some(9));
        assert_eq!(config.solver.validity, genetic_ik::ValidityPolicy::Ignored);
    }

    #[test]
    fn test_budget_clamps_negative_to_zero() {
        let mut config = Config::default();
        assert_eq!(config.budget().unwrap(), Duration::from_secs(1));

        config.budget_secs = -3.0;
        assert_eq!(config.budget().unwrap(), Duration::ZERO);

        config.budget_secs = 0.0;
        assert_eq!(config.budget().unwrap(), Duration::ZERO);

        config.budget_secs = f64::INFINITY;
        assert_eq!(config.budget().unwrap(), Duration::MAX);

        config.budget_secs = f64::NAN;
        assert!(config.budget().is_err());
    }

    #[test]
    fn test_problem_rejects_mismatched_dimensions() {
        let mut problem = ProblemConfig::default();
        problem.validate().unwrap();

        problem.hints = vec![vec![0.0, 0.0], vec![0.0, 0.0, 0.0]];
        let err = problem.validate().unwrap_err();
        assert!(err.to_string().contains("hint 1"));

        problem.hints.clear();
        problem.obstacles = vec![Obstacle {
            center: vec![0.5],
            radius: 0.2,
        }];
        let err = problem.validate().unwrap_err();
        assert!(err.to_string().contains("obstacle 0 center"));

        problem.obstacles.clear();
        problem.target = vec![0.5, 0.5, 0.5];
        assert!(problem.validate().is_err());
    }
}
