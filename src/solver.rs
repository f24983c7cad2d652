//! Inverse kinematics by genetic search.
//!
//! [`Gaik`] looks for a valid state inside (or close to) a goal region. It
//! keeps a ranked pool of candidate states, grows it each generation with
//! perturbations of the best candidates and hill-climbed variants of the very
//! best, then trims it back. Valid states always rank ahead of invalid ones,
//! so the search never reports a known-invalid state as a solution.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::config::{self, GaikConfig, RANGE_RESOLUTION_FACTOR};
use crate::error::{ConfigError, Error};
use crate::evaluator::ValidityPolicy;
use crate::goal::GoalRegion;
use crate::hill_climb::{HillClimbing, LocalSearch};
use crate::individual::{Individual, RankKey};
use crate::phase::{Observation, Phase};
use crate::population::{Breeder, Population};
use crate::space::StateSpace;

/// Statistics for a ranked generation. Generation 0 is the seeded pool.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub best_distance: f64,
    pub best_valid: bool,
    pub valid_count: usize,
    pub pool_size: usize,
    pub total_evaluated: u64,
    pub stagnation_generations: usize,
}

/// Everything a search produced.
#[derive(Clone, Debug)]
pub struct SearchReport<S> {
    /// Whether `best` is an acceptable solution.
    pub solved: bool,
    /// Best individual found, reported even when the search failed.
    pub best: Option<Individual<S>>,
    /// Phase the search ended in.
    pub phase: Phase,
    pub generations: usize,
    pub total_evaluated: u64,
    pub elapsed: Duration,
    pub history: Vec<GenerationStats>,
}

impl<S> SearchReport<S> {
    /// The solution state, if the search succeeded.
    pub fn into_solution(self) -> Option<S> {
        if self.solved {
            self.best.map(Individual::into_state)
        } else {
            None
        }
    }
}

/// Genetic inverse kinematics solver over a state space.
pub struct Gaik<Sp, L = HillClimbing> {
    space: Sp,
    local_search: L,
    config: GaikConfig,
}

impl<Sp: StateSpace> Gaik<Sp, HillClimbing> {
    /// Solver with the default configuration and hill climbing.
    pub fn new(space: Sp) -> Self {
        Self {
            space,
            local_search: HillClimbing::default(),
            config: GaikConfig::default(),
        }
    }

    /// Solver with hill climbing and the given configuration.
    pub fn with_config(space: Sp, config: GaikConfig) -> Result<Self, ConfigError> {
        let local_search = HillClimbing::new(config.acceptance);
        Self::with_local_search(space, local_search, config)
    }
}

impl<Sp, L> Gaik<Sp, L>
where
    Sp: StateSpace,
    L: LocalSearch<Sp>,
{
    /// Solver with a custom local search.
    pub fn with_local_search(space: Sp, local_search: L, config: GaikConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            space,
            local_search,
            config,
        })
    }

    pub fn space(&self) -> &Sp {
        &self.space
    }

    pub fn local_search(&self) -> &L {
        &self.local_search
    }

    pub fn config(&self) -> &GaikConfig {
        &self.config
    }

    pub fn set_pool_size(&mut self, size: usize) -> Result<(), ConfigError> {
        self.config.pool_size = config::validate_pool_size(size)?;
        Ok(())
    }

    pub fn pool_size(&self) -> usize {
        self.config.pool_size
    }

    pub fn set_pool_expansion_size(&mut self, size: usize) -> Result<(), ConfigError> {
        self.config.pool_expansion = config::validate_pool_expansion(size)?;
        Ok(())
    }

    pub fn pool_expansion_size(&self) -> usize {
        self.config.pool_expansion
    }

    pub fn set_max_improve_steps(&mut self, steps: u32) {
        self.config.max_improve_steps = steps;
    }

    pub fn max_improve_steps(&self) -> u32 {
        self.config.max_improve_steps
    }

    pub fn set_validity_check(&mut self, check: bool) {
        self.config.validity = ValidityPolicy::from_flag(check);
    }

    pub fn validity_check(&self) -> bool {
        self.config.validity.is_checked()
    }

    pub fn set_validity_policy(&mut self, policy: ValidityPolicy) {
        self.config.validity = policy;
    }

    pub fn validity_policy(&self) -> ValidityPolicy {
        self.config.validity
    }

    pub fn set_range(&mut self, range: f64) -> Result<(), ConfigError> {
        self.config.range = Some(config::validate_range(range)?);
        Ok(())
    }

    /// Sampling range in effect: the configured one, or the space's
    /// validity resolution scaled up.
    pub fn range(&self) -> f64 {
        self.config.range.unwrap_or_else(|| {
            self.space.validity_checking_resolution() * RANGE_RESOLUTION_FACTOR
        })
    }

    pub fn set_seed(&mut self, seed: Option<u64>) {
        self.config.seed = seed;
    }

    /// Find a valid state in `goal` within `budget`, seeding from `hints`.
    ///
    /// Returns `Ok(None)` when no acceptable state was found.
    pub fn solve<G>(
        &self,
        budget: Duration,
        goal: &G,
        hints: &[Sp::State],
    ) -> Result<Option<Sp::State>, Error>
    where
        G: GoalRegion<Sp::State>,
    {
        Ok(self.solve_with_report(budget, goal, hints)?.into_solution())
    }

    /// Like [`Gaik::solve`], but returns the full [`SearchReport`].
    pub fn solve_with_report<G>(
        &self,
        budget: Duration,
        goal: &G,
        hints: &[Sp::State],
    ) -> Result<SearchReport<Sp::State>, Error>
    where
        G: GoalRegion<Sp::State>,
    {
        let start = Instant::now();
        let deadline = start.checked_add(budget);
        let time_left = || deadline.map_or(true, |d| Instant::now() < d);

        let range = self.range();
        config::validate_range(range)?;

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut breeder = Breeder::new(&self.space, &self.local_search, &self.config, range);
        let mut population = Population::new(self.config.pool_size);
        let mut phase = Phase::Seeding;
        let mut generations = 0;
        let mut best_key: Option<RankKey> = None;
        let mut stagnation = 0;
        let mut history = Vec::new();

        while !phase.is_terminal() {
            match phase {
                Phase::Seeding => {
                    population = breeder.seed(goal, hints, &mut rng)?;
                }
                Phase::Expanding => {
                    generations += 1;
                    breeder.expand(&mut population, goal, &mut rng)?;
                }
                Phase::Ranking => {
                    population.rank();
                    population.trim();

                    let current = population.best().map(Individual::rank_key);
                    match (current, best_key) {
                        (Some(current), Some(previous)) if current >= previous => stagnation += 1,
                        _ => {
                            stagnation = 0;
                            best_key = current;
                        }
                    }

                    let stats = generation_stats(&population, generations, breeder.evaluations(), stagnation);
                    log::debug!(
                        "generation {} | best distance {:.6} valid={} | {} / {} valid | {} evaluated",
                        stats.generation,
                        stats.best_distance,
                        stats.best_valid,
                        stats.valid_count,
                        stats.pool_size,
                        stats.total_evaluated
                    );
                    history.push(stats);
                }
                Phase::Converged | Phase::TimedOut | Phase::Stagnated => {}
            }

            let observation = Observation {
                best_reached: is_reached(population.best(), goal),
                time_left: time_left(),
                stagnant: stagnation >= self.config.max_stagnant_generations,
            };
            phase = phase.next(observation);
        }

        if phase != Phase::Converged && self.config.polish_count > 0 {
            let added = breeder.polish(&mut population, goal, &mut rng)?;
            if added > 0 {
                population.rank();
                population.trim();
                if is_reached(population.best(), goal) {
                    log::debug!("final refinement reached the goal");
                    phase = Phase::Converged;
                }
            }
        }

        let total_evaluated = breeder.evaluations();
        let best = population.into_best();
        let solved = best.as_ref().map_or(false, |b| {
            b.is_valid() && (!self.config.require_satisfaction || goal.is_reached(b.distance()))
        });
        let elapsed = start.elapsed();

        log::info!(
            "Search {} after {} generations in {:.3}s ({:?}, {} evaluated)",
            if solved { "solved" } else { "failed" },
            generations,
            elapsed.as_secs_f64(),
            phase,
            total_evaluated
        );
        if !solved {
            log::warn!(
                "No acceptable state found (best distance {:?}, valid {:?})",
                best.as_ref().map(Individual::distance),
                best.as_ref().map(Individual::is_valid)
            );
        }

        Ok(SearchReport {
            solved,
            best,
            phase,
            generations,
            total_evaluated,
            elapsed,
            history,
        })
    }
}

fn is_reached<S, G: GoalRegion<S>>(best: Option<&Individual<S>>, goal: &G) -> bool {
    best.map_or(false, |b| b.is_valid() && goal.is_reached(b.distance()))
}

fn generation_stats<S>(
    population: &Population<S>,
    generation: usize,
    total_evaluated: u64,
    stagnation: usize,
) -> GenerationStats {
    let best = population.best();
    GenerationStats {
        generation,
        best_distance: best.map_or(f64::INFINITY, Individual::distance),
        best_valid: best.map_or(false, Individual::is_valid),
        valid_count: population.valid_count(),
        pool_size: population.len(),
        total_evaluated,
        stagnation_generations: stagnation,
    }
}
