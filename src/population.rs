//! The pool of candidate states and the operations that grow and shrink it.

use rand::Rng;

use crate::config::GaikConfig;
use crate::evaluator::Evaluator;
use crate::goal::GoalRegion;
use crate::hill_climb::LocalSearch;
use crate::individual::{self, Individual};
use crate::refiner::Refiner;
use crate::space::StateSpace;

/// Ranked pool of individuals, trimmed back to `capacity` after each generation.
#[derive(Clone, Debug)]
pub struct Population<S> {
    individuals: Vec<Individual<S>>,
    capacity: usize,
}

impl<S> Population<S> {
    pub fn new(capacity: usize) -> Self {
        Self {
            individuals: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual<S>] {
        &self.individuals
    }

    pub fn push(&mut self, individual: Individual<S>) {
        self.individuals.push(individual);
    }

    /// Stable sort into rank order. Existing individuals keep precedence over
    /// later additions with the same fitness.
    pub fn rank(&mut self) {
        individual::rank(&mut self.individuals);
    }

    /// Keep only the top `capacity` individuals. Call after [`Population::rank`].
    pub fn trim(&mut self) {
        self.individuals.truncate(self.capacity);
    }

    /// Best individual, assuming the pool is ranked.
    pub fn best(&self) -> Option<&Individual<S>> {
        self.individuals.first()
    }

    pub fn valid_count(&self) -> usize {
        self.individuals.iter().filter(|i| i.is_valid()).count()
    }

    pub fn into_best(self) -> Option<Individual<S>> {
        self.individuals.into_iter().next()
    }
}

/// Seeds, expands and polishes a [`Population`].
pub struct Breeder<'a, Sp, L> {
    space: &'a Sp,
    config: &'a GaikConfig,
    range: f64,
    evaluator: Evaluator<'a, Sp>,
    refiner: Refiner<'a, Sp, L>,
}

impl<'a, Sp, L> Breeder<'a, Sp, L>
where
    Sp: StateSpace,
    L: LocalSearch<Sp>,
{
    pub fn new(space: &'a Sp, local_search: &'a L, config: &'a GaikConfig, range: f64) -> Self {
        Self {
            space,
            config,
            range,
            evaluator: Evaluator::new(space, config.validity),
            refiner: Refiner::new(
                space,
                local_search,
                config.max_improve_steps,
                range,
                config.validity,
            ),
        }
    }

    pub fn evaluations(&self) -> u64 {
        self.evaluator.evaluations()
    }

    /// Build and evaluate the initial pool.
    ///
    /// Hints go in verbatim (clamped to the space bounds), then the pool is
    /// filled with perturbations of the hints taken round-robin. Without hints
    /// the goal's representative state is used as the only seed; if the goal
    /// cannot produce one, the pool is sampled uniformly.
    pub fn seed<G, R>(
        &mut self,
        goal: &G,
        hints: &[Sp::State],
        rng: &mut R,
    ) -> anyhow::Result<Population<Sp::State>>
    where
        G: GoalRegion<Sp::State>,
        R: Rng,
    {
        let target = self.config.pool_size;
        let mut population = Population::new(target);
        let mut seeds = Vec::new();

        for hint in hints.iter().take(target) {
            let mut state = hint.clone();
            self.space.enforce_bounds(&mut state);
            seeds.push(state.clone());
            population.push(self.evaluator.evaluate(state, goal)?);
        }

        if seeds.is_empty() {
            if let Some(mut state) = goal.sample_goal(rng) {
                self.space.enforce_bounds(&mut state);
                seeds.push(state.clone());
                population.push(self.evaluator.evaluate(state, goal)?);
            }
        }

        let mut next = 0;
        while population.len() < target {
            let state = if seeds.is_empty() {
                self.space.sample_uniform(rng)?
            } else {
                let seed = &seeds[next % seeds.len()];
                next += 1;
                self.space.sample_uniform_near(rng, seed, self.range)?
            };
            population.push(self.evaluator.evaluate(state, goal)?);
        }

        Ok(population)
    }

    /// Add `pool_expansion` evaluated individuals to a ranked pool.
    ///
    /// The top `refine_count` individuals are hill climbed first; the rest of
    /// the batch are perturbations of the top `elite_fraction` of the pool.
    pub fn expand<G, R>(
        &mut self,
        population: &mut Population<Sp::State>,
        goal: &G,
        rng: &mut R,
    ) -> anyhow::Result<()>
    where
        G: GoalRegion<Sp::State>,
        R: Rng,
    {
        if population.is_empty() {
            return Ok(());
        }

        let batch = self.config.pool_expansion;
        let refine = self.config.refine_count.min(batch);
        let parents = self.config.parent_count(population.len());
        let mut offspring = Vec::with_capacity(batch);

        for individual in population.individuals().iter().take(refine) {
            if let Some(state) = self.refiner.refined_variant(individual, goal, rng)? {
                offspring.push(self.evaluator.evaluate(state, goal)?);
            }
        }

        let mut next = 0;
        while offspring.len() < batch {
            let parent = &population.individuals()[next % parents];
            next += 1;
            let state = self
                .space
                .sample_uniform_near(rng, parent.state(), self.range)?;
            offspring.push(self.evaluator.evaluate(state, goal)?);
        }

        for individual in offspring {
            population.push(individual);
        }
        Ok(())
    }

    /// Last refinement pass over the top `polish_count` individuals of a ranked pool.
    /// Returns how many refined variants were added.
    pub fn polish<G, R>(
        &mut self,
        population: &mut Population<Sp::State>,
        goal: &G,
        rng: &mut R,
    ) -> anyhow::Result<usize>
    where
        G: GoalRegion<Sp::State>,
        R: Rng,
    {
        let mut refined = Vec::new();
        for individual in population.individuals().iter().take(self.config.polish_count) {
            if let Some(state) = self.refiner.refined_variant(individual, goal, rng)? {
                refined.push(self.evaluator.evaluate(state, goal)?);
            }
        }

        let added = refined.len();
        for individual in refined {
            population.push(individual);
        }
        Ok(added)
    }
}
