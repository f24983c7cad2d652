//! Adapter between the population and a [`LocalSearch`].

use rand::Rng;

use crate::evaluator::ValidityPolicy;
use crate::goal::GoalRegion;
use crate::hill_climb::LocalSearch;
use crate::individual::Individual;
use crate::space::StateSpace;

/// Runs the local search on individuals with the solver's step budget.
///
/// Refinement only moves states. The caller re-evaluates whatever comes back.
pub struct Refiner<'a, Sp, L> {
    space: &'a Sp,
    local_search: &'a L,
    max_steps: u32,
    range: f64,
    validity: ValidityPolicy,
}

impl<'a, Sp, L> Refiner<'a, Sp, L>
where
    Sp: StateSpace,
    L: LocalSearch<Sp>,
{
    pub fn new(
        space: &'a Sp,
        local_search: &'a L,
        max_steps: u32,
        range: f64,
        validity: ValidityPolicy,
    ) -> Self {
        Self {
            space,
            local_search,
            max_steps,
            range,
            validity,
        }
    }

    /// Step size for refining an individual: its own goal distance, capped by the range.
    pub fn near_distance(&self, individual: &Individual<Sp::State>) -> f64 {
        individual.distance().min(self.range)
    }

    /// Refine `state` in place. Returns whether it moved.
    pub fn refine<G, R>(
        &self,
        state: &mut Sp::State,
        near_distance: f64,
        goal: &G,
        rng: &mut R,
    ) -> anyhow::Result<bool>
    where
        G: GoalRegion<Sp::State>,
        R: Rng,
    {
        self.local_search.improve(
            self.space,
            goal,
            state,
            near_distance,
            self.max_steps,
            self.validity,
            rng,
        )
    }

    /// Refined copy of an individual's state, or `None` if no step was taken.
    pub fn refined_variant<G, R>(
        &self,
        individual: &Individual<Sp::State>,
        goal: &G,
        rng: &mut R,
    ) -> anyhow::Result<Option<Sp::State>>
    where
        G: GoalRegion<Sp::State>,
        R: Rng,
    {
        let mut state = individual.state().clone();
        let near_distance = self.near_distance(individual);
        if self.refine(&mut state, near_distance, goal, rng)? {
            Ok(Some(state))
        } else {
            Ok(None)
        }
    }
}
