//! Candidate evaluation: goal distance plus validity.

use serde::{Deserialize, Serialize};

use crate::goal::GoalRegion;
use crate::individual::{Fitness, Individual};
use crate::space::StateSpace;

/// Whether states are run through the space's validity predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityPolicy {
    /// Every state is checked with [`StateSpace::is_valid`].
    #[default]
    Checked,
    /// Every state counts as valid; ranking reduces to goal distance.
    Ignored,
}

impl ValidityPolicy {
    pub fn from_flag(check: bool) -> Self {
        if check {
            Self::Checked
        } else {
            Self::Ignored
        }
    }

    pub fn is_checked(self) -> bool {
        matches!(self, Self::Checked)
    }

    /// Validity of `state` under this policy.
    pub fn check<Sp: StateSpace>(self, space: &Sp, state: &Sp::State) -> anyhow::Result<bool> {
        match self {
            Self::Checked => space.is_valid(state),
            Self::Ignored => Ok(true),
        }
    }
}

/// Annotates states with their fitness.
pub struct Evaluator<'a, Sp> {
    space: &'a Sp,
    policy: ValidityPolicy,
    evaluations: u64,
}

impl<'a, Sp: StateSpace> Evaluator<'a, Sp> {
    pub fn new(space: &'a Sp, policy: ValidityPolicy) -> Self {
        Self {
            space,
            policy,
            evaluations: 0,
        }
    }

    pub fn policy(&self) -> ValidityPolicy {
        self.policy
    }

    /// Number of states evaluated so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Compute `(distance, valid)` for a state.
    pub fn fitness<G>(&mut self, state: &Sp::State, goal: &G) -> anyhow::Result<Fitness>
    where
        G: GoalRegion<Sp::State>,
    {
        let distance = goal.distance_goal(state)?;
        let valid = self.policy.check(self.space, state)?;
        self.evaluations += 1;
        Ok(Fitness::new(distance, valid))
    }

    /// Evaluate a state into an [`Individual`].
    pub fn evaluate<G>(&mut self, state: Sp::State, goal: &G) -> anyhow::Result<Individual<Sp::State>>
    where
        G: GoalRegion<Sp::State>,
    {
        let fitness = self.fitness(&state, goal)?;
        Ok(Individual::new(state, fitness))
    }
}
