//! Bounded hill climbing toward a goal region.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::evaluator::ValidityPolicy;
use crate::goal::GoalRegion;
use crate::space::StateSpace;

/// When a sampled move counts as an improvement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Acceptance {
    /// The move must be strictly closer to the goal.
    #[default]
    Strict,
    /// A move at the same distance is also taken (allows drifting on plateaus).
    NonWorsening,
}

impl Acceptance {
    pub fn accepts(self, candidate: f64, current: f64) -> bool {
        match self {
            Self::Strict => candidate < current,
            Self::NonWorsening => candidate <= current,
        }
    }
}

/// A local search that nudges a state toward a goal in place.
pub trait LocalSearch<Sp: StateSpace> {
    /// Try to move `state` closer to `goal`, sampling within `near_distance`
    /// and spending at most `max_steps` steps. Returns whether `state` changed.
    ///
    /// Failing to improve is not an error.
    #[allow(clippy::too_many_arguments)]
    fn improve<G, R>(
        &self,
        space: &Sp,
        goal: &G,
        state: &mut Sp::State,
        near_distance: f64,
        max_steps: u32,
        validity: ValidityPolicy,
        rng: &mut R,
    ) -> anyhow::Result<bool>
    where
        G: GoalRegion<Sp::State>,
        R: Rng;
}

/// Bounded stochastic hill climbing.
///
/// Climbing happens in rounds. A round draws up to `max_steps` samples around
/// the current state and stops at the first accepted one. The climb ends after
/// a round with no accepted sample, once the goal is satisfied, or after
/// `max_steps` rounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct HillClimbing {
    pub acceptance: Acceptance,
}

impl HillClimbing {
    pub fn new(acceptance: Acceptance) -> Self {
        Self { acceptance }
    }
}

impl<Sp: StateSpace> LocalSearch<Sp> for HillClimbing {
    fn improve<G, R>(
        &self,
        space: &Sp,
        goal: &G,
        state: &mut Sp::State,
        near_distance: f64,
        max_steps: u32,
        validity: ValidityPolicy,
        rng: &mut R,
    ) -> anyhow::Result<bool>
    where
        G: GoalRegion<Sp::State>,
        R: Rng,
    {
        if max_steps == 0 || near_distance.is_nan() || near_distance <= 0.0 {
            return Ok(false);
        }

        let (mut satisfied, mut best) = goal.is_satisfied(state)?;
        let mut improved = false;

        for _round in 0..max_steps {
            if satisfied {
                break;
            }

            let mut moved = false;
            for _ in 0..max_steps {
                let candidate = space.sample_uniform_near(rng, state, near_distance)?;
                let (candidate_satisfied, distance) = goal.is_satisfied(&candidate)?;

                if !self.acceptance.accepts(distance, best) {
                    continue;
                }
                if !validity.check(space, &candidate)? {
                    continue;
                }

                *state = candidate;
                best = distance;
                satisfied = candidate_satisfied;
                moved = true;
                break;
            }

            if !moved {
                break;
            }
            improved = true;
        }

        Ok(improved)
    }
}
