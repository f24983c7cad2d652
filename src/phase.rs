//! Search phases and the transitions between them.

use serde::Serialize;

/// Where a search is in its life cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Building the initial pool from hints or goal samples.
    Seeding,
    /// Adding perturbed and refined individuals to the pool.
    Expanding,
    /// Re-ranking the pool and trimming it back to size.
    Ranking,
    /// The best individual is valid and inside the goal region.
    Converged,
    /// The time budget ran out.
    TimedOut,
    /// The best individual stopped improving.
    Stagnated,
}

/// What the search looks like after a phase ran.
#[derive(Clone, Copy, Debug, Default)]
pub struct Observation {
    /// The best individual is valid and satisfies the goal.
    pub best_reached: bool,
    pub time_left: bool,
    /// The stagnation limit was hit.
    pub stagnant: bool,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Converged | Phase::TimedOut | Phase::Stagnated)
    }

    /// The phase that follows `self` given `observation`.
    pub fn next(self, observation: Observation) -> Phase {
        match self {
            Phase::Seeding | Phase::Expanding => Phase::Ranking,
            Phase::Ranking => {
                if observation.best_reached {
                    Phase::Converged
                } else if !observation.time_left {
                    Phase::TimedOut
                } else if observation.stagnant {
                    Phase::Stagnated
                } else {
                    Phase::Expanding
                }
            }
            terminal => terminal,
        }
    }
}
