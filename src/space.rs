//! The state space a search runs in.
//!
//! The solver never looks inside a state. Everything it needs (sampling,
//! validity, bounds) goes through this trait, so any robot model can plug in.

use rand::Rng;

/// Space information: state sampling, validity and bounds.
///
/// Implementations are used sequentially within a single search and do not
/// need to be thread-safe.
pub trait StateSpace {
    /// A point in the configuration space (e.g. joint angles).
    type State: Clone + std::fmt::Debug;

    /// Sample a state uniformly over the whole space.
    fn sample_uniform<R: Rng>(&self, rng: &mut R) -> anyhow::Result<Self::State>;

    /// Sample a state within `distance` of `near`.
    fn sample_uniform_near<R: Rng>(
        &self,
        rng: &mut R,
        near: &Self::State,
        distance: f64,
    ) -> anyhow::Result<Self::State>;

    /// Whether the state is usable (collision free, within limits, ...).
    fn is_valid(&self, state: &Self::State) -> anyhow::Result<bool>;

    /// Bring a state back inside the space bounds.
    fn enforce_bounds(&self, state: &mut Self::State);

    /// Resolution at which motions are checked for validity.
    /// The default sampling range is derived from it.
    fn validity_checking_resolution(&self) -> f64;
}
