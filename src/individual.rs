//! Candidate solutions and how they are ranked.

use std::cmp::Ordering;

use serde::Serialize;

/// Cached evaluation of a state: distance to the goal and validity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Fitness {
    pub distance: f64,
    pub valid: bool,
}

impl Fitness {
    pub fn new(distance: f64, valid: bool) -> Self {
        Self { distance, valid }
    }

    /// Sort key: valid before invalid, then ascending distance.
    pub fn rank_key(&self) -> RankKey {
        RankKey {
            invalid: !self.valid,
            distance: self.distance,
        }
    }
}

/// Total-order key derived from a [`Fitness`].
///
/// Ordering is `(invalid, distance)` with `f64::total_cmp` on the distance,
/// so a plain stable sort by this key yields the ranking.
#[derive(Clone, Copy, Debug)]
pub struct RankKey {
    invalid: bool,
    distance: f64,
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.invalid
            .cmp(&other.invalid)
            .then_with(|| self.distance.total_cmp(&other.distance))
    }
}

/// A state together with its fitness.
///
/// Only the evaluator builds individuals, so the fitness always belongs to
/// the state it sits next to. Changing the state means taking it out with
/// [`Individual::into_state`] (or cloning it) and evaluating again.
#[derive(Clone, Debug)]
pub struct Individual<S> {
    state: S,
    fitness: Fitness,
}

impl<S> Individual<S> {
    pub(crate) fn new(state: S, fitness: Fitness) -> Self {
        Self { state, fitness }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }

    pub fn distance(&self) -> f64 {
        self.fitness.distance
    }

    pub fn is_valid(&self) -> bool {
        self.fitness.valid
    }

    pub fn rank_key(&self) -> RankKey {
        self.fitness.rank_key()
    }
}

/// Stable sort of a pool into rank order.
pub fn rank<S>(pool: &mut [Individual<S>]) {
    pool.sort_by_key(Individual::rank_key);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ind(id: u32, distance: f64, valid: bool) -> Individual<u32> {
        Individual::new(id, Fitness::new(distance, valid))
    }

    #[test]
    fn test_valid_ranks_before_invalid_regardless_of_distance() {
        let a = Fitness::new(100.0, true).rank_key();
        let b = Fitness::new(0.0, false).rank_key();
        assert!(a < b);
    }

    #[test]
    fn test_equal_validity_ranks_by_distance() {
        assert!(Fitness::new(0.2, true).rank_key() < Fitness::new(0.3, true).rank_key());
        assert!(Fitness::new(0.2, false).rank_key() < Fitness::new(0.3, false).rank_key());
        assert_eq!(
            Fitness::new(0.2, false).rank_key(),
            Fitness::new(0.2, false).rank_key()
        );
    }

    #[test]
    fn test_rank_orders_pool() {
        let mut pool = vec![
            ind(0, 0.1, false),
            ind(1, 0.9, true),
            ind(2, 0.3, true),
            ind(3, 0.05, false),
        ];
        rank(&mut pool);

        let ids: Vec<u32> = pool.iter().map(|i| *i.state()).collect();
        assert_eq!(ids, vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_rank_is_stable_under_ties() {
        let mut pool = vec![
            ind(0, 0.5, true),
            ind(1, 0.5, true),
            ind(2, 0.1, true),
            ind(3, 0.5, true),
        ];
        rank(&mut pool);

        let ids: Vec<u32> = pool.iter().map(|i| *i.state()).collect();
        assert_eq!(ids, vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_nan_distance_ranks_last_within_validity() {
        let nan = Fitness::new(f64::NAN, true).rank_key();
        let inf = Fitness::new(f64::INFINITY, true).rank_key();
        assert!(inf < nan);
        assert!(nan < Fitness::new(0.0, false).rank_key());
    }
}
