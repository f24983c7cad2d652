//! Goal regions: implicit targets given by a distance function.

use rand::Rng;

/// A set of acceptable target states.
///
/// A state satisfies the region when its distance to it is at or below
/// [`GoalRegion::threshold`].
pub trait GoalRegion<S> {
    /// Distance from `state` to the region. Zero means inside.
    fn distance_goal(&self, state: &S) -> anyhow::Result<f64>;

    /// Satisfaction threshold on [`GoalRegion::distance_goal`].
    fn threshold(&self) -> f64;

    /// Whether a distance counts as inside the region.
    fn is_reached(&self, distance: f64) -> bool {
        distance <= self.threshold()
    }

    /// Evaluate `state`, returning whether it satisfies the region and its distance.
    fn is_satisfied(&self, state: &S) -> anyhow::Result<(bool, f64)> {
        let distance = self.distance_goal(state)?;
        Ok((self.is_reached(distance), distance))
    }

    /// A representative state of the region, if the region can produce one.
    /// Used to seed a search when no hints are given.
    fn sample_goal<R: Rng>(&self, _rng: &mut R) -> Option<S> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Threshold(f64);

    impl GoalRegion<f64> for Threshold {
        fn distance_goal(&self, state: &f64) -> anyhow::Result<f64> {
            Ok(state.abs())
        }

        fn threshold(&self) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_is_reached_inclusive() {
        let goal = Threshold(0.5);

        assert!(goal.is_reached(0.3));
        assert!(goal.is_reached(0.5));
        assert!(!goal.is_reached(0.7));
    }

    #[test]
    fn test_is_satisfied_reports_distance() {
        let goal = Threshold(0.1);

        let (inside, distance) = goal.is_satisfied(&-0.05).unwrap();
        assert!(inside);
        assert_eq!(distance, 0.05);

        let (inside, distance) = goal.is_satisfied(&2.0).unwrap();
        assert!(!inside);
        assert_eq!(distance, 2.0);
    }

    #[test]
    fn test_no_representative_state_by_default() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let mut rng = StdRng::seed_from_u64(1);
        assert!(Threshold(0.1).sample_goal(&mut rng).is_none());
    }
}
