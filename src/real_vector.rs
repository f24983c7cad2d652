//! Bounded Euclidean state space and a ball-shaped goal region.
//!
//! Small concrete collaborators used by the `ik_search` binary and the
//! tests. A real robot would implement [`StateSpace`] over its joint space.

use anyhow::bail;
use rand::Rng;

use crate::goal::GoalRegion;
use crate::space::StateSpace;

/// Validity resolution as a fraction of the space's diagonal.
pub const DEFAULT_RESOLUTION_FRACTION: f64 = 0.001;

type ValidityFn = Box<dyn Fn(&Vec<f64>) -> bool>;

/// Axis-aligned box of real vectors with a pluggable validity predicate.
pub struct RealVectorSpace {
    bounds: Vec<(f64, f64)>,
    resolution: f64,
    validity: Option<ValidityFn>,
}

impl RealVectorSpace {
    /// Create a space from per-dimension `(low, high)` bounds.
    pub fn new(bounds: Vec<(f64, f64)>) -> anyhow::Result<Self> {
        if bounds.is_empty() {
            bail!("a real vector space needs at least one dimension");
        }
        for (i, &(low, high)) in bounds.iter().enumerate() {
            if !low.is_finite() || !high.is_finite() || low >= high {
                bail!("invalid bounds for dimension {}: [{}, {}]", i, low, high);
            }
        }

        let diagonal = bounds
            .iter()
            .map(|(low, high)| (high - low).powi(2))
            .sum::<f64>()
            .sqrt();

        Ok(Self {
            bounds,
            resolution: diagonal * DEFAULT_RESOLUTION_FRACTION,
            validity: None,
        })
    }

    /// States are valid only if `predicate` accepts them (and they are in bounds).
    pub fn with_validity<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Vec<f64>) -> bool + 'static,
    {
        self.validity = Some(Box::new(predicate));
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    fn check_dimension(&self, state: &[f64]) -> anyhow::Result<()> {
        if state.len() != self.bounds.len() {
            bail!(
                "state has {} coordinates, space has {} dimensions",
                state.len(),
                self.bounds.len()
            );
        }
        Ok(())
    }

    fn in_bounds(&self, state: &[f64]) -> bool {
        state
            .iter()
            .zip(&self.bounds)
            .all(|(v, (low, high))| *v >= *low && *v <= *high)
    }
}

impl StateSpace for RealVectorSpace {
    type State = Vec<f64>;

    fn sample_uniform<R: Rng>(&self, rng: &mut R) -> anyhow::Result<Vec<f64>> {
        Ok(self
            .bounds
            .iter()
            .map(|&(low, high)| rng.gen_range(low..=high))
            .collect())
    }

    fn sample_uniform_near<R: Rng>(
        &self,
        rng: &mut R,
        near: &Vec<f64>,
        distance: f64,
    ) -> anyhow::Result<Vec<f64>> {
        self.check_dimension(near)?;
        Ok(near
            .iter()
            .zip(&self.bounds)
            .map(|(&v, &(low, high))| {
                let from = (v - distance).max(low);
                let to = (v + distance).min(high);
                if from < to {
                    rng.gen_range(from..=to)
                } else {
                    v.clamp(low, high)
                }
            })
            .collect())
    }

    fn is_valid(&self, state: &Vec<f64>) -> anyhow::Result<bool> {
        self.check_dimension(state)?;
        if !self.in_bounds(state) {
            return Ok(false);
        }
        Ok(self.validity.as_ref().map_or(true, |predicate| predicate(state)))
    }

    fn enforce_bounds(&self, state: &mut Vec<f64>) {
        for (v, &(low, high)) in state.iter_mut().zip(&self.bounds) {
            *v = v.clamp(low, high);
        }
    }

    fn validity_checking_resolution(&self) -> f64 {
        self.resolution
    }
}

/// Euclidean distance between two points.
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Ball of `radius` around `center`; distance is measured to its surface.
#[derive(Clone, Debug)]
pub struct BallGoal {
    center: Vec<f64>,
    radius: f64,
    threshold: f64,
}

impl BallGoal {
    pub fn new(center: Vec<f64>, radius: f64, threshold: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            threshold,
        }
    }

    pub fn center(&self) -> &[f64] {
        &self.center
    }
}

impl GoalRegion<Vec<f64>> for BallGoal {
    fn distance_goal(&self, state: &Vec<f64>) -> anyhow::Result<f64> {
        if state.len() != self.center.len() {
            bail!(
                "state has {} coordinates, goal center has {}",
                state.len(),
                self.center.len()
            );
        }
        Ok((euclidean(state, &self.center) - self.radius).max(0.0))
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn sample_goal<R: Rng>(&self, _rng: &mut R) -> Option<Vec<f64>> {
        Some(self.center.clone())
    }
}
