//! Solver configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evaluator::ValidityPolicy;
use crate::hill_climb::Acceptance;

/// Default range is the space's validity resolution times this factor.
pub const RANGE_RESOLUTION_FACTOR: f64 = 100.0;

/// Configuration of the genetic IK search.
///
/// Changed only between searches. [`GaikConfig::validate`] rejects values that
/// would make a search degenerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaikConfig {
    /// Number of individuals kept after each generation.
    pub pool_size: usize,
    /// Number of individuals added in each generation before trimming.
    pub pool_expansion: usize,
    /// Step budget handed to the local search.
    pub max_improve_steps: u32,
    pub validity: ValidityPolicy,
    /// Maximum perturbation distance when sampling around a state.
    /// `None` derives it from the space's validity resolution.
    pub range: Option<f64>,
    /// Share of the ranked pool used as parents for perturbations.
    pub elite_fraction: f64,
    /// Number of top individuals refined by hill climbing each generation.
    pub refine_count: usize,
    /// Number of top individuals refined once more when the search ends unsolved.
    pub polish_count: usize,
    /// Generations without a better best individual before giving up.
    pub max_stagnant_generations: usize,
    pub acceptance: Acceptance,
    /// Only report a valid best state as a solution when it also satisfies
    /// the goal. Off by default: any valid best state is a solution.
    pub require_satisfaction: bool,
    /// Seed for reproducible searches. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for GaikConfig {
    fn default() -> Self {
        Self {
            pool_size: 80,
            pool_expansion: 100,
            max_improve_steps: 3,
            validity: ValidityPolicy::Checked,
            range: None,
            elite_fraction: 0.25,
            refine_count: 3,
            polish_count: 5,
            max_stagnant_generations: 500,
            acceptance: Acceptance::Strict,
            require_satisfaction: false,
            seed: None,
        }
    }
}

impl GaikConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_pool_size(self.pool_size)?;
        validate_pool_expansion(self.pool_expansion)?;
        if let Some(range) = self.range {
            validate_range(range)?;
        }
        validate_elite_fraction(self.elite_fraction)?;
        validate_stagnation_limit(self.max_stagnant_generations)?;
        Ok(())
    }

    /// Number of top-ranked individuals perturbations are drawn around.
    pub fn parent_count(&self, pool_len: usize) -> usize {
        ((pool_len as f64 * self.elite_fraction).ceil() as usize).clamp(1, pool_len.max(1))
    }
}

pub(crate) fn validate_pool_size(size: usize) -> Result<usize, ConfigError> {
    if size == 0 {
        return Err(ConfigError::ZeroPoolSize);
    }
    Ok(size)
}

pub(crate) fn validate_pool_expansion(size: usize) -> Result<usize, ConfigError> {
    if size == 0 {
        return Err(ConfigError::ZeroPoolExpansion);
    }
    Ok(size)
}

pub(crate) fn validate_range(range: f64) -> Result<f64, ConfigError> {
    if !range.is_finite() || range <= 0.0 {
        return Err(ConfigError::InvalidRange(range));
    }
    Ok(range)
}

pub(crate) fn validate_elite_fraction(fraction: f64) -> Result<f64, ConfigError> {
    if !(fraction > 0.0 && fraction <= 1.0) {
        return Err(ConfigError::InvalidEliteFraction(fraction));
    }
    Ok(fraction)
}

pub(crate) fn validate_stagnation_limit(limit: usize) -> Result<usize, ConfigError> {
    if limit == 0 {
        return Err(ConfigError::ZeroStagnationLimit);
    }
    Ok(limit)
}
