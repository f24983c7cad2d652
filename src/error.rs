//! Error types for the solver.

/// A configuration value that would make the search degenerate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("pool size must be at least 1")]
    ZeroPoolSize,
    #[error("pool expansion size must be at least 1")]
    ZeroPoolExpansion,
    #[error("sampling range must be finite and positive, got {0}")]
    InvalidRange(f64),
    #[error("elite fraction must be in (0.0, 1.0], got {0}")]
    InvalidEliteFraction(f64),
    #[error("stagnation limit must be at least 1 generation")]
    ZeroStagnationLimit,
}

/// Errors returned by [`crate::solver::Gaik`].
///
/// Not finding a state is not an error: `solve` returns `Ok(None)` for that.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("ConfigError: {0}")]
    Config(#[from] ConfigError),
    #[error("CollaboratorError: {0}")]
    Collaborator(#[from] anyhow::Error),
}
