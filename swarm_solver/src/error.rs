use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Search space must have at least one dimension")]
    ZeroDimension,

    #[error("Swarm must contain at least one particle")]
    ZeroParticles,

    #[error("Maximum number of iterations must be at least 1")]
    ZeroIterations,

    #[error("Bound lengths differ; lower has {lower} entries, upper has {upper}")]
    BoundsLengthMismatch { lower: usize, upper: usize },

    #[error("Bounds for dimension {idx} are not finite: [{lower}, {upper}]")]
    NonFiniteBound { idx: usize, lower: f64, upper: f64 },

    #[error("Lower bound exceeds upper bound for dimension {idx}: [{lower}, {upper}]")]
    InvertedBounds { idx: usize, lower: f64, upper: f64 },

    #[error("Coefficient `{name}` must be finite, got {value}")]
    InvalidCoefficient { name: &'static str, value: f64 },

    #[error("Stagnation window must be finite and non-negative, got {0}")]
    InvalidStagnationWindow(f64),
}

#[derive(Error, Debug)]
pub enum SwarmError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Objective evaluation failed for particle {particle} at iteration {iter}: {source}")]
    ObjectiveEvaluationFailure {
        iter: u64,
        particle: usize,
        #[source]
        source: argmin::core::Error,
    },

    #[error("Objective returned non-finite cost {cost} for particle {particle} at iteration {iter}")]
    NonFiniteCost { iter: u64, particle: usize, cost: f64 },

    #[error("No finite cost was observed in {iterations} iterations")]
    NoFiniteCost { iterations: u64 },

    #[error("Argmin error: {0}")]
    ArgminError(argmin::core::Error),
}

/// Errors raised inside `Solver::next_iter` travel through argmin as `anyhow::Error`; this
/// recovers the `SwarmError` variant it started as.
impl From<argmin::core::Error> for SwarmError {
    fn from(err: argmin::core::Error) -> Self {
        err.downcast::<SwarmError>()
            .unwrap_or_else(SwarmError::ArgminError)
    }
}
