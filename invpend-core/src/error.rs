//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug)]
pub enum InvPendError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The training loss became NaN, the value function diverged.
    #[error("Training loss is NaN at episode {episode}, step {step}")]
    Divergence {
        /// Episode index.
        episode: usize,
        /// Step index within the episode.
        step: usize,
    },

    /// Normalization bounds of a state dimension are not ordered.
    #[error("Invalid bounds for {dim}: min = {min}, max = {max}")]
    InvalidBounds {
        /// Name of the state dimension.
        dim: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The replay buffer would not hold any transition.
    #[error("Capacity of the replay buffer must be positive")]
    InvalidCapacity,

    /// Inconsistent configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
