#![warn(missing_docs)]
//! Training-and-control loop of value-based reinforcement learning for
//! an inverted pendulum on a cart.
//!
//! The crate provides the pieces the training loop is made of:
//!
//! * [`StateNormalizer`] maps the physical state of the cart-pendulum to
//!   a bounded representation and decides whether a state is still inside
//!   the operating envelope.
//! * [`ReplayBuffer`] keeps the most recent [`Transition`]s and samples
//!   them uniformly at random.
//! * [`EpsilonGreedy`] selects an [`Action`] with a decaying exploration
//!   probability.
//! * [`bootstrap_targets`] computes Q-learning targets with a slowly
//!   tracking target estimator.
//! * [`TrainingSession`] owns all mutable training state and drives the
//!   episodes.
//!
//! The value function and the physical dynamics are external collaborators,
//! seen by this crate only through the [`QValueEstimator`] and
//! [`Simulator`] traits.
pub mod dummy;
pub mod error;
pub mod record;

mod action;
mod estimator;
mod explorer;
mod normalizer;
mod q_learning;
mod replay_buffer;
mod reward;
mod simulator;
mod state;
mod trainer;
mod trajectory;
mod transition;

pub use action::Action;
pub use estimator::QValueEstimator;
pub use explorer::{greedy_action, EpsilonGreedy};
pub use normalizer::{Bounds, StateNormalizer, StateNormalizerConfig};
pub use q_learning::{bootstrap_targets, check_loss, sync_target};
pub use replay_buffer::{ReplayBuffer, ReplayBufferConfig};
pub use reward::{PositionCheck, RewardConfig, StepOutcome};
pub use simulator::Simulator;
pub use state::{NormalizedState, PhysicalState};
pub use trainer::{EpisodeOutcome, EpisodeSummary, TrainerConfig, TrainingSession};
pub use trajectory::Trajectory;
pub use transition::Transition;
