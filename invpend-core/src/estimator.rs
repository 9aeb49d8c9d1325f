//! Interface of action-value estimators.
use crate::{Action, NormalizedState};
use anyhow::Result;
use std::path::Path;

/// A trainable action-value function `Q(s, a)`.
///
/// The training loop keeps two instances: the online estimator, updated by
/// gradient steps, and the target estimator, built with
/// [`QValueEstimator::clone_as_target`] and tracking the online one by
/// [`QValueEstimator::soft_update`].
pub trait QValueEstimator {
    /// Returns `Q(states[i], actions[i])` for each `i`.
    ///
    /// `states` and `actions` must have the same length.
    fn predict(&self, states: &[NormalizedState], actions: &[Action]) -> Result<Vec<f32>>;

    /// Performs a single gradient step regressing `Q(states[i], actions[i])`
    /// on `targets[i]` and returns the loss.
    fn train_step(
        &mut self,
        states: &[NormalizedState],
        actions: &[Action],
        targets: &[f32],
    ) -> Result<f32>;

    /// Builds an independent copy holding the same parameter values.
    fn clone_as_target(&self) -> Result<Self>
    where
        Self: Sized;

    /// Polyak averaging, `param = tau * source_param + (1 - tau) * param`,
    /// applied to every parameter.
    fn soft_update(&mut self, source: &Self, tau: f64) -> Result<()>
    where
        Self: Sized;

    /// Saves the parameters in the given directory.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Loads the parameters from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;

    /// Returns the values of all actions at `state`, in [`Action::ALL`] order.
    fn q_values(&self, state: &NormalizedState) -> Result<[f32; 3]> {
        let q = self.predict(&[*state; 3], &Action::ALL)?;
        match q.as_slice() {
            &[q0, q1, q2] => Ok([q0, q1, q2]),
            _ => anyhow::bail!("Expected 3 action values, got {}", q.len()),
        }
    }
}
