//! Epsilon-greedy action selection.
use crate::{Action, NormalizedState, QValueEstimator};
use anyhow::Result;
use log::trace;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Picks the action with the largest value.
///
/// Ties are broken by precedence, `Decrease` then `Hold` then `Increase`:
/// the first action whose value is not smaller than the others wins.
/// If no action satisfies this (NaN values), `Increase` is returned.
pub fn greedy_action(q: &[f32; 3]) -> Action {
    if q[0] >= q[1] && q[0] >= q[2] {
        Action::Decrease
    } else if q[1] >= q[0] && q[1] >= q[2] {
        Action::Hold
    } else {
        Action::Increase
    }
}

/// Epsilon-greedy explorer with exponentially decaying exploration.
///
/// At episode `n` a uniformly random action is taken with probability
/// `exp(-n * decay_rate)`, otherwise the greedy action of the online estimator.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    decay_rate: f64,
}

impl EpsilonGreedy {
    /// Constructs an explorer.
    pub fn new(decay_rate: f64) -> Self {
        Self { decay_rate }
    }

    /// Probability of taking a random action at the given episode.
    pub fn explore_probability(&self, episode: usize) -> f64 {
        (-(episode as f64) * self.decay_rate).exp()
    }

    /// Selects an action for `state`.
    ///
    /// The estimator is queried only if the explorer decides to exploit.
    pub fn action<Q, R>(
        &self,
        episode: usize,
        state: &NormalizedState,
        qnet: &Q,
        rng: &mut R,
    ) -> Result<Action>
    where
        Q: QValueEstimator,
        R: Rng,
    {
        if rng.gen::<f64>() < self.explore_probability(episode) {
            let ix = rng.gen_range(0..Action::N);
            Ok(Action::ALL[ix])
        } else {
            let q = qnet.q_values(state)?;
            trace!("q = {:?}", q);
            Ok(greedy_action(&q))
        }
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new(0.0005)
    }
}
