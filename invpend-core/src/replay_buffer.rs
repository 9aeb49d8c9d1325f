//! Replay buffer of transitions.
use crate::{error::InvPendError, Transition};
use anyhow::Result;
use rand::{rngs::SmallRng, seq::index, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{vec_deque::Iter, VecDeque};

/// Configuration of [`ReplayBuffer`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ReplayBufferConfig {
    pub(crate) capacity: usize,
    pub(crate) seed: u64,
}

impl Default for ReplayBufferConfig {
    fn default() -> Self {
        Self {
            capacity: 10000,
            seed: 42,
        }
    }
}

impl ReplayBufferConfig {
    /// Sets the capacity of the replay buffer.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the random seed for sampling.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the capacity to `fraction` of all environment steps planned for training.
    pub fn capacity_from_budget(
        self,
        fraction: f64,
        n_episodes: usize,
        steps_per_episode: usize,
    ) -> Self {
        let capacity = (fraction * (n_episodes * steps_per_episode) as f64).floor() as usize;
        self.capacity(capacity)
    }

    /// Returns the capacity.
    pub fn get_capacity(&self) -> usize {
        self.capacity
    }
}

/// Bounded FIFO memory of transitions with uniform sampling.
///
/// When full, adding a transition evicts the oldest one. Sampling ignores
/// insertion order.
pub struct ReplayBuffer {
    capacity: usize,
    buf: VecDeque<Transition>,
    rng: SmallRng,
}

impl ReplayBuffer {
    /// Builds an empty replay buffer.
    pub fn build(config: &ReplayBufferConfig) -> Result<Self> {
        if config.capacity == 0 {
            return Err(InvPendError::InvalidCapacity.into());
        }

        Ok(Self {
            capacity: config.capacity,
            buf: VecDeque::new(),
            rng: SmallRng::seed_from_u64(config.seed),
        })
    }

    /// Adds a transition as the newest item, evicting the oldest if over capacity.
    pub fn add(&mut self, tr: Transition) {
        self.buf.push_back(tr);
        if self.buf.len() > self.capacity {
            self.buf.pop_front();
        }
    }

    /// Samples `n` transitions uniformly without replacement.
    ///
    /// If the buffer holds fewer than `n` transitions, all of them are returned.
    /// The stored transitions are left untouched.
    pub fn sample(&mut self, n: usize) -> Vec<Transition> {
        if self.buf.len() < n {
            return self.buf.iter().cloned().collect();
        }

        index::sample(&mut self.rng, self.buf.len(), n)
            .into_iter()
            .map(|ix| self.buf[ix])
            .collect()
    }

    /// Returns `true` iff the buffer holds `capacity` transitions.
    pub fn is_full(&self) -> bool {
        self.buf.len() == self.capacity
    }

    /// Number of stored transitions.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if no transition is stored.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Capacity given at construction.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over transitions from the oldest to the newest.
    pub fn iter(&self) -> Iter<'_, Transition> {
        self.buf.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, NormalizedState};

    // Transitions are told apart by their reward
    fn tr(id: usize) -> Transition {
        let s = NormalizedState::new([0.0; 4]);
        Transition::new(s, Action::Hold, id as f32, s)
    }

    fn ids(trs: &[Transition]) -> Vec<usize> {
        let mut ids = trs.iter().map(|t| t.reward as usize).collect::<Vec<_>>();
        ids.sort();
        ids
    }

    fn buffer(capacity: usize) -> ReplayBuffer {
        ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity)).unwrap()
    }

    #[test]
    fn test_eviction_order() {
        let mut buffer = buffer(3);
        for i in 0..4 {
            buffer.add(tr(i));
        }
        assert_eq!(buffer.len(), 3);
        assert!(buffer.is_full());
        assert_eq!(ids(&buffer.iter().cloned().collect::<Vec<_>>()), vec![1, 2, 3]);

        // The evicted transition is never sampled again
        for _ in 0..50 {
            let batch = buffer.sample(2);
            assert_eq!(batch.len(), 2);
            assert!(batch.iter().all(|t| t.reward as usize != 0));
        }
    }

    #[test]
    fn test_overflow_by_k() {
        let capacity = 10;
        let k = 7;
        let mut buffer = buffer(capacity);
        for i in 0..capacity + k {
            buffer.add(tr(i));
            assert!(buffer.len() <= capacity);
        }
        assert_eq!(buffer.len(), capacity);
        assert_eq!(
            ids(&buffer.iter().cloned().collect::<Vec<_>>()),
            (k..capacity + k).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sample_underflow_returns_all() {
        let mut buffer = buffer(100);
        for i in 0..5 {
            buffer.add(tr(i));
        }
        assert!(!buffer.is_full());
        let batch = buffer.sample(32);
        assert_eq!(ids(&batch), vec![0, 1, 2, 3, 4]);
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_sample_without_replacement() {
        let mut buffer = buffer(100);
        for i in 0..40 {
            buffer.add(tr(i));
        }
        for _ in 0..20 {
            let batch = buffer.sample(32);
            let mut ids = ids(&batch);
            assert_eq!(ids.len(), 32);
            ids.dedup();
            assert_eq!(ids.len(), 32);
            assert!(ids.iter().all(|&i| i < 40));
        }
        assert_eq!(buffer.len(), 40);
    }

    #[test]
    fn test_capacity_from_budget() {
        let config = ReplayBufferConfig::default().capacity_from_budget(0.1, 100000, 500);
        assert_eq!(config.get_capacity(), 5_000_000);
        let config = ReplayBufferConfig::default().capacity_from_budget(0.1, 1, 5);
        assert!(ReplayBuffer::build(&config).is_err());
    }
}
