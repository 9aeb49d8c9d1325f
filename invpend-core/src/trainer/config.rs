//! Configuration of [`TrainingSession`](super::TrainingSession).
use crate::{error::InvPendError, PhysicalState, RewardConfig, StateNormalizerConfig};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`TrainingSession`](super::TrainingSession).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct TrainerConfig {
    /// The number of episodes to train.
    pub n_episodes: usize,

    /// The maximum number of environment steps in an episode.
    pub steps_per_episode: usize,

    /// The number of transitions in a training batch.
    pub batch_size: usize,

    /// Discount factor `gamma` of the bootstrapped targets.
    pub discount_factor: f64,

    /// Rate `tau` of the soft update of the target estimator.
    pub tau: f64,

    /// Decay rate of the exploration probability per episode.
    pub epsilon_decay: f64,

    /// Magnitude of the force applied to the cart.
    pub force_factor: f64,

    /// Interval of saving parameters and the last trajectory, in episodes.
    /// Zero disables saving.
    pub save_interval: usize,

    /// Capacity of the replay buffer as a fraction of all planned environment steps.
    pub replay_fraction: f64,

    /// Capacity of the replay buffer, overriding `replay_fraction`.
    pub replay_capacity: Option<usize>,

    /// Where to save parameters and trajectories.
    pub model_dir: Option<String>,

    /// Random seed of exploration and replay sampling.
    pub seed: u64,

    /// State of the simulator at the start of every episode.
    pub initial_state: PhysicalState,

    /// Normalization bounds of the state.
    pub normalizer: StateNormalizerConfig,

    /// Reward shaping.
    pub reward: RewardConfig,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            n_episodes: 100000,
            steps_per_episode: 500,
            batch_size: 32,
            discount_factor: 0.9,
            tau: 0.1,
            epsilon_decay: 0.0005,
            force_factor: 50.0,
            save_interval: 25,
            replay_fraction: 0.1,
            replay_capacity: None,
            model_dir: None,
            seed: 42,
            initial_state: PhysicalState::hanging(),
            normalizer: StateNormalizerConfig::default(),
            reward: RewardConfig::default(),
        }
    }
}

impl TrainerConfig {
    /// Sets the number of episodes.
    pub fn n_episodes(mut self, v: usize) -> Self {
        self.n_episodes = v;
        self
    }

    /// Sets the maximum number of steps per episode.
    pub fn steps_per_episode(mut self, v: usize) -> Self {
        self.steps_per_episode = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Sets the soft update rate.
    pub fn tau(mut self, v: f64) -> Self {
        self.tau = v;
        self
    }

    /// Sets the decay rate of exploration.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
        self
    }

    /// Sets the force factor.
    pub fn force_factor(mut self, v: f64) -> Self {
        self.force_factor = v;
        self
    }

    /// Sets the interval of saving in episodes.
    pub fn save_interval(mut self, v: usize) -> Self {
        self.save_interval = v;
        self
    }

    /// Sets the capacity of the replay buffer relative to the training budget.
    pub fn replay_fraction(mut self, v: f64) -> Self {
        self.replay_fraction = v;
        self
    }

    /// Sets the capacity of the replay buffer.
    pub fn replay_capacity(mut self, v: usize) -> Self {
        self.replay_capacity = Some(v);
        self
    }

    /// Sets the directory where parameters and trajectories are saved.
    pub fn model_dir(mut self, v: impl Into<String>) -> Self {
        self.model_dir = Some(v.into());
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Sets the initial state of episodes.
    pub fn initial_state(mut self, v: PhysicalState) -> Self {
        self.initial_state = v;
        self
    }

    /// Sets the normalization bounds.
    pub fn normalizer(mut self, v: StateNormalizerConfig) -> Self {
        self.normalizer = v;
        self
    }

    /// Sets the reward shaping.
    pub fn reward(mut self, v: RewardConfig) -> Self {
        self.reward = v;
        self
    }

    /// Checks the values that the training loop relies on.
    pub fn validate(&self) -> Result<()> {
        let err = |msg: &str| -> Result<()> {
            Err(InvPendError::InvalidConfig(msg.to_string()).into())
        };

        if self.steps_per_episode == 0 {
            return err("steps_per_episode must be positive");
        }
        if self.batch_size == 0 {
            return err("batch_size must be positive");
        }
        if !(0.0..=1.0).contains(&self.discount_factor) {
            return err("discount_factor must be in [0, 1]");
        }
        if !(0.0..=1.0).contains(&self.tau) {
            return err("tau must be in [0, 1]");
        }
        if !(self.epsilon_decay >= 0.0) {
            return err("epsilon_decay must be non-negative");
        }
        Ok(())
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
