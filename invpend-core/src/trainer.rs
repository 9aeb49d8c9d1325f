//! Train a [`QValueEstimator`] on a [`Simulator`].
mod config;
use crate::{
    bootstrap_targets, check_loss,
    record::{Record, RecordValue, Recorder},
    sync_target, Action, EpsilonGreedy, NormalizedState, QValueEstimator, ReplayBuffer,
    ReplayBufferConfig, Simulator, StateNormalizer, StepOutcome, Trajectory, Transition,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{debug, info};
use rand::{rngs::SmallRng, SeedableRng};
use std::path::Path;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeOutcome {
    /// The state at the given step escaped the operating envelope.
    EarlyTerminated {
        /// Index of the terminating step.
        step: usize,
    },

    /// All steps of the episode were run.
    StepsExhausted,
}

impl EpisodeOutcome {
    /// Name of the outcome written to records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EarlyTerminated { .. } => "early_terminated",
            Self::StepsExhausted => "steps_exhausted",
        }
    }
}

/// Diagnostics of an episode.
#[derive(Debug, Clone)]
pub struct EpisodeSummary {
    /// Episode index.
    pub episode: usize,

    /// How the episode ended.
    pub outcome: EpisodeOutcome,

    /// The number of transitions recorded.
    pub n_transitions: usize,

    /// The number of training steps.
    pub n_opts: usize,

    /// Mean training loss, `None` if no training step was done.
    pub mean_loss: Option<f32>,

    /// Mean reward per step.
    pub mean_reward: f32,

    /// Total reward.
    pub sum_reward: f32,

    /// States visited, one per step.
    pub trajectory: Trajectory,
}

impl EpisodeSummary {
    /// Converts to a [`Record`] keyed by the episode index.
    pub fn to_record(&self) -> Record {
        let mut record = Record::from_slice(&[
            ("episode", RecordValue::Scalar(self.episode as _)),
            ("mean_reward", RecordValue::Scalar(self.mean_reward)),
            ("sum_reward", RecordValue::Scalar(self.sum_reward)),
            ("steps", RecordValue::Scalar(self.n_transitions as _)),
            ("outcome", RecordValue::String(self.outcome.as_str().to_string())),
        ]);
        if let Some(loss) = self.mean_loss {
            record.insert("loss", RecordValue::Scalar(loss));
        }
        record
    }
}

fn mean(xs: &[f32]) -> Option<f32> {
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f32>() / xs.len() as f32)
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Owns the mutable state of a training run and drives its episodes.
///
/// # Episodes
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> EpisodeStart
///     EpisodeStart --> Stepping
///     Stepping --> Stepping: valid state
///     Stepping --> EarlyTerminated: state escaped
///     Stepping --> StepsExhausted: step budget used
///     EarlyTerminated --> EpisodeEnd
///     StepsExhausted --> EpisodeEnd
///     EpisodeEnd --> EpisodeStart
///     EpisodeEnd --> [*]: n_episodes reached
/// ```
///
/// * `EpisodeStart`: a simulator is built at [`TrainerConfig::initial_state`].
/// * `Stepping`, repeated up to [`TrainerConfig::steps_per_episode`] times:
///     1. normalize the state and append it to the trajectory,
///     2. select an action with [`EpsilonGreedy`],
///     3. step the simulator with `force_factor * action.force_multiplier()`,
///     4. compute reward and termination on the resulting state,
///     5. add the transition to the [`ReplayBuffer`],
///     6. if not terminated: sample a batch, compute [`bootstrap_targets`]
///        with the target estimator, do a training step of the online
///        estimator and soft-update the target estimator.
/// * `EpisodeEnd`: a [`Record`] of the episode is written to the recorder.
///   Every `save_interval` episodes the online parameters and the last
///   trajectory are saved in `model_dir`.
///
/// A NaN training loss aborts the run with
/// [`InvPendError::Divergence`](crate::error::InvPendError::Divergence).
pub struct TrainingSession<S, Q>
where
    S: Simulator,
    Q: QValueEstimator,
{
    config: TrainerConfig,
    sim_config: S::Config,
    normalizer: StateNormalizer,
    explorer: EpsilonGreedy,
    buffer: ReplayBuffer,
    qnet: Q,
    qnet_tgt: Q,
    rng: SmallRng,
    last_trajectory: Trajectory,
    n_opts: usize,
}

impl<S, Q> TrainingSession<S, Q>
where
    S: Simulator,
    Q: QValueEstimator,
{
    /// Builds a session around the online estimator `qnet`.
    ///
    /// The target estimator starts as a copy of `qnet`.
    pub fn build(config: TrainerConfig, sim_config: S::Config, qnet: Q) -> Result<Self> {
        config.validate()?;
        let normalizer = StateNormalizer::new(&config.normalizer)?;
        let explorer = EpsilonGreedy::new(config.epsilon_decay);
        let buffer = {
            let buffer_config = ReplayBufferConfig::default().seed(config.seed);
            let buffer_config = match config.replay_capacity {
                Some(capacity) => buffer_config.capacity(capacity),
                None => buffer_config.capacity_from_budget(
                    config.replay_fraction,
                    config.n_episodes,
                    config.steps_per_episode,
                ),
            };
            ReplayBuffer::build(&buffer_config)?
        };
        let qnet_tgt = qnet.clone_as_target()?;
        let rng = SmallRng::seed_from_u64(config.seed.wrapping_add(1));
        info!("Replay buffer capacity: {}", buffer.capacity());

        Ok(Self {
            config,
            sim_config,
            normalizer,
            explorer,
            buffer,
            qnet,
            qnet_tgt,
            rng,
            last_trajectory: Trajectory::new(),
            n_opts: 0,
        })
    }

    /// Samples a batch, trains the online estimator on it and syncs the target.
    fn opt(&mut self, episode: usize, step: usize) -> Result<f32> {
        let batch = self.buffer.sample(self.config.batch_size);
        let targets = bootstrap_targets(&batch, &self.qnet_tgt, self.config.discount_factor)?;
        let (states, actions): (Vec<NormalizedState>, Vec<Action>) =
            batch.iter().map(|tr| (tr.state, tr.action)).unzip();

        let loss = self.qnet.train_step(&states, &actions, &targets)?;
        let loss = check_loss(loss, episode, step)?;
        sync_target(&mut self.qnet_tgt, &self.qnet, self.config.tau)?;
        self.n_opts += 1;

        Ok(loss)
    }

    /// Runs a single episode.
    pub fn run_episode(&mut self, episode: usize) -> Result<EpisodeSummary> {
        let mut sim = S::build(&self.sim_config, self.config.initial_state)?;
        let mut trajectory = Trajectory::new();
        let mut losses = Vec::new();
        let mut rewards = Vec::new();
        let mut outcome = EpisodeOutcome::StepsExhausted;

        for step in 0..self.config.steps_per_episode {
            let state = self.normalizer.normalize(&sim.state());
            trajectory.push(state);

            let act = self
                .explorer
                .action(episode, &state, &self.qnet, &mut self.rng)?;
            sim.step(self.config.force_factor * act.force_multiplier())?;
            let raw = sim.state();
            let next_state = self.normalizer.normalize(&raw);
            let StepOutcome {
                reward,
                is_terminated,
            } = self.config.reward.evaluate(&raw, &next_state);

            self.buffer
                .add(Transition::new(state, act, reward, next_state));
            rewards.push(reward);

            if is_terminated {
                debug!("Episode {} terminated at step {}: {:?}", episode, step, raw);
                outcome = EpisodeOutcome::EarlyTerminated { step };
                break;
            }

            losses.push(self.opt(episode, step)?);
        }

        Ok(EpisodeSummary {
            episode,
            outcome,
            n_transitions: rewards.len(),
            n_opts: losses.len(),
            mean_loss: mean(&losses),
            mean_reward: mean(&rewards).unwrap_or(0.0),
            sum_reward: rewards.iter().sum(),
            trajectory,
        })
    }

    fn save_checkpoint(&self, key: usize) -> Result<()> {
        if let Some(model_dir) = &self.config.model_dir {
            let model_dir = Path::new(model_dir);
            let params_dir = model_dir.join(key.to_string());
            self.qnet.save_params(&params_dir)?;
            self.last_trajectory.save(model_dir.join("last.csv"))?;
            info!("Saved checkpoint {} in {:?}", key, model_dir);
        }
        Ok(())
    }

    fn train_episodes<R>(&mut self, recorder: &mut R) -> Result<()>
    where
        R: Recorder + ?Sized,
    {
        for episode in 0..self.config.n_episodes {
            let summary = self.run_episode(episode)?;
            info!(
                "Episode {} - L: {:.3}\tAR: {:.3}\tSR: {:.3}",
                episode,
                summary.mean_loss.unwrap_or(f32::NAN),
                summary.mean_reward,
                summary.sum_reward
            );
            recorder.write(summary.to_record());
            self.last_trajectory = summary.trajectory;

            let n_done = episode + 1;
            if self.config.save_interval > 0 && n_done % self.config.save_interval == 0 {
                self.save_checkpoint(n_done)?;
            }
        }
        Ok(())
    }

    /// Runs all episodes, writing one record per episode to `recorder`.
    ///
    /// The recorder is flushed when training ends, also on error.
    pub fn train<R>(&mut self, recorder: &mut R) -> Result<()>
    where
        R: Recorder + ?Sized,
    {
        let result = self.train_episodes(recorder);
        recorder.flush();
        result
    }

    /// The online estimator.
    pub fn qnet(&self) -> &Q {
        &self.qnet
    }

    /// The target estimator.
    pub fn qnet_tgt(&self) -> &Q {
        &self.qnet_tgt
    }

    /// The replay buffer.
    pub fn buffer(&self) -> &ReplayBuffer {
        &self.buffer
    }

    /// The normalizer.
    pub fn normalizer(&self) -> &StateNormalizer {
        &self.normalizer
    }

    /// Trajectory of the last finished episode of [`TrainingSession::train`].
    pub fn last_trajectory(&self) -> &Trajectory {
        &self.last_trajectory
    }

    /// Total number of training steps.
    pub fn n_opts(&self) -> usize {
        self.n_opts
    }

    /// The configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }
}
