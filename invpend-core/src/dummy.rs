//! Scripted collaborators used in tests.
use crate::{Action, NormalizedState, PhysicalState, QValueEstimator, Simulator};
use anyhow::Result;
use std::{cell::Cell, fs, path::Path};

/// Estimator whose value depends on the action only.
///
/// Every training step adds `shift` to all entries and returns `loss`.
#[derive(Debug, Clone)]
pub struct TableEstimator {
    table: [f32; 3],
    shift: f32,
    loss: f32,
    n_predicts: Cell<usize>,
    n_train_steps: usize,
    batch_sizes: Vec<usize>,
    last_batch: Vec<(NormalizedState, Action, f32)>,
}

impl TableEstimator {
    /// Constructs an estimator returning `table[a.index()]` for action `a`.
    pub fn new(table: [f32; 3]) -> Self {
        Self {
            table,
            shift: 0.0,
            loss: 0.0,
            n_predicts: Cell::new(0),
            n_train_steps: 0,
            batch_sizes: vec![],
            last_batch: vec![],
        }
    }

    /// Sets the change of all entries per training step.
    pub fn shift(mut self, v: f32) -> Self {
        self.shift = v;
        self
    }

    /// Sets the loss returned by training steps.
    pub fn loss(mut self, v: f32) -> Self {
        self.loss = v;
        self
    }

    /// Current values.
    pub fn table(&self) -> [f32; 3] {
        self.table
    }

    /// Number of calls of [`QValueEstimator::predict`].
    pub fn n_predicts(&self) -> usize {
        self.n_predicts.get()
    }

    /// Number of training steps.
    pub fn n_train_steps(&self) -> usize {
        self.n_train_steps
    }

    /// Batch size of every training step so far.
    pub fn batch_sizes(&self) -> &[usize] {
        &self.batch_sizes
    }

    /// `(state, action, target)` triples of the last training step.
    pub fn last_batch(&self) -> &[(NormalizedState, Action, f32)] {
        &self.last_batch
    }
}

impl QValueEstimator for TableEstimator {
    fn predict(&self, states: &[NormalizedState], actions: &[Action]) -> Result<Vec<f32>> {
        anyhow::ensure!(states.len() == actions.len(), "length mismatch");
        self.n_predicts.set(self.n_predicts.get() + 1);
        Ok(actions.iter().map(|a| self.table[a.index()]).collect())
    }

    fn train_step(
        &mut self,
        states: &[NormalizedState],
        actions: &[Action],
        targets: &[f32],
    ) -> Result<f32> {
        anyhow::ensure!(
            states.len() == actions.len() && actions.len() == targets.len(),
            "length mismatch"
        );
        self.n_train_steps += 1;
        self.batch_sizes.push(states.len());
        self.last_batch = states
            .iter()
            .zip(actions.iter())
            .zip(targets.iter())
            .map(|((s, a), t)| (*s, *a, *t))
            .collect();
        for q in self.table.iter_mut() {
            *q += self.shift;
        }
        Ok(self.loss)
    }

    fn clone_as_target(&self) -> Result<Self> {
        Ok(Self::new(self.table))
    }

    fn soft_update(&mut self, source: &Self, tau: f64) -> Result<()> {
        let tau = tau as f32;
        for (q, q_src) in self.table.iter_mut().zip(source.table.iter()) {
            *q = tau * q_src + (1.0 - tau) * *q;
        }
        Ok(())
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(path.join("table.yaml"), serde_yaml::to_string(&self.table)?)?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path.join("table.yaml"))?;
        self.table = serde_yaml::from_str(&text)?;
        Ok(())
    }
}

/// Simulator replaying a fixed sequence of states.
///
/// The `i`-th call of [`Simulator::step`] moves to `states[i]`; after the
/// script ends the last state is kept.
pub struct ScriptedSimulator {
    script: Vec<PhysicalState>,
    state: PhysicalState,
    n_steps: usize,
}

impl Simulator for ScriptedSimulator {
    type Config = Vec<PhysicalState>;

    fn build(config: &Self::Config, initial: PhysicalState) -> Result<Self> {
        Ok(Self {
            script: config.clone(),
            state: initial,
            n_steps: 0,
        })
    }

    fn step(&mut self, _force: f64) -> Result<()> {
        if let Some(s) = self.script.get(self.n_steps).or_else(|| self.script.last()) {
            self.state = *s;
        }
        self.n_steps += 1;
        Ok(())
    }

    fn state(&self) -> PhysicalState {
        self.state
    }
}
