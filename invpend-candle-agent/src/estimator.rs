use crate::{
    opt::{Optimizer, OptimizerConfig},
    qnet::{QNet, QNetConfig, STATE_DIM},
    util::{copy, track},
    Device,
};
use anyhow::{ensure, Result};
use candle_core::{DType, Tensor};
use candle_nn::{loss::mse, VarBuilder, VarMap};
use invpend_core::{Action, NormalizedState, QValueEstimator};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::Path,
};

const PARAMS_FILE: &str = "qnet.safetensors";

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
#[serde(default)]
/// Configuration of [`CandleEstimator`].
pub struct EstimatorConfig {
    pub(crate) q_config: QNetConfig,
    pub(crate) opt_config: OptimizerConfig,
    pub(crate) device: Device,
}

impl EstimatorConfig {
    /// Sets the configuration of the network.
    pub fn q_config(mut self, v: QNetConfig) -> Self {
        self.q_config = v;
        self
    }

    /// Sets the optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, v: Device) -> Self {
        self.device = v;
        self
    }

    /// Constructs [`EstimatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`EstimatorConfig`] as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Action-value estimator backed by [`QNet`].
pub struct CandleEstimator {
    config: EstimatorConfig,
    device: candle_core::Device,
    varmap: VarMap,
    qnet: QNet,
    opt: Optimizer,
}

impl CandleEstimator {
    /// Constructs a randomly initialized estimator.
    pub fn build(config: EstimatorConfig) -> Result<Self> {
        let device = config.device.build()?;
        Self::build_on(config, device)
    }

    fn build_on(config: EstimatorConfig, device: candle_core::Device) -> Result<Self> {
        let varmap = VarMap::new();
        let qnet = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            QNet::build(vb, &config.q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            config,
            device,
            varmap,
            qnet,
            opt,
        })
    }

    /// Returns the variables of the network.
    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    fn input(&self, states: &[NormalizedState], actions: &[Action]) -> Result<(Tensor, Tensor)> {
        ensure!(
            states.len() == actions.len(),
            "{} states but {} actions",
            states.len(),
            actions.len()
        );
        let n = states.len();
        let states: Vec<f32> = states.iter().flat_map(|s| s.to_f32()).collect();
        let actions: Vec<f32> = actions.iter().flat_map(|a| a.one_hot()).collect();
        let states = Tensor::from_vec(states, (n, STATE_DIM), &self.device)?;
        let actions = Tensor::from_vec(actions, (n, Action::N), &self.device)?;
        Ok((states, actions))
    }
}

impl QValueEstimator for CandleEstimator {
    fn predict(&self, states: &[NormalizedState], actions: &[Action]) -> Result<Vec<f32>> {
        if states.is_empty() && actions.is_empty() {
            return Ok(vec![]);
        }
        let (states, actions) = self.input(states, actions)?;
        let q = self.qnet.forward(&states, &actions)?;
        Ok(q.flatten_all()?.to_vec1::<f32>()?)
    }

    fn train_step(
        &mut self,
        states: &[NormalizedState],
        actions: &[Action],
        targets: &[f32],
    ) -> Result<f32> {
        ensure!(
            targets.len() == states.len(),
            "{} targets for {} states",
            targets.len(),
            states.len()
        );
        ensure!(!targets.is_empty(), "Empty training batch");
        let (states, actions) = self.input(states, actions)?;
        let targets = Tensor::from_slice(targets, (targets.len(), 1), &self.device)?;
        let pred = self.qnet.forward(&states, &actions)?;
        let loss = mse(&pred, &targets)?;
        self.opt.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    fn clone_as_target(&self) -> Result<Self> {
        let target = Self::build_on(self.config.clone(), self.device.clone())?;
        copy(&target.varmap, &self.varmap)?;
        Ok(target)
    }

    fn soft_update(&mut self, source: &Self, tau: f64) -> Result<()> {
        track(&self.varmap, &source.varmap, tau)
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        let path = path.join(PARAMS_FILE);
        self.varmap.save(&path)?;
        info!("Save qnet to {:?}", path);
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        let path = path.join(PARAMS_FILE);
        self.varmap.load(&path)?;
        info!("Load qnet from {:?}", path);
        Ok(())
    }
}
