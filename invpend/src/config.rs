//! Configuration of a training run.
use anyhow::Result;
use invpend_candle_agent::EstimatorConfig;
use invpend_core::TrainerConfig;
use invpend_env::CartPendulumConfig;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Bundles the configurations of the training session, the simulator and the estimator.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct RunConfig {
    /// Training loop.
    pub trainer: TrainerConfig,

    /// Cart-pendulum simulator.
    pub env: CartPendulumConfig,

    /// Network and optimizer.
    pub estimator: EstimatorConfig,
}

impl RunConfig {
    /// Constructs [`RunConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_run_config() -> Result<()> {
        let mut config = RunConfig::default();
        config.trainer = config.trainer.n_episodes(10).seed(7);
        config.env = config.env.dt(0.01);

        let dir = TempDir::new("run_config")?;
        let path = dir.path().join("run.yaml");
        config.save(&path)?;
        assert_eq!(RunConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_sections_are_optional() -> Result<()> {
        let config: RunConfig = serde_yaml::from_str("trainer:\n  n_episodes: 3\n")?;
        assert_eq!(config.trainer.n_episodes, 3);
        assert_eq!(config.env, CartPendulumConfig::default());
        assert_eq!(config.estimator, EstimatorConfig::default());
        Ok(())
    }
}
