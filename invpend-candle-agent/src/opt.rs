//! Optimizer of the value estimator.
use anyhow::Result;
use candle_core::{Tensor, Var};
use candle_nn::Optimizer as _;
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of the optimizer.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
    },
}

impl OptimizerConfig {
    /// Constructs the optimizer of `vars`.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::Adam { lr } => {
                let params = ParamsAdam {
                    lr: *lr,
                    ..ParamsAdam::default()
                };
                Ok(Optimizer::Adam(Adam::new(vars, params)?))
            }
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam { lr: 0.001 }
    }
}

/// Optimizers.
pub enum Optimizer {
    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Applies a backward step pass.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        match self {
            Self::Adam(opt) => Ok(opt.backward_step(loss)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_adam_descends() -> Result<()> {
        let var = Var::new(&[2.0f32, -3.0], &Device::Cpu)?;
        let config: OptimizerConfig = serde_yaml::from_str("Adam:\n  lr: 0.1\n")?;
        assert_eq!(config, OptimizerConfig::Adam { lr: 0.1 });
        let mut opt = config.build(vec![var.clone()])?;

        for _ in 0..20 {
            let loss = var.as_tensor().sqr()?.sum_all()?;
            opt.backward_step(&loss)?;
        }
        let v = var.as_tensor().to_vec1::<f32>()?;
        assert!(v[0].abs() < 2.0 && v[1].abs() < 3.0, "{:?}", v);
        Ok(())
    }
}
