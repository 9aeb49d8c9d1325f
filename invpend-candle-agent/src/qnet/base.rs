use super::{QNetConfig, STATE_DIM};
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{Init, Linear, Module, VarBuilder};
use invpend_core::Action;

fn linear(in_dim: usize, out_dim: usize, vb: VarBuilder, config: &QNetConfig) -> Result<Linear> {
    let init_ws = Init::Randn {
        mean: 0.0,
        stdev: config.weight_stdev,
    };
    let ws = vb.get_with_hints((out_dim, in_dim), "weight", init_ws)?;
    let bs = vb.get_with_hints(out_dim, "bias", Init::Const(config.bias_init))?;
    Ok(Linear::new(ws, Some(bs)))
}

/// Action-value function with separate state and action branches.
///
/// The state passes two ReLU layers, the one-hot action a single one. Both are
/// summed with a shared bias, activated and reduced to a scalar by a linear head.
pub struct QNet {
    state1: Linear,
    state2: Linear,
    action: Linear,
    bias: Tensor,
    head: Linear,
}

impl QNet {
    /// Creates the variables of the network in `vb`.
    pub fn build(vb: VarBuilder, config: &QNetConfig) -> Result<Self> {
        let state1 = linear(STATE_DIM, config.state_units, vb.pp("state1"), config)?;
        let state2 = linear(config.state_units, config.units, vb.pp("state2"), config)?;
        let action = linear(Action::N, config.units, vb.pp("action"), config)?;
        let bias = vb.get_with_hints(config.units, "combined_bias", Init::Const(config.bias_init))?;
        let head = linear(config.units, 1, vb.pp("head"), config)?;

        Ok(Self {
            state1,
            state2,
            action,
            bias,
            head,
        })
    }

    /// Returns action values of shape `(n, 1)`.
    ///
    /// `states` has shape `(n, STATE_DIM)` and `actions` `(n, Action::N)`.
    pub fn forward(&self, states: &Tensor, actions: &Tensor) -> Result<Tensor> {
        let hs = self.state1.forward(states)?.relu()?;
        let hs = self.state2.forward(&hs)?.relu()?;
        let ha = self.action.forward(actions)?.relu()?;
        let h = (hs + ha)?.broadcast_add(&self.bias)?.relu()?;
        Ok(self.head.forward(&h)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device};
    use candle_nn::VarMap;

    #[test]
    fn test_forward_shape() -> Result<()> {
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let qnet = QNet::build(vb, &QNetConfig::default())?;

        let states = Tensor::zeros((5, 4), DType::F32, &Device::Cpu)?;
        let actions = Tensor::zeros((5, 3), DType::F32, &Device::Cpu)?;
        let q = qnet.forward(&states, &actions)?;
        assert_eq!(q.dims(), &[5, 1]);
        assert_eq!(varmap.all_vars().len(), 9);
        Ok(())
    }

    #[test]
    fn test_constant_init() -> Result<()> {
        // Without random weights every unit evaluates to its biases
        let config = QNetConfig::default().weight_stdev(0.0).bias_init(0.1);
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let qnet = QNet::build(vb, &config)?;

        let states = Tensor::ones((2, 4), DType::F32, &Device::Cpu)?;
        let actions = Tensor::ones((2, 3), DType::F32, &Device::Cpu)?;
        let q = qnet.forward(&states, &actions)?.flatten_all()?.to_vec1::<f32>()?;
        for v in q {
            assert!((v - 0.1).abs() < 1e-6);
        }
        Ok(())
    }
}
