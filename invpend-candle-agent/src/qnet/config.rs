use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
/// Configuration of [`QNet`](super::QNet).
pub struct QNetConfig {
    pub(super) state_units: usize,
    pub(super) units: usize,
    pub(super) weight_stdev: f64,
    pub(super) bias_init: f64,
}

impl Default for QNetConfig {
    fn default() -> Self {
        Self {
            state_units: 16,
            units: 8,
            weight_stdev: 0.1,
            bias_init: 0.1,
        }
    }
}

impl QNetConfig {
    /// Sets the width of the first hidden layer of the state branch.
    pub fn state_units(mut self, v: usize) -> Self {
        self.state_units = v;
        self
    }

    /// Sets the width of the layer where both branches are combined.
    pub fn units(mut self, v: usize) -> Self {
        self.units = v;
        self
    }

    /// Sets the standard deviation of the initial weights.
    pub fn weight_stdev(mut self, v: f64) -> Self {
        self.weight_stdev = v;
        self
    }

    /// Sets the initial value of the biases.
    pub fn bias_init(mut self, v: f64) -> Self {
        self.bias_init = v;
        self
    }
}
