use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Physical constants and integration settings of [`CartPendulum`](super::CartPendulum).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(default)]
pub struct CartPendulumConfig {
    /// Gravitational acceleration.
    pub gravity: f64,

    /// Mass of the cart.
    pub cart_mass: f64,

    /// Mass at the tip of the pole.
    pub pole_mass: f64,

    /// Distance between the pivot and the tip of the pole.
    pub pole_length: f64,

    /// Time advanced by a single step.
    pub dt: f64,

    /// The number of Runge-Kutta substeps per step.
    pub substeps: usize,
}

impl Default for CartPendulumConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            cart_mass: 1.0,
            pole_mass: 0.1,
            pole_length: 0.5,
            dt: 0.02,
            substeps: 4,
        }
    }
}

impl CartPendulumConfig {
    /// Sets the time step.
    pub fn dt(mut self, v: f64) -> Self {
        self.dt = v;
        self
    }

    /// Sets the number of substeps.
    pub fn substeps(mut self, v: usize) -> Self {
        self.substeps = v;
        self
    }

    /// Sets the gravitational acceleration.
    pub fn gravity(mut self, v: f64) -> Self {
        self.gravity = v;
        self
    }

    pub(super) fn validate(&self) -> Result<()> {
        ensure!(self.cart_mass > 0.0, "cart_mass must be positive");
        ensure!(self.pole_mass > 0.0, "pole_mass must be positive");
        ensure!(self.pole_length > 0.0, "pole_length must be positive");
        ensure!(self.dt > 0.0, "dt must be positive");
        ensure!(self.substeps > 0, "substeps must be positive");
        Ok(())
    }

    /// Constructs [`CartPendulumConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CartPendulumConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
