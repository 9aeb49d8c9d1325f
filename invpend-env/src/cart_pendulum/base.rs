use super::CartPendulumConfig;
use anyhow::Result;
use invpend_core::{PhysicalState, Simulator};
use log::trace;

/// Frictionless cart carrying a pole with a point mass at its tip.
///
/// `theta` is measured from the upright position, so `theta = π` is hanging.
/// A positive force accelerates the cart towards positive `x`.
pub struct CartPendulum {
    config: CartPendulumConfig,
    state: [f64; 4],
}

impl CartPendulum {
    // Time derivative of (x, xdot, theta, thetadot).
    fn derivative(&self, s: &[f64; 4], force: f64) -> [f64; 4] {
        let CartPendulumConfig {
            gravity: g,
            cart_mass: mc,
            pole_mass: mp,
            pole_length: l,
            ..
        } = self.config;
        let (sin, cos) = s[2].sin_cos();
        let thetadot = s[3];

        let xacc = (force + mp * sin * (l * thetadot * thetadot - g * cos)) / (mc + mp * sin * sin);
        let thetaacc = (g * sin - xacc * cos) / l;

        [s[1], xacc, thetadot, thetaacc]
    }

    fn rk4(&self, s: &[f64; 4], force: f64, h: f64) -> [f64; 4] {
        let add = |a: &[f64; 4], k: &[f64; 4], c: f64| -> [f64; 4] {
            [a[0] + c * k[0], a[1] + c * k[1], a[2] + c * k[2], a[3] + c * k[3]]
        };
        let k1 = self.derivative(s, force);
        let k2 = self.derivative(&add(s, &k1, h / 2.0), force);
        let k3 = self.derivative(&add(s, &k2, h / 2.0), force);
        let k4 = self.derivative(&add(s, &k3, h), force);

        let mut next = *s;
        for i in 0..4 {
            next[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        next
    }
}

impl Simulator for CartPendulum {
    type Config = CartPendulumConfig;

    fn build(config: &Self::Config, initial: PhysicalState) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            state: initial.to_array(),
        })
    }

    fn step(&mut self, force: f64) -> Result<()> {
        let h = self.config.dt / self.config.substeps as f64;
        for _ in 0..self.config.substeps {
            self.state = self.rk4(&self.state, force, h);
        }
        trace!("force = {}, state = {:?}", force, self.state);
        Ok(())
    }

    fn state(&self) -> PhysicalState {
        PhysicalState::from_array(self.state)
    }
}
