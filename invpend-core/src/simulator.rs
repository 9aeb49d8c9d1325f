//! Interface of the physical simulator.
use crate::PhysicalState;
use anyhow::Result;

/// Dynamics of the cart-pendulum, stepped with a force applied to the cart.
pub trait Simulator {
    /// Configurations.
    type Config: Clone;

    /// Builds a simulator starting at `initial`.
    fn build(config: &Self::Config, initial: PhysicalState) -> Result<Self>
    where
        Self: Sized;

    /// Advances the simulation by one control step under `force`.
    fn step(&mut self, force: f64) -> Result<()>;

    /// Returns the current state.
    fn state(&self) -> PhysicalState;
}
