//! Simulators of an inverted pendulum on a cart.
mod cart_pendulum;
pub use cart_pendulum::{CartPendulum, CartPendulumConfig};
