//! States of the cart-pendulum.
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Physical state of the cart-pendulum.
///
/// The angle is measured from the upright position, so `theta = 0` is the
/// inverted pendulum and `theta = π` is the pendulum hanging down.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PhysicalState {
    /// Position of the cart.
    pub x: f64,

    /// Velocity of the cart.
    pub xdot: f64,

    /// Angle of the pole.
    pub theta: f64,

    /// Angular velocity of the pole.
    pub thetadot: f64,
}

impl PhysicalState {
    /// Constructs a physical state.
    pub fn new(x: f64, xdot: f64, theta: f64, thetadot: f64) -> Self {
        Self {
            x,
            xdot,
            theta,
            thetadot,
        }
    }

    /// The cart at rest at the origin with the pole hanging down.
    pub fn hanging() -> Self {
        Self::new(0.0, 0.0, PI, 0.0)
    }

    /// Returns the state as `[x, xdot, theta, thetadot]`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.xdot, self.theta, self.thetadot]
    }

    /// Builds a state from `[x, xdot, theta, thetadot]`.
    pub fn from_array(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl Default for PhysicalState {
    fn default() -> Self {
        Self::hanging()
    }
}

/// State with every component affinely mapped to `[-1, 1]`.
///
/// Values are produced by [`StateNormalizer`](crate::StateNormalizer) and
/// may lie outside of `[-1, 1]` when the physical state left the operating
/// envelope.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedState([f64; 4]);

impl NormalizedState {
    /// Wraps normalized components `[x, xdot, theta, thetadot]`.
    pub fn new(v: [f64; 4]) -> Self {
        Self(v)
    }

    /// Returns the components.
    pub fn as_array(&self) -> &[f64; 4] {
        &self.0
    }

    /// Returns the components in single precision, as consumed by estimators.
    pub fn to_f32(&self) -> [f32; 4] {
        [
            self.0[0] as f32,
            self.0[1] as f32,
            self.0[2] as f32,
            self.0[3] as f32,
        ]
    }

    /// Returns `true` iff every component lies within `[-1, 1]`, bounds included.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|v| (-1.0..=1.0).contains(v))
    }
}

impl From<[f64; 4]> for NormalizedState {
    fn from(v: [f64; 4]) -> Self {
        Self(v)
    }
}
