//! Normalization and validity of states.
use crate::{error::InvPendError, NormalizedState, PhysicalState};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Range `(min, max)` of a state dimension.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bounds {
    /// Lower bound.
    pub min: f64,

    /// Upper bound.
    pub max: f64,
}

impl Bounds {
    /// Constructs bounds.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    fn normalize(&self, v: f64) -> f64 {
        2.0 * (v - self.min) / (self.max - self.min) - 1.0
    }

    #[inline]
    fn denormalize(&self, v: f64) -> f64 {
        (v + 1.0) * (self.max - self.min) / 2.0 + self.min
    }

    #[inline]
    fn contains_strictly(&self, v: f64) -> bool {
        self.min < v && v < self.max
    }
}

/// Configuration of [`StateNormalizer`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StateNormalizerConfig {
    /// Bounds of the cart position.
    pub x: Bounds,

    /// Bounds of the cart velocity.
    pub xdot: Bounds,

    /// Bounds of the pole angle.
    pub theta: Bounds,

    /// Bounds of the angular velocity of the pole.
    pub thetadot: Bounds,
}

impl Default for StateNormalizerConfig {
    fn default() -> Self {
        Self {
            x: Bounds::new(-10.0, 10.0),
            xdot: Bounds::new(-100.0, 100.0),
            theta: Bounds::new(-10.0, 10.0),
            thetadot: Bounds::new(-100.0, 100.0),
        }
    }
}

impl StateNormalizerConfig {
    /// Sets the bounds of the cart position.
    pub fn x(mut self, min: f64, max: f64) -> Self {
        self.x = Bounds::new(min, max);
        self
    }

    /// Sets the bounds of the cart velocity.
    pub fn xdot(mut self, min: f64, max: f64) -> Self {
        self.xdot = Bounds::new(min, max);
        self
    }

    /// Sets the bounds of the pole angle.
    pub fn theta(mut self, min: f64, max: f64) -> Self {
        self.theta = Bounds::new(min, max);
        self
    }

    /// Sets the bounds of the angular velocity.
    pub fn thetadot(mut self, min: f64, max: f64) -> Self {
        self.thetadot = Bounds::new(min, max);
        self
    }
}

/// Maps physical states to [`NormalizedState`] and classifies validity.
///
/// Dimension `d` is mapped with `2 * (raw_d - min_d) / (max_d - min_d) - 1`.
/// The mapping is fixed at construction and does not depend on data.
#[derive(Debug, Clone, PartialEq)]
pub struct StateNormalizer {
    bounds: [Bounds; 4],
}

impl StateNormalizer {
    const DIMS: [&'static str; 4] = ["x", "xdot", "theta", "thetadot"];

    /// Constructs a normalizer, failing if some `min >= max`.
    pub fn new(config: &StateNormalizerConfig) -> Result<Self> {
        let bounds = [config.x, config.xdot, config.theta, config.thetadot];
        for (dim, b) in Self::DIMS.iter().zip(bounds.iter()) {
            // Also rejects NaN bounds
            if !(b.min < b.max) {
                return Err(InvPendError::InvalidBounds {
                    dim: *dim,
                    min: b.min,
                    max: b.max,
                }
                .into());
            }
        }
        Ok(Self { bounds })
    }

    /// Normalizes a physical state.
    pub fn normalize(&self, state: &PhysicalState) -> NormalizedState {
        let raw = state.to_array();
        let mut v = [0f64; 4];
        for i in 0..4 {
            v[i] = self.bounds[i].normalize(raw[i]);
        }
        NormalizedState::new(v)
    }

    /// Inverse of [`StateNormalizer::normalize`].
    pub fn denormalize(&self, state: &NormalizedState) -> PhysicalState {
        let n = state.as_array();
        let mut v = [0f64; 4];
        for i in 0..4 {
            v[i] = self.bounds[i].denormalize(n[i]);
        }
        PhysicalState::from_array(v)
    }

    /// Returns `true` iff every raw component lies strictly inside its bounds.
    pub fn is_valid_raw(&self, state: &PhysicalState) -> bool {
        state
            .to_array()
            .iter()
            .zip(self.bounds.iter())
            .all(|(v, b)| b.contains_strictly(*v))
    }

    /// Returns `true` iff every normalized component lies in `[-1, 1]`.
    ///
    /// Bounds are inclusive, unlike [`StateNormalizer::is_valid_raw`]. This is
    /// the check the training loop terminates episodes on.
    pub fn is_valid_normalized(state: &NormalizedState) -> bool {
        state.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> StateNormalizer {
        StateNormalizer::new(&StateNormalizerConfig::default()).unwrap()
    }

    #[test]
    fn test_normalize_x_bounds() {
        let n = normalizer();
        let s = n.normalize(&PhysicalState::new(0.0, 0.0, 0.0, 0.0));
        assert_eq!(s.as_array(), &[0.0, 0.0, 0.0, 0.0]);

        let s = n.normalize(&PhysicalState::new(10.0, 0.0, 0.0, 0.0));
        assert!((s.as_array()[0] - 1.0).abs() < 1e-12);
        assert!(StateNormalizer::is_valid_normalized(&s));

        // Boundary-exact raw states are invalid in raw space
        assert!(!n.is_valid_raw(&PhysicalState::new(10.0, 0.0, 0.0, 0.0)));
        assert!(!n.is_valid_raw(&PhysicalState::new(15.0, 0.0, 0.0, 0.0)));
        assert!(n.is_valid_raw(&PhysicalState::new(9.999, 0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_normalize_each_dimension() {
        let n = normalizer();
        let s = n.normalize(&PhysicalState::new(-5.0, 50.0, 2.5, -100.0));
        let v = s.as_array();
        assert!((v[0] + 0.5).abs() < 1e-12);
        assert!((v[1] - 0.5).abs() < 1e-12);
        assert!((v[2] - 0.25).abs() < 1e-12);
        assert!((v[3] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_denormalize_inverts_normalize() {
        let n = normalizer();
        let states = [
            PhysicalState::new(0.0, 0.0, std::f64::consts::PI, 0.0),
            PhysicalState::new(-9.5, 99.0, -3.3, 12.25),
            PhysicalState::new(7.125, -0.001, 9.99, -99.9),
        ];
        for s in states.iter() {
            let s_ = n.denormalize(&n.normalize(s));
            for (a, b) in s.to_array().iter().zip(s_.to_array().iter()) {
                assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
            }
        }
    }

    #[test]
    fn test_is_valid_normalized_inclusive() {
        assert!(StateNormalizer::is_valid_normalized(&NormalizedState::new([
            1.0, -1.0, 0.0, 1.0
        ])));
        assert!(!StateNormalizer::is_valid_normalized(&NormalizedState::new([
            1.0000001, 0.0, 0.0, 0.0
        ])));
        assert!(!StateNormalizer::is_valid_normalized(&NormalizedState::new([
            0.0, 0.0, -1.0000001, 0.0
        ])));
        assert!(!StateNormalizer::is_valid_normalized(&NormalizedState::new([
            0.0,
            f64::NAN,
            0.0,
            0.0
        ])));
    }

    #[test]
    fn test_invalid_bounds() {
        let config = StateNormalizerConfig::default().theta(1.0, 1.0);
        assert!(StateNormalizer::new(&config).is_err());
        let config = StateNormalizerConfig::default().xdot(5.0, -5.0);
        assert!(StateNormalizer::new(&config).is_err());
    }
}
