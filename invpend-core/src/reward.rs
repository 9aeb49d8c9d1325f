//! Reward shaping and episode termination.
use crate::{NormalizedState, PhysicalState};
use serde::{Deserialize, Serialize};

/// How the cart position enters the "centered" condition of the reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionCheck {
    /// `|x| < center_threshold`.
    Absolute,

    /// `x < center_threshold`, any position left of the threshold counts as centered.
    Signed,
}

/// Configuration of the reward.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RewardConfig {
    /// Reward when the pole is upright and the cart centered.
    pub upright_reward: f32,

    /// Reward of any other state inside the operating envelope.
    pub off_center_reward: f32,

    /// Reward when the state escapes the operating envelope.
    pub escape_reward: f32,

    /// Threshold on `|theta|` and on the position of the cart.
    pub center_threshold: f64,

    /// Test applied to the position of the cart.
    pub position_check: PositionCheck,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            upright_reward: 0.1,
            off_center_reward: -0.001,
            escape_reward: -1.0,
            center_threshold: 0.25,
            position_check: PositionCheck::Absolute,
        }
    }
}

/// Reward of a step and whether the episode terminates on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Reward.
    pub reward: f32,

    /// The resulting state left the operating envelope.
    pub is_terminated: bool,
}

impl RewardConfig {
    /// Sets the position check.
    pub fn position_check(mut self, v: PositionCheck) -> Self {
        self.position_check = v;
        self
    }

    /// Evaluates the state reached by a step.
    ///
    /// `raw` and `normalized` describe the same state. Validity is decided on
    /// the normalized state, the shaping on the physical one.
    pub fn evaluate(&self, raw: &PhysicalState, normalized: &NormalizedState) -> StepOutcome {
        if !normalized.is_valid() {
            return StepOutcome {
                reward: self.escape_reward,
                is_terminated: true,
            };
        }

        let is_upright = raw.theta.abs() < self.center_threshold;
        let is_centered = match self.position_check {
            PositionCheck::Absolute => raw.x.abs() < self.center_threshold,
            PositionCheck::Signed => raw.x < self.center_threshold,
        };
        let reward = if is_upright && is_centered {
            self.upright_reward
        } else {
            self.off_center_reward
        };

        StepOutcome {
            reward,
            is_terminated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NormalizedState {
        NormalizedState::new([0.0; 4])
    }

    #[test]
    fn test_upright_and_centered() {
        let config = RewardConfig::default();
        let o = config.evaluate(&PhysicalState::new(0.1, 3.0, -0.2, 1.0), &valid());
        assert_eq!(o.reward, 0.1);
        assert!(!o.is_terminated);

        let o = config.evaluate(&PhysicalState::new(0.1, 0.0, 0.3, 0.0), &valid());
        assert_eq!(o.reward, -0.001);
        assert!(!o.is_terminated);
    }

    #[test]
    fn test_position_check() {
        let s = PhysicalState::new(-2.0, 0.0, 0.0, 0.0);
        let config = RewardConfig::default();
        assert_eq!(config.evaluate(&s, &valid()).reward, -0.001);
        let config = config.position_check(PositionCheck::Signed);
        assert_eq!(config.evaluate(&s, &valid()).reward, 0.1);
    }

    #[test]
    fn test_escape() {
        let config = RewardConfig::default();
        let invalid = NormalizedState::new([0.0, 0.0, 1.5, 0.0]);
        let o = config.evaluate(&PhysicalState::new(0.0, 0.0, 0.0, 0.0), &invalid);
        assert_eq!(o.reward, -1.0);
        assert!(o.is_terminated);
    }
}
