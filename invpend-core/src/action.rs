//! Discrete actions applied to the cart.
use serde::{Deserialize, Serialize};

/// Force applied to the cart, one of three levels.
///
/// The declaration order is the precedence order used to break ties
/// in greedy action selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Action {
    /// Push the cart towards negative `x`.
    Decrease,

    /// Apply no force.
    Hold,

    /// Push the cart towards positive `x`.
    Increase,
}

impl Action {
    /// All actions in precedence order.
    pub const ALL: [Action; 3] = [Action::Decrease, Action::Hold, Action::Increase];

    /// Number of actions.
    pub const N: usize = 3;

    /// Signed multiplier of the force factor.
    pub fn force_multiplier(&self) -> f64 {
        match self {
            Self::Decrease => -1.0,
            Self::Hold => 0.0,
            Self::Increase => 1.0,
        }
    }

    /// Position of the action in [`Action::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::Decrease => 0,
            Self::Hold => 1,
            Self::Increase => 2,
        }
    }

    /// Inverse of [`Action::index`].
    pub fn from_index(ix: usize) -> Option<Self> {
        Self::ALL.get(ix).copied()
    }

    /// One-hot encoding consumed by estimators.
    pub fn one_hot(&self) -> [f32; 3] {
        let mut v = [0f32; 3];
        v[self.index()] = 1.0;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding() {
        assert_eq!(Action::Decrease.one_hot(), [1.0, 0.0, 0.0]);
        assert_eq!(Action::Hold.one_hot(), [0.0, 1.0, 0.0]);
        assert_eq!(Action::Increase.one_hot(), [0.0, 0.0, 1.0]);
        assert_eq!(Action::Decrease.force_multiplier(), -1.0);
        assert_eq!(Action::Hold.force_multiplier(), 0.0);
        assert_eq!(Action::Increase.force_multiplier(), 1.0);

        for a in Action::ALL.iter() {
            assert_eq!(Action::from_index(a.index()), Some(*a));
        }
        assert_eq!(Action::from_index(3), None);
    }
}
