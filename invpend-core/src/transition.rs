//! Transition.
use crate::{Action, NormalizedState};

/// A transition `(s_t, a_t, r_t, s_t+1)` in normalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// State before the action.
    pub state: NormalizedState,

    /// Action taken.
    pub action: Action,

    /// Reward received.
    pub reward: f32,

    /// State after the action.
    pub next_state: NormalizedState,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(
        state: NormalizedState,
        action: Action,
        reward: f32,
        next_state: NormalizedState,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
        }
    }

    /// Returns `false` if `next_state` escaped the operating envelope.
    #[inline]
    pub fn is_next_valid(&self) -> bool {
        self.next_state.is_valid()
    }
}
