use serde::{Deserialize, Serialize};

/// Miniport lifecycle.
///
/// State transitions:
/// ```text
/// uninitialized → initialized → destroyed
///       └──────────────────────────┘
/// ```
/// A failed `init` leaves the object `Uninitialized`; `teardown` from any
/// state other than `Initialized` does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MiniportState {
    Uninitialized,
    Initialized,
    Destroyed,
}

impl MiniportState {
    pub fn is_initialized(&self) -> bool {
        matches!(self, Self::Initialized)
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self, Self::Destroyed)
    }
}

/// Kernel-streaming run state of a stream.
///
/// ```text
/// stop ↔ acquire ↔ pause ↔ run
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KsState {
    Stop,
    Acquire,
    Pause,
    Run,
}

impl KsState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Run)
    }

    /// Whether the host may move directly from `self` to `next`.
    ///
    /// The host steps through adjacent states; repeating the current state is allowed.
    pub fn can_transition_to(&self, next: KsState) -> bool {
        (*self as i32 - next as i32).abs() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ks_state_steps_through_neighbours() {
        assert!(KsState::Stop.can_transition_to(KsState::Acquire));
        assert!(KsState::Run.can_transition_to(KsState::Pause));
        assert!(KsState::Pause.can_transition_to(KsState::Pause));
        assert!(!KsState::Stop.can_transition_to(KsState::Run));
        assert!(!KsState::Run.can_transition_to(KsState::Acquire));
    }

    #[test]
    fn lifecycle_predicates() {
        assert!(MiniportState::Initialized.is_initialized());
        assert!(!MiniportState::Uninitialized.is_initialized());
        assert!(MiniportState::Destroyed.is_destroyed());
    }
}
