// src/controller/state.rs

use crate::common::command::Command;

/// The two-state machine the host drives with command bytes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// No pulses; records carry flag `0`. Initial state.
    #[default]
    Idle,
    /// Every sample is bracketed by the sync pulse; records carry flag `1`.
    Recording,
}

impl RecordingState {
    #[inline]
    pub const fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    /// Applies a command. Commands set the state rather than toggle it, so
    /// repeating one is a no-op. Returns whether the state changed.
    pub fn apply(&mut self, command: Command) -> bool {
        let next = match command {
            Command::Start => RecordingState::Recording,
            Command::Stop => RecordingState::Idle,
        };
        let changed = *self != next;
        *self = next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        assert_eq!(RecordingState::default(), RecordingState::Idle);
        assert!(!RecordingState::default().is_recording());
    }

    #[test]
    fn test_start_and_stop() {
        let mut state = RecordingState::Idle;
        assert!(state.apply(Command::Start));
        assert!(state.is_recording());
        assert!(state.apply(Command::Stop));
        assert_eq!(state, RecordingState::Idle);
    }

    #[test]
    fn test_commands_are_idempotent() {
        let mut state = RecordingState::Idle;
        state.apply(Command::Start);
        assert!(!state.apply(Command::Start));
        assert_eq!(state, RecordingState::Recording);

        state.apply(Command::Stop);
        assert!(!state.apply(Command::Stop));
        assert_eq!(state, RecordingState::Idle);
    }
}
