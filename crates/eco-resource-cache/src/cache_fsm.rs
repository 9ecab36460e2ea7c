//! Load-state machine shared by every cache.
//!
//! ```text
//! Uninitialized --Mount--> Loading --Loaded--> Ready
//!                             |                  |
//!                        LoadFailed           Refresh
//!                             v                  |
//!                          Failed --Refresh--> Loading
//!
//! Loading | Ready | Failed --Detach--> Uninitialized
//! ```

use rust_fsm::*;
use serde::Serialize;

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub cache_machine(Uninitialized)

    Uninitialized => {
        Mount => Loading
    },
    Loading => {
        Loaded => Ready,
        LoadFailed => Failed,
        Detach => Uninitialized
    },
    Ready => {
        Refresh => Loading,
        Detach => Uninitialized
    },
    Failed => {
        Refresh => Loading,
        Detach => Uninitialized
    }
}

pub use cache_machine::Input as CacheMachineInput;
pub use cache_machine::State as CacheMachineState;
pub use cache_machine::StateMachine as CacheMachine;

/// Cache load state as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheState {
    Uninitialized,
    Loading,
    Ready,
    Failed,
}

impl CacheState {
    pub fn is_loading(&self) -> bool {
        matches!(self, CacheState::Loading)
    }
}

impl From<&CacheMachineState> for CacheState {
    fn from(state: &CacheMachineState) -> Self {
        match state {
            CacheMachineState::Uninitialized => CacheState::Uninitialized,
            CacheMachineState::Loading => CacheState::Loading,
            CacheMachineState::Ready => CacheState::Ready,
            CacheMachineState::Failed => CacheState::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_uninitialized() {
        let machine = CacheMachine::new();
        assert_eq!(*machine.state(), CacheMachineState::Uninitialized);
    }

    #[test]
    fn test_load_then_refresh() {
        let mut machine = CacheMachine::new();

        machine.consume(&CacheMachineInput::Mount).unwrap();
        assert_eq!(*machine.state(), CacheMachineState::Loading);

        machine.consume(&CacheMachineInput::Loaded).unwrap();
        assert_eq!(*machine.state(), CacheMachineState::Ready);

        machine.consume(&CacheMachineInput::Refresh).unwrap();
        machine.consume(&CacheMachineInput::LoadFailed).unwrap();
        assert_eq!(*machine.state(), CacheMachineState::Failed);

        machine.consume(&CacheMachineInput::Refresh).unwrap();
        assert_eq!(*machine.state(), CacheMachineState::Loading);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut machine = CacheMachine::new();
        assert!(machine.consume(&CacheMachineInput::Refresh).is_err());
        assert!(machine.consume(&CacheMachineInput::Loaded).is_err());

        machine.consume(&CacheMachineInput::Mount).unwrap();
        assert!(machine.consume(&CacheMachineInput::Mount).is_err());
        assert!(machine.consume(&CacheMachineInput::Refresh).is_err());
    }

    #[test]
    fn test_detach_from_any_mounted_state() {
        for inputs in [
            vec![CacheMachineInput::Mount],
            vec![CacheMachineInput::Mount, CacheMachineInput::Loaded],
            vec![CacheMachineInput::Mount, CacheMachineInput::LoadFailed],
        ] {
            let mut machine = CacheMachine::new();
            for input in &inputs {
                machine.consume(input).unwrap();
            }
            machine.consume(&CacheMachineInput::Detach).unwrap();
            assert_eq!(
                CacheState::from(machine.state()),
                CacheState::Uninitialized
            );
        }
    }
}
