use super::error::{StateError, StateResult};
use super::{StateTransition, StudioEvent, StudioState};

/// Gallery/editor lifecycle. At most one editor session is open at a time.
#[derive(Debug, Default)]
pub struct StateMachine {
    state: StudioState,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StudioState {
        self.state
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }

    pub fn can_transition(&self, event: StudioEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: StudioEvent) -> Option<StudioState> {
        use StudioEvent::*;
        match (self.state, event) {
            (StudioState::Gallery, OpenEditor) => Some(StudioState::Editing),
            (StudioState::Editing, SaveEdit | CancelEdit) => Some(StudioState::Gallery),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: StudioEvent) -> StateResult<StudioState> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StudioState::{:?}", self.state)
    }
}
