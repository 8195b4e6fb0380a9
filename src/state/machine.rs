use super::error::{StateError, StateResult};
use super::event::StateTransition;
use super::{PointerEvent, PointerState};

#[derive(Debug)]
pub struct PointerStateMachine {
    state: PointerState,
    transition_history: Vec<StateTransition>,
}

impl PointerStateMachine {
    pub fn new() -> Self {
        Self {
            state: PointerState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn can_transition(&self, event: PointerEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: PointerEvent) -> Option<PointerState> {
        use PointerEvent::*;
        match (self.state, event) {
            (PointerState::Idle, PressBody) => Some(PointerState::Dragging),
            (PointerState::Idle, PressAnchor) => Some(PointerState::Resizing),
            (PointerState::Dragging, Move) => Some(PointerState::Dragging),
            (PointerState::Dragging, Release) => Some(PointerState::Idle),
            (PointerState::Dragging, Leave) => Some(PointerState::Idle),
            (PointerState::Resizing, Move) => Some(PointerState::Resizing),
            (PointerState::Resizing, Release) => Some(PointerState::Idle),
            (PointerState::Resizing, Leave) => Some(PointerState::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: PointerEvent) -> StateResult<PointerState> {
        tracing::debug!(from = ?self.state, event = ?event, "request pointer transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid pointer transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);

        Ok(self.state)
    }

    /// Force the machine back to idle, used when the host tears the canvas
    /// down mid-gesture.
    pub fn reset(&mut self) {
        if self.state != PointerState::Idle {
            let record = StateTransition::new(Some(self.state), PointerEvent::Leave, PointerState::Idle);
            self.transition_history.push(record);
            self.state = PointerState::Idle;
        }
    }
}

#[cfg(test)]
impl PointerStateMachine {
    fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for PointerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PointerStateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PointerState::{:?}", self.state)
    }
}
