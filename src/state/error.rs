use super::event::PointerEvent;
use super::model::PointerState;
use thiserror::Error;

pub type StateResult<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("invalid pointer transition: from {from:?} using event {event:?}")]
    InvalidStateTransition {
        from: PointerState,
        event: PointerEvent,
    },
}
