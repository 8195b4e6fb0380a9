use super::model::PointerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Pointer pressed over a rectangle body.
    PressBody,
    /// Pointer pressed over a rectangle's resize anchor.
    PressAnchor,
    Move,
    Release,
    /// Pointer left the canvas mid-gesture; treated like a release.
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<PointerState>,
    pub event: PointerEvent,
    pub to: PointerState,
}

impl StateTransition {
    pub const fn new(from: Option<PointerState>, event: PointerEvent, to: PointerState) -> Self {
        Self { from, event, to }
    }
}
