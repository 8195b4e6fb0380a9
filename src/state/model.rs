/// Interaction state of the free-form canvas pointer.
///
/// Drag and resize are mutually exclusive for a given rectangle; a gesture
/// must return to `Idle` before another may begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    #[default]
    Idle,
    Dragging,
    Resizing,
}
