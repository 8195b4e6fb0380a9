pub mod error;
pub mod event;
pub mod machine;
pub mod model;

pub use error::{StateError, StateResult};
pub use event::{PointerEvent, StateTransition};
pub use machine::PointerStateMachine;
pub use model::PointerState;
