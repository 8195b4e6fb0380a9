use thiserror::Error;

use crate::board::BoardError;
use crate::config::ConfigError;
use crate::export::ExportError;
use crate::freeform::FreeFormError;
use crate::intake::IntakeError;
use crate::pack::PackFailure;
use crate::state::StateError;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error(transparent)]
    Pack(#[from] PackFailure),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    FreeForm(#[from] FreeFormError),

    #[error(transparent)]
    Export(#[from] ExportError),
}
