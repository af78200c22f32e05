//! Action error types

use cadence_core::StageError;
use thiserror::Error;

use crate::action::ActionId;

/// Errors raised while building or advancing actions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    /// A target or property lookup failed
    #[error(transparent)]
    Stage(#[from] StageError),

    /// The action already completed and must not be advanced again
    #[error("{0} advanced after completion")]
    IllegalAdvance(ActionId),
}

/// Result type for action operations
pub type Result<T> = std::result::Result<T, ActionError>;
