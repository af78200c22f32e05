//! Stage error types

use thiserror::Error;

use crate::stage::TargetId;

/// Errors raised while reading or writing targets on a stage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    /// The handle does not name a live target
    #[error("Unknown target: {0:?}")]
    UnknownTarget(TargetId),

    /// The target exists but has no property with this name
    #[error("Target {target:?} has no property `{property}`")]
    MissingProperty { target: TargetId, property: String },

    /// Reparenting would make a target its own ancestor
    #[error("Cannot parent {child:?} under {parent:?}: would create a cycle")]
    CyclicParent { parent: TargetId, child: TargetId },
}

/// Result type for stage operations
pub type Result<T> = std::result::Result<T, StageError>;
