//! The stage contract
//!
//! A stage owns the objects an action scheduler animates. Actions never hold
//! references to targets; they hold [`TargetId`] handles and are handed the
//! stage by exclusive borrow on every advance.

use slotmap::new_key_type;

use crate::error::{Result, StageError};

new_key_type! {
    /// Opaque handle identifying an animatable target
    pub struct TargetId;
}

/// Objects with named numeric properties and an optional parent relation
pub trait Stage {
    /// Check whether the handle names a live target
    fn contains(&self, target: TargetId) -> bool;

    /// Read a named property, `None` if the target or property is absent
    fn property(&self, target: TargetId, name: &str) -> Option<f32>;

    /// Write an existing named property
    fn set_property(&mut self, target: TargetId, name: &str, value: f32) -> Result<()>;

    /// Get the parent of a target
    fn parent(&self, _target: TargetId) -> Option<TargetId> {
        None
    }

    /// Detach a target from its parent, returning whether it had one
    fn detach(&mut self, _target: TargetId) -> bool {
        false
    }

    /// Read a named property, reporting which lookup failed
    fn require_property(&self, target: TargetId, name: &str) -> Result<f32> {
        if !self.contains(target) {
            return Err(StageError::UnknownTarget(target));
        }
        self.property(target, name)
            .ok_or_else(|| StageError::MissingProperty {
                target,
                property: name.to_string(),
            })
    }
}
