//! Cadence Core
//!
//! The collaborators an action scheduler animates:
//!
//! - **Targets**: opaque [`TargetId`] handles naming animatable objects
//! - **Stage**: the [`Stage`] contract for reading and writing named numeric
//!   properties and for detaching targets from their parent
//! - **Scene**: a small slotmap-backed scene graph implementing [`Stage`]
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Scene, Stage};
//!
//! let mut scene = Scene::new();
//! let root = scene.spawn_named("root");
//! let sprite = scene.spawn_named("sprite");
//! scene.insert_property(sprite, "x", 0.0).unwrap();
//! scene.add_child(root, sprite).unwrap();
//!
//! scene.set_property(sprite, "x", 4.0).unwrap();
//! assert_eq!(scene.property(sprite, "x"), Some(4.0));
//!
//! assert!(scene.detach(sprite));
//! assert_eq!(scene.parent(sprite), None);
//! ```

pub mod error;
pub mod scene;
pub mod stage;

pub use error::{Result, StageError};
pub use scene::{Scene, SceneNode};
pub use stage::{Stage, TargetId};
