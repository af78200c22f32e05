//! Cadence Animation System
//!
//! Frame-tick-driven action combinators and the scheduler that runs them.
//!
//! # Features
//!
//! - **Leaf actions**: delays, fire-once callbacks, and property tweens
//! - **Combinators**: sequences, parallel groups, and bounded or endless repeats
//! - **Continuations**: actions queued to start when another completes
//! - **Cancellation**: pause by action id, or clear every tween on a target
//!
//! # Example
//!
//! ```rust
//! use cadence_animation::{Action, ActionScheduler, Easing};
//! use cadence_core::{Scene, Stage};
//!
//! let mut scene = Scene::new();
//! let sprite = scene.spawn();
//! scene.insert_property(sprite, "x", 0.0).unwrap();
//!
//! let mut scheduler = ActionScheduler::new();
//! let slide = Action::to(&scene, sprite, [("x", 10.0)], 1.0, Easing::Linear).unwrap();
//! let id = scheduler.start(Action::sequence([slide, Action::remove(sprite)]));
//!
//! scheduler.tick(0.5, &mut scene);
//! assert_eq!(scene.property(sprite, "x"), Some(5.0));
//! scheduler.tick(0.5, &mut scene);
//! assert_eq!(scene.property(sprite, "x"), Some(10.0));
//! assert!(scheduler.is_playing(id));
//! scheduler.tick(0.0, &mut scene);
//! assert!(!scheduler.is_playing(id));
//! ```

pub mod action;
pub mod combinator;
pub mod config;
pub mod easing;
pub mod error;
pub mod leaf;
pub mod scheduler;

pub use action::{Action, ActionId, ActionKind, ActionState};
pub use combinator::{Parallel, Repeat, Sequence};
pub use config::SchedulerConfig;
pub use easing::Easing;
pub use error::{ActionError, Result};
pub use leaf::{Callback, Delay, RunFunc, TargetAction};
pub use scheduler::{ActionScheduler, TickReport};
