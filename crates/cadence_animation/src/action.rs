//! Actions
//!
//! An [`Action`] is a unit of timed behavior with a stable identity. Every
//! variant shares one contract: [`Action::advance`] moves it forward by `dt`
//! seconds and reports whether it completed. Leaves live in [`crate::leaf`],
//! combinators in [`crate::combinator`].
//!
//! Lifecycle is a one-way state machine:
//!
//! ```text
//! Pending --advance--> Running --advance returns true--> Done
//! ```
//!
//! Advancing a `Done` action is an error. [`Action::reset`] returns a tree to
//! `Pending` and is how [`Repeat`] starts a fresh cycle.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use cadence_core::{Stage, TargetId};

use crate::combinator::{Parallel, Repeat, Sequence};
use crate::easing::Easing;
use crate::error::{ActionError, Result};
use crate::leaf::{Delay, RunFunc, TargetAction};

static NEXT_ACTION_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an action, assigned at construction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(u64);

impl ActionId {
    fn next() -> Self {
        Self(NEXT_ACTION_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "action#{}", self.0)
    }
}

/// Lifecycle state of an action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActionState {
    /// Built (or reset) but not yet advanced
    #[default]
    Pending,
    /// Advanced at least once, not yet complete
    Running,
    /// Completed; never advanced again
    Done,
}

/// The closed set of action variants
#[derive(Debug)]
pub enum ActionKind {
    Delay(Delay),
    RunFunc(RunFunc),
    Target(TargetAction),
    Sequence(Sequence),
    Parallel(Parallel),
    Repeat(Repeat),
}

/// A composable unit of timed behavior
#[derive(Debug)]
pub struct Action {
    id: ActionId,
    state: ActionState,
    /// Started by the scheduler when this action completes as a top-level entry
    queued: Vec<Action>,
    kind: ActionKind,
}

impl Action {
    /// Wrap a variant in a fresh action with a new identity
    pub fn new(kind: ActionKind) -> Self {
        Self {
            id: ActionId::next(),
            state: ActionState::Pending,
            queued: Vec::new(),
            kind,
        }
    }

    /// Tween named properties of `target` to their final values.
    ///
    /// Fails if the target or any property is absent on `stage`.
    pub fn to<I, K>(
        stage: &dyn Stage,
        target: TargetId,
        properties: I,
        seconds: f32,
        easing: Easing,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, f32)>,
        K: Into<String>,
    {
        let tween = TargetAction::new(stage, target, properties, seconds, easing)?;
        Ok(Self::new(ActionKind::Target(tween)))
    }

    /// Detach `target` from its parent when run
    pub fn remove(target: TargetId) -> Self {
        Self::new(ActionKind::RunFunc(RunFunc::new(move |stage: &mut dyn Stage| {
            stage.detach(target);
        })))
    }

    /// Wait for `seconds`
    pub fn delay(seconds: f32) -> Self {
        Self::new(ActionKind::Delay(Delay::new(seconds)))
    }

    /// Invoke `callback` once
    pub fn run_func<F>(mut callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::new(ActionKind::RunFunc(RunFunc::new(move |_: &mut dyn Stage| {
            callback()
        })))
    }

    /// Invoke `callback` once with access to the stage
    pub fn run_on_stage<F>(callback: F) -> Self
    where
        F: FnMut(&mut dyn Stage) + Send + 'static,
    {
        Self::new(ActionKind::RunFunc(RunFunc::new(callback)))
    }

    /// Run `actions` one after another
    pub fn sequence(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(ActionKind::Sequence(Sequence::new(actions)))
    }

    /// Run `actions` concurrently
    pub fn parallel(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(ActionKind::Parallel(Parallel::new(actions)))
    }

    /// Run `action` `times` times
    pub fn repeat(action: Action, times: u32) -> Self {
        Self::new(ActionKind::Repeat(Repeat::new(action, Some(times))))
    }

    /// Run `action` until paused or cleared
    pub fn repeat_forever(action: Action) -> Self {
        Self::new(ActionKind::Repeat(Repeat::new(action, None)))
    }

    /// Queue `next` to be started when this action completes at top level
    pub fn then(mut self, next: Action) -> Self {
        self.queued.push(next);
        self
    }

    /// Queue a continuation in place
    pub fn queue(&mut self, next: Action) {
        self.queued.push(next);
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == ActionState::Done
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    /// Short variant name for logs
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ActionKind::Delay(_) => "delay",
            ActionKind::RunFunc(_) => "run_func",
            ActionKind::Target(_) => "to",
            ActionKind::Sequence(_) => "sequence",
            ActionKind::Parallel(_) => "parallel",
            ActionKind::Repeat(_) => "repeat",
        }
    }

    /// The animated target, if this is a property tween
    pub fn target(&self) -> Option<TargetId> {
        match &self.kind {
            ActionKind::Target(tween) => Some(tween.target()),
            _ => None,
        }
    }

    /// Continuations waiting on this action
    pub fn queued(&self) -> &[Action] {
        &self.queued
    }

    pub(crate) fn take_queued(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.queued)
    }

    /// Advance by `dt` seconds, returning whether the action completed.
    ///
    /// On error the action keeps its state; callers decide whether to drop it.
    pub fn advance(&mut self, dt: f32, stage: &mut dyn Stage) -> Result<bool> {
        match self.state {
            ActionState::Done => return Err(ActionError::IllegalAdvance(self.id)),
            ActionState::Pending => self.state = ActionState::Running,
            ActionState::Running => {}
        }

        let dt = dt.max(0.0);
        let completed = match &mut self.kind {
            ActionKind::Delay(delay) => delay.advance(dt),
            ActionKind::RunFunc(run) => run.advance(stage),
            ActionKind::Target(tween) => tween.advance(dt, stage)?,
            ActionKind::Sequence(seq) => seq.advance(dt, stage)?,
            ActionKind::Parallel(par) => par.advance(dt, stage)?,
            ActionKind::Repeat(rep) => rep.advance(dt, stage)?,
        };

        if completed {
            self.state = ActionState::Done;
        }
        Ok(completed)
    }

    /// Return this action and its children to `Pending`, keeping identities
    pub fn reset(&mut self) {
        self.state = ActionState::Pending;
        match &mut self.kind {
            ActionKind::Delay(delay) => delay.reset(),
            ActionKind::RunFunc(_) => {}
            ActionKind::Target(tween) => tween.reset(),
            ActionKind::Sequence(seq) => seq.reset(),
            ActionKind::Parallel(par) => par.reset(),
            ActionKind::Repeat(rep) => rep.reset(),
        }
    }
}
