//! Action scheduler
//!
//! Owns the registry of top-level actions and advances them once per frame.

use cadence_core::{Stage, TargetId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::action::{Action, ActionId};
use crate::config::SchedulerConfig;
use crate::error::ActionError;

/// What happened during one [`ActionScheduler::tick`]
#[derive(Debug, Default, PartialEq)]
pub struct TickReport {
    /// Top-level actions that completed and were removed
    pub completed: Vec<ActionId>,
    /// Continuations registered because their predecessor completed
    pub started: Vec<ActionId>,
    /// Actions dropped because advancing them failed
    pub faults: Vec<(ActionId, ActionError)>,
}

impl TickReport {
    pub fn is_quiet(&self) -> bool {
        self.completed.is_empty() && self.started.is_empty() && self.faults.is_empty()
    }
}

/// The scheduler that ticks all registered actions
pub struct ActionScheduler {
    actions: FxHashMap<ActionId, Action>,
    config: SchedulerConfig,
}

impl ActionScheduler {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            actions: FxHashMap::default(),
            config,
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SchedulerConfig) {
        self.config = config;
    }

    /// Register an action; an action already registered under the same id is replaced
    pub fn start(&mut self, action: Action) -> ActionId {
        let id = action.id();
        tracing::debug!(%id, kind = action.kind_name(), "start action");
        self.actions.insert(id, action);
        id
    }

    pub fn is_playing(&self, id: ActionId) -> bool {
        self.actions.contains_key(&id)
    }

    /// Stop ticking an action without completing it.
    ///
    /// The returned instance keeps its progress; starting it again resumes.
    pub fn pause(&mut self, id: ActionId) -> Option<Action> {
        let action = self.actions.remove(&id)?;
        tracing::debug!(%id, "pause action");
        Some(action)
    }

    /// Drop every top-level tween animating `target`, returning how many were removed.
    ///
    /// Tweens nested inside combinators are left alone.
    pub fn clear(&mut self, target: TargetId) -> usize {
        let before = self.actions.len();
        self.actions.retain(|_, action| action.target() != Some(target));
        let removed = before - self.actions.len();
        if removed > 0 {
            tracing::debug!(?target, removed, "cleared target actions");
        }
        removed
    }

    /// Drop every registered action, returning how many were removed
    pub fn stop_all(&mut self) -> usize {
        let removed = self.actions.len();
        self.actions.clear();
        removed
    }

    pub fn get(&self, id: ActionId) -> Option<&Action> {
        self.actions.get(&id)
    }

    /// Ids of all registered actions, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Check if any actions are still registered
    pub fn has_active_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Advance every registered action by `delta` seconds.
    ///
    /// Works on a snapshot of the registry: continuations started during this
    /// tick get their first advance on the next one. An action that fails is
    /// logged and dropped without running its continuations; the rest of the
    /// tick proceeds.
    pub fn tick(&mut self, delta: f32, stage: &mut dyn Stage) -> TickReport {
        let dt = self.config.effective_delta(delta);
        let snapshot: SmallVec<[ActionId; 16]> = self.actions.keys().copied().collect();
        let mut report = TickReport::default();

        tracing::trace!(delta, dt, actions = snapshot.len(), "tick");

        for id in snapshot {
            let Some(action) = self.actions.get_mut(&id) else {
                continue;
            };

            match action.advance(dt, stage) {
                Ok(false) => {}
                Ok(true) => {
                    let Some(mut finished) = self.actions.remove(&id) else {
                        continue;
                    };
                    tracing::debug!(%id, kind = finished.kind_name(), "action completed");
                    report.completed.push(id);

                    for next in finished.take_queued() {
                        report.started.push(self.start(next));
                    }
                }
                Err(error) => {
                    tracing::warn!(%id, %error, "dropping failed action");
                    self.actions.remove(&id);
                    report.faults.push((id, error));
                }
            }
        }

        report
    }
}

impl Default for ActionScheduler {
    fn default() -> Self {
        Self::new()
    }
}
