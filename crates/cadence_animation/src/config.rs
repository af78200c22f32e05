//! Scheduler configuration

use serde::{Deserialize, Serialize};

/// Tunables applied to every delta handed to [`ActionScheduler::tick`](crate::ActionScheduler::tick)
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Multiplier applied to every tick's delta (0.5 = half speed)
    pub time_scale: f32,
    /// Upper bound on a single tick's delta in seconds, before scaling
    pub max_delta: Option<f32>,
}

impl SchedulerConfig {
    /// Convert a raw frame delta into the time actions are advanced by.
    ///
    /// Negative and NaN deltas advance by zero.
    pub fn effective_delta(&self, delta: f32) -> f32 {
        let delta = if delta > 0.0 { delta } else { 0.0 };
        let delta = match self.max_delta {
            Some(max) => delta.min(max.max(0.0)),
            None => delta,
        };
        delta * self.time_scale.max(0.0)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delta: None,
        }
    }
}
