//! Leaf actions: delays, callbacks, and property tweens

use std::fmt;

use cadence_core::{Stage, StageError, TargetId};
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error::Result;

/// Negative or NaN durations complete on the first advance
fn sanitize_duration(seconds: f32) -> f32 {
    if seconds > 0.0 {
        seconds
    } else {
        0.0
    }
}

/// Waits for a fixed duration
#[derive(Clone, Debug)]
pub struct Delay {
    duration: f32,
    elapsed: f32,
}

impl Delay {
    pub fn new(seconds: f32) -> Self {
        Self {
            duration: sanitize_duration(seconds),
            elapsed: 0.0,
        }
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub(crate) fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }

    pub(crate) fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Callback invoked by [`RunFunc`]
pub type Callback = Box<dyn FnMut(&mut dyn Stage) + Send>;

/// Invokes a callback once, then completes
pub struct RunFunc {
    callback: Callback,
}

impl RunFunc {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(&mut dyn Stage) + Send + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// The owning [`Action`](crate::Action) guarantees one call per run
    pub(crate) fn advance(&mut self, stage: &mut dyn Stage) -> bool {
        (self.callback)(stage);
        true
    }
}

impl fmt::Debug for RunFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunFunc").finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct PropertyTween {
    name: String,
    start: f32,
    end: f32,
}

/// Interpolates named properties of a target towards final values
#[derive(Clone, Debug)]
pub struct TargetAction {
    target: TargetId,
    tweens: SmallVec<[PropertyTween; 4]>,
    duration: f32,
    elapsed: f32,
    easing: Easing,
    /// Start values are read on the first advance, not at construction
    captured: bool,
}

impl TargetAction {
    /// Build a tween, failing if `target` or any named property is absent
    pub fn new<I, K>(
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
        let mut tweens: SmallVec<[PropertyTween; 4]> = SmallVec::new();
        for (name, end) in properties {
            let name = name.into();
            stage.require_property(target, &name)?;
            match tweens.iter_mut().find(|t| t.name == name) {
                Some(existing) => existing.end = end,
                None => tweens.push(PropertyTween {
                    name,
                    start: 0.0,
                    end,
                }),
            }
        }
        if tweens.is_empty() && !stage.contains(target) {
            return Err(StageError::UnknownTarget(target).into());
        }

        Ok(Self {
            target,
            tweens,
            duration: sanitize_duration(seconds),
            elapsed: 0.0,
            easing,
            captured: false,
        })
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    /// Names and final values of the animated properties
    pub fn properties(&self) -> impl Iterator<Item = (&str, f32)> {
        self.tweens.iter().map(|t| (t.name.as_str(), t.end))
    }

    /// Raw progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return if self.captured { 1.0 } else { 0.0 };
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    pub(crate) fn advance(&mut self, dt: f32, stage: &mut dyn Stage) -> Result<bool> {
        if !self.captured {
            for tween in self.tweens.iter_mut() {
                tween.start = stage.require_property(self.target, &tween.name)?;
            }
            self.captured = true;
        }

        self.elapsed += dt;

        if self.elapsed >= self.duration {
            // Terminal frame: write exact final values regardless of easing
            for tween in &self.tweens {
                stage.set_property(self.target, &tween.name, tween.end)?;
            }
            return Ok(true);
        }

        let eased = self.easing.apply(self.progress());
        for tween in &self.tweens {
            let value = tween.start + (tween.end - tween.start) * eased;
            stage.set_property(self.target, &tween.name, value)?;
        }
        Ok(false)
    }

    /// Rewind time; captured start values are kept so a repeated tween replays
    /// the same motion
    pub(crate) fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
