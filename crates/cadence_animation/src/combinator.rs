//! Combinators: sequence, parallel, and repeat
//!
//! Combinators own their children by value. Child continuations are not
//! started; only top-level actions hand their queue to the scheduler.

use cadence_core::Stage;

use crate::action::Action;
use crate::error::Result;

/// Runs children one after another
#[derive(Debug)]
pub struct Sequence {
    children: Vec<Action>,
    index: usize,
}

impl Sequence {
    pub fn new(children: impl IntoIterator<Item = Action>) -> Self {
        Self {
            children: children.into_iter().collect(),
            index: 0,
        }
    }

    pub fn children(&self) -> &[Action] {
        &self.children
    }

    /// Index of the active child (equals `len` once finished)
    pub fn index(&self) -> usize {
        self.index
    }

    /// The whole `dt` goes to the active child. When it completes, the next
    /// child is entered on the following tick, never in the same one.
    pub(crate) fn advance(&mut self, dt: f32, stage: &mut dyn Stage) -> Result<bool> {
        let Some(child) = self.children.get_mut(self.index) else {
            return Ok(true);
        };
        if child.advance(dt, stage)? {
            self.index += 1;
        }
        Ok(self.index >= self.children.len())
    }

    pub(crate) fn reset(&mut self) {
        self.index = 0;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// Runs children concurrently
#[derive(Debug)]
pub struct Parallel {
    children: Vec<Action>,
}

impl Parallel {
    pub fn new(children: impl IntoIterator<Item = Action>) -> Self {
        Self {
            children: children.into_iter().collect(),
        }
    }

    pub fn children(&self) -> &[Action] {
        &self.children
    }

    /// Every unfinished child receives the full `dt`; finished children stay
    /// in place, flagged by their `Done` state.
    pub(crate) fn advance(&mut self, dt: f32, stage: &mut dyn Stage) -> Result<bool> {
        let mut all_done = true;
        for child in &mut self.children {
            if child.is_done() {
                continue;
            }
            if !child.advance(dt, stage)? {
                all_done = false;
            }
        }
        Ok(all_done)
    }

    pub(crate) fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// Re-runs one child a fixed number of times, or forever
#[derive(Debug)]
pub struct Repeat {
    child: Box<Action>,
    /// `None` repeats forever
    times: Option<u32>,
    remaining: Option<u32>,
}

impl Repeat {
    pub fn new(child: Action, times: Option<u32>) -> Self {
        Self {
            child: Box::new(child),
            times,
            remaining: times,
        }
    }

    pub fn child(&self) -> &Action {
        &self.child
    }

    /// Cycles left, `None` when unbounded
    pub fn remaining(&self) -> Option<u32> {
        self.remaining
    }

    pub fn is_forever(&self) -> bool {
        self.times.is_none()
    }

    pub(crate) fn advance(&mut self, dt: f32, stage: &mut dyn Stage) -> Result<bool> {
        if self.remaining == Some(0) {
            return Ok(true);
        }
        if !self.child.advance(dt, stage)? {
            return Ok(false);
        }

        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                return Ok(true);
            }
        }
        self.child.reset();
        Ok(false)
    }

    pub(crate) fn reset(&mut self) {
        self.remaining = self.times;
        self.child.reset();
    }
}
