//! Scene playback
//!
//! Builds a [`Scene`] and its actions from a [`SceneFile`], then drives the
//! scheduler at a fixed frame rate the way a render loop would.

use anyhow::{Context, Result};
use cadence_animation::{Action, ActionScheduler, Easing};
use cadence_core::{Scene, Stage, TargetId};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::scene_file::{ActionSpec, SceneFile};

/// Property values of every target at one frame
#[derive(Debug, Serialize, PartialEq)]
pub struct Frame {
    pub frame: u64,
    pub time: f32,
    pub targets: BTreeMap<String, TargetSnapshot>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TargetSnapshot {
    pub parent: Option<String>,
    pub properties: BTreeMap<String, f32>,
}

/// Outcome of a playback run
#[derive(Debug, Serialize, PartialEq)]
pub struct Summary {
    pub frames: u64,
    pub elapsed: f32,
    pub completed: usize,
    pub faults: usize,
    /// Every action finished before the duration ran out
    pub idle: bool,
}

pub struct Player {
    scene: Scene,
    scheduler: ActionScheduler,
    targets: FxHashMap<String, TargetId>,
    fps: u32,
    duration: f32,
}

impl Player {
    /// Build the scene graph and start every top-level action
    pub fn build(file: &SceneFile) -> Result<Self> {
        let mut scene = Scene::new();
        let mut targets = FxHashMap::default();

        for spec in &file.targets {
            let id = scene.spawn_named(spec.name.as_str());
            for (name, value) in &spec.properties {
                scene.insert_property(id, name.as_str(), *value)?;
            }
            if targets.insert(spec.name.clone(), id).is_some() {
                anyhow::bail!("Duplicate target name `{}`", spec.name);
            }
        }

        // Parents may be declared after their children
        for spec in &file.targets {
            if let Some(parent) = &spec.parent {
                let parent_id = *targets
                    .get(parent)
                    .with_context(|| format!("Unknown parent `{}` for `{}`", parent, spec.name))?;
                scene
                    .add_child(parent_id, targets[&spec.name])
                    .with_context(|| format!("Cannot parent `{}` under `{}`", spec.name, parent))?;
            }
        }

        let mut player = Self {
            scene,
            scheduler: ActionScheduler::with_config(file.playback.scheduler.clone()),
            targets,
            fps: file.playback.fps.max(1),
            duration: file.playback.duration.max(0.0),
        };

        for (index, play) in file.play.iter().enumerate() {
            let mut action = player
                .build_action(&play.action)
                .with_context(|| format!("Invalid action in play[{index}]"))?;
            for next in &play.then {
                action.queue(
                    player
                        .build_action(next)
                        .with_context(|| format!("Invalid continuation in play[{index}]"))?,
                );
            }
            player.scheduler.start(action);
        }

        tracing::info!(
            targets = player.targets.len(),
            actions = player.scheduler.len(),
            "scene built"
        );
        Ok(player)
    }

    pub fn scheduler(&self) -> &ActionScheduler {
        &self.scheduler
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    fn resolve(&self, name: &str) -> Result<TargetId> {
        self.targets
            .get(name)
            .copied()
            .with_context(|| format!("Unknown target `{name}`"))
    }

    fn build_action(&self, spec: &ActionSpec) -> Result<Action> {
        let action = match spec {
            ActionSpec::To {
                target,
                properties,
                seconds,
                easing,
            } => {
                let easing = match easing {
                    Some(name) => name.parse::<Easing>()?,
                    None => Easing::Linear,
                };
                let id = self.resolve(target)?;
                let properties = properties.iter().map(|(k, v)| (k.as_str(), *v));
                Action::to(&self.scene, id, properties, *seconds, easing)
                    .with_context(|| format!("Cannot tween `{target}`"))?
            }
            ActionSpec::Delay { seconds } => Action::delay(*seconds),
            ActionSpec::Remove { target } => Action::remove(self.resolve(target)?),
            ActionSpec::Log { message } => {
                let message = message.clone();
                Action::run_func(move || tracing::info!(%message, "scene log"))
            }
            ActionSpec::Sequence { actions } => Action::sequence(self.build_all(actions)?),
            ActionSpec::Parallel { actions } => Action::parallel(self.build_all(actions)?),
            ActionSpec::Repeat { action, times } => {
                let child = self.build_action(action)?;
                match times {
                    Some(times) => Action::repeat(child, *times),
                    None => Action::repeat_forever(child),
                }
            }
        };
        Ok(action)
    }

    fn build_all(&self, specs: &[ActionSpec]) -> Result<Vec<Action>> {
        specs.iter().map(|spec| self.build_action(spec)).collect()
    }

    /// Snapshot every named target
    pub fn snapshot(&self, frame: u64, time: f32) -> Frame {
        let names: FxHashMap<TargetId, &str> = self
            .targets
            .iter()
            .map(|(name, id)| (*id, name.as_str()))
            .collect();

        let targets = self
            .targets
            .iter()
            .filter_map(|(name, id)| {
                let node = self.scene.get(*id)?;
                let parent = self
                    .scene
                    .parent(*id)
                    .and_then(|p| names.get(&p))
                    .map(|p| p.to_string());
                let properties = node.properties().map(|(k, v)| (k.to_string(), v)).collect();
                Some((name.clone(), TargetSnapshot { parent, properties }))
            })
            .collect();

        Frame {
            frame,
            time,
            targets,
        }
    }

    /// Tick until every action finishes or the duration runs out.
    ///
    /// `on_frame` sees every `every`-th frame (never when `every` is zero) and
    /// always the last one.
    pub fn run(
        &mut self,
        every: u32,
        mut on_frame: impl FnMut(&Frame) -> Result<()>,
    ) -> Result<Summary> {
        let dt = 1.0 / self.fps as f32;
        let max_frames = (self.duration * self.fps as f32).ceil() as u64;

        let mut summary = Summary {
            frames: 0,
            elapsed: 0.0,
            completed: 0,
            faults: 0,
            idle: !self.scheduler.has_active_actions(),
        };

        for frame in 1..=max_frames {
            if summary.idle {
                break;
            }
            let report = self.scheduler.tick(dt, &mut self.scene);
            summary.frames = frame;
            summary.elapsed = frame as f32 * dt;
            summary.completed += report.completed.len();
            summary.faults += report.faults.len();
            summary.idle = !self.scheduler.has_active_actions();

            let last = summary.idle || frame == max_frames;
            if last || (every > 0 && frame % every as u64 == 0) {
                on_frame(&self.snapshot(frame, summary.elapsed))?;
            }
        }

        tracing::info!(
            frames = summary.frames,
            completed = summary.completed,
            faults = summary.faults,
            idle = summary.idle,
            "playback finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn player(source: &str) -> Player {
        Player::build(&SceneFile::parse(source).unwrap()).unwrap()
    }

    #[test]
    fn test_plays_tween_to_completion() {
        let mut player = player(
            r#"
            [playback]
            fps = 10
            duration = 5.0

            [[targets]]
            name = "dot"
            properties = { x = 0.0 }

            [[play]]
            action = { type = "to", target = "dot", properties = { x = 10.0 }, seconds = 1.0 }
            "#,
        );

        let mut frames = Vec::new();
        let summary = player
            .run(0, |frame| {
                frames.push(frame.frame);
                Ok(())
            })
            .unwrap();

        assert!(summary.idle);
        assert_eq!(summary.completed, 1);
        assert_eq!(frames, vec![summary.frames]);
        let dot = player.scene().find("dot").unwrap();
        assert_eq!(player.scene().property(dot, "x"), Some(10.0));
    }

    #[test]
    fn test_unknown_property_fails_build() {
        let file = SceneFile::parse(
            r#"
            [[targets]]
            name = "dot"
            properties = { x = 0.0 }

            [[play]]
            action = { type = "to", target = "dot", properties = { y = 1.0 }, seconds = 1.0 }
            "#,
        )
        .unwrap();

        let err = Player::build(&file).err().unwrap();
        assert!(format!("{err:#}").contains("has no property `y`"));
    }

    #[test]
    fn test_unknown_easing_fails_build() {
        let file = SceneFile::parse(
            r#"
            [[targets]]
            name = "dot"
            properties = { x = 0.0 }

            [[play]]
            action = { type = "to", target = "dot", properties = { x = 1.0 }, seconds = 1.0, easing = "wobble" }
            "#,
        )
        .unwrap();

        assert!(Player::build(&file).is_err());
    }

    #[test]
    fn test_duplicate_target_rejected() {
        let file =
            SceneFile::parse("[[targets]]\nname = \"a\"\n[[targets]]\nname = \"a\"\n").unwrap();
        assert!(Player::build(&file).is_err());
    }

    #[test]
    fn test_forever_stops_at_duration() {
        let mut player = player(
            r#"
            [playback]
            fps = 4
            duration = 2.0

            [[play]]
            action = { type = "repeat", action = { type = "delay", seconds = 0.5 } }
            "#,
        );

        let summary = player.run(1, |_| Ok(())).unwrap();
        assert_eq!(summary.frames, 8);
        assert!(!summary.idle);
        assert!(player.scheduler().has_active_actions());
    }

    #[test]
    fn test_bundled_scene_detaches_sprite() {
        let mut player = player(include_str!("../scenes/fade_out.toml"));
        let mut last = None;
        let summary = player
            .run(0, |frame| {
                last = Some(frame.targets["sprite"].parent.clone());
                Ok(())
            })
            .unwrap();

        assert!(summary.idle);
        assert_eq!(summary.faults, 0);
        assert_eq!(last, Some(None));

        let sprite = player.scene().find("sprite").unwrap();
        assert_eq!(player.scene().property(sprite, "alpha"), Some(0.0));
        assert_eq!(player.scene().property(sprite, "x"), Some(120.0));
    }
}
