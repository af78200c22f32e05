//! Scene file handling (cadence.toml)

use anyhow::{Context, Result};
use cadence_animation::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Top-level scene file
#[derive(Debug, Deserialize, Serialize)]
pub struct SceneFile {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub targets: Vec<TargetSpec>,
    /// Top-level actions started before the first frame
    #[serde(default)]
    pub play: Vec<PlaySpec>,
}

/// Playback settings
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaybackConfig {
    /// Fixed frame rate used to derive each tick's delta
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Stop after this many seconds even if actions are still running
    #[serde(default = "default_duration")]
    pub duration: f32,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

fn default_fps() -> u32 {
    60
}

fn default_duration() -> f32 {
    10.0
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            duration: default_duration(),
            scheduler: SchedulerConfig::default(),
        }
    }
}

/// A named scene node
#[derive(Debug, Deserialize, Serialize)]
pub struct TargetSpec {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, f32>,
}

/// A top-level action and the continuations started when it completes
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaySpec {
    pub action: ActionSpec,
    #[serde(default)]
    pub then: Vec<ActionSpec>,
}

/// Declarative action tree
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionSpec {
    To {
        target: String,
        properties: BTreeMap<String, f32>,
        seconds: f32,
        #[serde(default)]
        easing: Option<String>,
    },
    Delay {
        seconds: f32,
    },
    Remove {
        target: String,
    },
    Log {
        message: String,
    },
    Sequence {
        actions: Vec<ActionSpec>,
    },
    Parallel {
        actions: Vec<ActionSpec>,
    },
    Repeat {
        action: Box<ActionSpec>,
        /// Omitted repeats forever
        #[serde(default)]
        times: Option<u32>,
    },
}

impl SceneFile {
    /// Load a scene from a file, or from `cadence.toml` inside a directory
    pub fn load(path: &Path) -> Result<Self> {
        let scene_path = if path.is_dir() {
            path.join("cadence.toml")
        } else {
            path.to_path_buf()
        };

        if !scene_path.exists() {
            anyhow::bail!("No scene file found at {}", scene_path.display());
        }

        let content = fs::read_to_string(&scene_path)
            .with_context(|| format!("Failed to read {}", scene_path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse {}", scene_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: SceneFile = toml::from_str(content)?;
        if file.playback.fps == 0 {
            anyhow::bail!("playback.fps must be greater than zero");
        }
        Ok(file)
    }
}
