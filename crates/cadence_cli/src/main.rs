//! Cadence CLI
//!
//! Plays scripted action scenes headlessly and prints property snapshots.

mod player;
mod scene_file;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::player::{Frame, Player};
use crate::scene_file::SceneFile;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(author, version, about = "Play and validate scripted action scenes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a scene until its actions finish or its duration runs out
    Play {
        /// Scene file, or a directory containing cadence.toml
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Print a snapshot every N frames (the final frame is always printed)
        #[arg(long, default_value_t = 0)]
        every: u32,

        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Validate a scene without playing it
    Check {
        /// Scene file, or a directory containing cadence.toml
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Play { path, every, json } => cmd_play(&path, every, json),
        Commands::Check { path } => cmd_check(&path),
    }
}

fn cmd_play(path: &Path, every: u32, json: bool) -> Result<()> {
    let file = SceneFile::load(path)?;
    let mut player = Player::build(&file)?;

    let summary = player.run(every, |frame| {
        if json {
            println!("{}", serde_json::to_string(frame)?);
        } else {
            print_frame(frame);
        }
        Ok(())
    })?;

    if json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "{} frames, {:.3}s, {} completed, {} faults{}",
            summary.frames,
            summary.elapsed,
            summary.completed,
            summary.faults,
            if summary.idle { "" } else { " (still running)" }
        );
    }
    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let file = SceneFile::load(path)?;
    let player = Player::build(&file)?;
    println!(
        "ok: {} targets, {} top-level actions",
        player.scene().len(),
        player.scheduler().len()
    );
    Ok(())
}

fn print_frame(frame: &Frame) {
    println!("frame {} t={:.3}s", frame.frame, frame.time);
    for (name, target) in &frame.targets {
        let properties: Vec<String> = target
            .properties
            .iter()
            .map(|(k, v)| format!("{k}={v:.3}"))
            .collect();
        match &target.parent {
            Some(parent) => println!("  {name} (in {parent}): {}", properties.join(" ")),
            None => println!("  {name}: {}", properties.join(" ")),
        }
    }
}
