//! Game settings
//!
//! Read from an optional JSON file next to the game. Every field has a
//! default, so a partial file only overrides what it mentions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, FRAME_RATE};

/// Default settings file name, looked up in the working directory
pub const SETTINGS_FILE: &str = "ball-and-paddle.json";

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Frames per second of the game loop
    pub frame_rate: u32,
    /// High score file
    pub scores_path: PathBuf,
    /// Fixed RNG seed; a fresh one is picked each round when unset
    pub seed: Option<u64>,
    pub arena_width: f32,
    pub arena_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_rate: FRAME_RATE,
            scores_path: PathBuf::from("scores.txt"),
            seed: None,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read {path:?}: {e}, using default settings");
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {path:?}");
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring malformed {path:?}: {e}");
                Self::default()
            }
        }
    }

    /// Replace nonsense values with defaults
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.frame_rate == 0 {
            self.frame_rate = defaults.frame_rate;
        }
        if !(self.arena_width > 0.0 && self.arena_height > 0.0) {
            self.arena_width = defaults.arena_width;
            self.arena_height = defaults.arena_height;
        }
        self
    }
}
