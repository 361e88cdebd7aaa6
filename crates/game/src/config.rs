//! Game configuration (window, aircraft, camera, scenery, audio). Loaded from config.ron at startup.

use physics::AircraftParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which flight model to fly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AircraftPreset {
    #[default]
    Arcade,
    Cessna172,
}

impl AircraftPreset {
    pub fn params(self) -> AircraftParams {
        match self {
            AircraftPreset::Arcade => AircraftParams::arcade(),
            AircraftPreset::Cessna172 => AircraftParams::cessna172(),
        }
    }
}

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    #[serde(default = "default_true")]
    pub vsync: bool,
    /// Start in borderless fullscreen.
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default)]
    pub aircraft: AircraftPreset,
    /// Chase camera distance behind the aircraft.
    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,
    /// Chase camera height above the aircraft.
    #[serde(default = "default_camera_height")]
    pub camera_height: f32,
    /// Fraction of the gap left after 1/60 s (0 = rigid, closer to 1 = lazier).
    #[serde(default = "default_camera_lag")]
    pub camera_lag: f32,
    /// Seed for terrain colouring and scenery placement.
    #[serde(default = "default_seed")]
    pub scenery_seed: u64,
    #[serde(default = "default_tree_count")]
    pub tree_count: usize,
    #[serde(default = "default_rock_count")]
    pub rock_count: usize,
    #[serde(default = "default_master_volume")]
    pub master_volume: f64,
    /// Directory searched for `engine`, `wind` and `crash` sound files.
    #[serde(default = "default_sound_dir")]
    pub sound_dir: PathBuf,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_true() -> bool {
    true
}
fn default_camera_distance() -> f32 {
    50.0
}
fn default_camera_height() -> f32 {
    15.0
}
fn default_camera_lag() -> f32 {
    0.1
}
fn default_seed() -> u64 {
    42
}
fn default_tree_count() -> usize {
    1000
}
fn default_rock_count() -> usize {
    200
}
fn default_master_volume() -> f64 {
    1.0
}
fn default_sound_dir() -> PathBuf {
    PathBuf::from("assets/sounds")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            vsync: default_true(),
            fullscreen: false,
            aircraft: AircraftPreset::default(),
            camera_distance: default_camera_distance(),
            camera_height: default_camera_height(),
            camera_lag: default_camera_lag(),
            scenery_seed: default_seed(),
            tree_count: default_tree_count(),
            rock_count: default_rock_count(),
            master_volume: default_master_volume(),
            sound_dir: default_sound_dir(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                log::info!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    /// Parse and sanitise a RON document.
    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        let mut config: Self = ron::from_str(data)?;
        config.sanitize();
        Ok(config)
    }

    fn sanitize(&mut self) {
        self.window_width = self.window_width.max(1);
        self.window_height = self.window_height.max(1);
        self.camera_lag = self.camera_lag.clamp(0.0, 0.99);
        self.camera_distance = self.camera_distance.max(1.0);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_struct_takes_defaults() {
        let config = GameConfig::parse("()").unwrap();
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = GameConfig::parse("(aircraft: Cessna172, tree_count: 10, vsync: false)").unwrap();
        assert_eq!(config.aircraft, AircraftPreset::Cessna172);
        assert_eq!(config.tree_count, 10);
        assert!(!config.vsync);
        assert_eq!(config.rock_count, 200);
        assert_eq!(config.aircraft.params().max_speed, 140.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = GameConfig::parse("(master_volume: 3.0, camera_lag: 1.5)").unwrap();
        assert_eq!(config.master_volume, 1.0);
        assert!(config.camera_lag < 1.0);
    }

    #[test]
    fn garbage_is_an_error_and_load_falls_back() {
        assert!(GameConfig::parse("(window_width: \"wide\")").is_err());
        let missing = GameConfig::load_from(Path::new("/nonexistent/config.ron"));
        assert_eq!(missing, GameConfig::default());
    }

    #[test]
    fn round_trips_through_ron() {
        let text = ron::ser::to_string_pretty(&GameConfig::default(), ron::ser::PrettyConfig::default()).unwrap();
        assert_eq!(GameConfig::parse(&text).unwrap(), GameConfig::default());
    }
}
