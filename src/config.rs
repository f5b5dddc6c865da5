//! Session tunables. Loaded from `typing_rush.ron` at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::entities::Millis;
use crate::error::GameError;

/// Tunables for one game session. Every field falls back to its default when
/// absent from the file, so a partial config is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Completed normal words between frenzy triggers.
    #[serde(default = "default_frenzy_trigger_interval")]
    pub frenzy_trigger_interval: u32,
    /// Completed normal words between boss triggers.
    #[serde(default = "default_boss_trigger_interval")]
    pub boss_trigger_interval: u32,
    #[serde(default = "default_frenzy_duration_ms")]
    pub frenzy_duration_ms: Millis,
    /// 0 skips the frenzy countdown entirely.
    #[serde(default)]
    pub frenzy_countdown_ms: Millis,
    #[serde(default = "default_boss_duration_ms")]
    pub boss_duration_ms: Millis,
    #[serde(default = "default_boss_countdown_ms")]
    pub boss_countdown_ms: Millis,
    #[serde(default = "default_base_scroll_speed")]
    pub base_scroll_speed: f64,
    #[serde(default = "default_max_scroll_speed")]
    pub max_scroll_speed: f64,
    /// Target frame time of the terminal loop.
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
}

fn default_frenzy_trigger_interval() -> u32 {
    5
}
fn default_boss_trigger_interval() -> u32 {
    12
}
fn default_frenzy_duration_ms() -> Millis {
    30_000.0
}
fn default_boss_duration_ms() -> Millis {
    45_000.0
}
fn default_boss_countdown_ms() -> Millis {
    3_000.0
}
fn default_base_scroll_speed() -> f64 {
    1.5
}
fn default_max_scroll_speed() -> f64 {
    3.5
}
fn default_frame_ms() -> u64 {
    33
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frenzy_trigger_interval: default_frenzy_trigger_interval(),
            boss_trigger_interval: default_boss_trigger_interval(),
            frenzy_duration_ms: default_frenzy_duration_ms(),
            frenzy_countdown_ms: 0.0,
            boss_duration_ms: default_boss_duration_ms(),
            boss_countdown_ms: default_boss_countdown_ms(),
            base_scroll_speed: default_base_scroll_speed(),
            max_scroll_speed: default_max_scroll_speed(),
            frame_ms: default_frame_ms(),
        }
    }
}

impl GameConfig {
    /// Load config from `typing_rush.ron`. A missing file yields the defaults;
    /// an unreadable or invalid one is logged and also yields the defaults.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }
        match Self::try_load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn try_load_from(path: &Path) -> Result<Self, GameError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_ron(&data)
    }

    pub fn from_ron(data: &str) -> Result<Self, GameError> {
        Ok(ron::from_str(data)?)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("typing_rush.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = GameConfig::from_ron("(boss_trigger_interval: 20)").unwrap();
        assert_eq!(config.boss_trigger_interval, 20);
        assert_eq!(config.frenzy_trigger_interval, 5);
        assert_eq!(config.boss_duration_ms, 45_000.0);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let result = GameConfig::from_ron("(boss_trigger_interval: \"lots\")");
        assert!(matches!(result, Err(GameError::Config(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = GameConfig::try_load_from(Path::new("no_such_config_4821.ron"));
        assert!(matches!(result, Err(GameError::Io(_))));
    }
}
