use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::backend::BackendKind;
use crate::settings::SupportedRange;

/// Static configuration supplied at player construction.
///
/// Covers the external tool selection, optional explicit binary paths, the
/// device-level initial volume/speed, and the supported setting ranges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Which external player to drive.
    #[serde(default)]
    pub backend: BackendKind,

    /// Full path to the player binary; `None` searches the command path.
    #[serde(default)]
    pub player_path: Option<PathBuf>,

    /// Full path to the duration-probe binary; `None` searches the command path.
    #[serde(default)]
    pub probe_path: Option<PathBuf>,

    /// Device-level volume applied at construction; `None` keeps the default (100).
    #[serde(default)]
    pub initial_volume: Option<i32>,

    /// Device-level speed applied at construction; `None` keeps the default (1.0).
    #[serde(default)]
    pub initial_speed: Option<f64>,

    /// Volume values the backend accepts.
    #[serde(default = "default_volume_range")]
    pub volume_range: SupportedRange<i32>,

    /// Speed values the backend accepts.
    #[serde(default = "default_speed_range")]
    pub speed_range: SupportedRange<f64>,
}

fn default_volume_range() -> SupportedRange<i32> {
    SupportedRange::new(0, 100)
}

fn default_speed_range() -> SupportedRange<f64> {
    SupportedRange::new(0.5, 100.0)
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Ffplay,
            player_path: None,
            probe_path: None,
            initial_volume: None,
            initial_speed: None,
            volume_range: default_volume_range(),
            speed_range: default_speed_range(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration from the platform-specific config directory.
    /// Creates a default config file if none exists yet.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: PlayerConfig = serde_json::from_str(&content)?;
            tracing::info!("Loaded config from: {}", config_path.display());
            Ok(config)
        } else {
            let config = PlayerConfig::default();
            config.save()?;
            tracing::info!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_path = Self::config_path()?;

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, json)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let base = dirs::config_dir().ok_or("Could not determine config directory")?;
        Ok(base.join("playhound").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ranges() {
        let config = PlayerConfig::default();

        assert_eq!(config.volume_range, SupportedRange::new(0, 100));
        assert_eq!(config.speed_range, SupportedRange::new(0.5, 100.0));
        assert_eq!(config.backend, BackendKind::Ffplay);
        assert!(config.player_path.is_none());
        assert!(config.initial_volume.is_none());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{ "initial_volume": 60 }"#).expect("parse");

        assert_eq!(config.initial_volume, Some(60));
        assert_eq!(config.volume_range, SupportedRange::new(0, 100));
        assert_eq!(config.backend, BackendKind::Ffplay);
    }

    #[test]
    fn test_explicit_paths_deserialize() {
        let config: PlayerConfig = serde_json::from_str(
            r#"{ "backend": "ffplay", "player_path": "/usr/bin/ffplay" }"#,
        )
        .expect("parse");

        assert_eq!(config.player_path, Some(PathBuf::from("/usr/bin/ffplay")));
        assert!(config.probe_path.is_none());
    }
}
