//! Bubble tuning, optionally loaded from a JSON file.
//!
//! The file lives in the user's config directory. Every field is optional;
//! anything missing falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::{band::BandRange, content};

/// Longest lifetime a config may ask for, in seconds.
pub const MAX_LIFETIME_SECS: f32 = 600.0;

/// Inclusive millisecond range the spawn interval is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRange {
    pub min: u64,
    pub max: u64,
}

impl IntervalRange {
    pub const fn fixed(millis: u64) -> Self {
        Self { min: millis, max: millis }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BubbleConfig {
    pub spawn_interval_ms: IntervalRange,
    /// How long each bubble lives, in seconds.
    pub lifetime_secs: f32,
    /// Minimum horizontal distance between live bubbles, in percent.
    pub min_separation: f32,
    /// Draw budget for both content and position uniqueness.
    pub max_attempts: u32,
    pub left_band: BandRange,
    pub right_band: BandRange,
    pub contents: Vec<String>,
    /// Start spawning as soon as the scheduler is built.
    pub autostart: bool,
    /// Toggle spawning with the `B` key.
    pub toggle_key_enabled: bool,
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            spawn_interval_ms: IntervalRange { min: 1500, max: 4000 },
            lifetime_secs: 22.0,
            min_separation: 15.0,
            max_attempts: 20,
            left_band: BandRange::LEFT,
            right_band: BandRange::RIGHT,
            contents: content::default_pool(),
            autostart: true,
            toggle_key_enabled: true,
        }
    }
}

impl BubbleConfig {
    pub fn lifetime(&self) -> Duration {
        Duration::try_from_secs_f32(self.lifetime_secs).unwrap_or_else(|_| {
            warn!("Unrepresentable bubble lifetime {}, using default", self.lifetime_secs);
            Duration::from_secs(22)
        })
    }

    /// Get the file path for the config file.
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hashtag-bubbles").join("bubbles.json"))
    }

    /// Load config from disk, falling back to defaults on any problem.
    pub fn load() -> Self {
        let Some(path) = Self::file_path() else {
            warn!("Could not determine config directory for bubbles");
            return Self::default();
        };

        Self::load_from(&path)
    }

    /// Load config from `path`, falling back to defaults on any problem.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No bubble config found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json(&contents) {
                Some(config) => {
                    info!("Loaded bubble config from {:?}", path);
                    config
                }
                None => Self::default(),
            },
            Err(e) => {
                warn!("Failed to read bubble config: {}", e);
                Self::default()
            }
        }
    }

    /// Parse and sanitize a JSON config. `None` if it does not parse.
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str::<Self>(json) {
            Ok(config) => Some(config.sanitized()),
            Err(e) => {
                warn!("Failed to parse bubble config: {}", e);
                None
            }
        }
    }

    /// Repair values the scheduler cannot work with.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.spawn_interval_ms.min > self.spawn_interval_ms.max {
            warn!("Spawn interval min > max, swapping");
            std::mem::swap(&mut self.spawn_interval_ms.min, &mut self.spawn_interval_ms.max);
        }
        if self.spawn_interval_ms.max == 0 {
            warn!("Spawn interval of 0ms, using default");
            self.spawn_interval_ms = defaults.spawn_interval_ms;
        }
        if !self.lifetime_secs.is_finite()
            || self.lifetime_secs <= 0.0
            || self.lifetime_secs > MAX_LIFETIME_SECS
        {
            warn!("Invalid bubble lifetime {}, using default", self.lifetime_secs);
            self.lifetime_secs = defaults.lifetime_secs;
        }
        if !self.min_separation.is_finite() || self.min_separation < 0.0 {
            warn!("Invalid separation {}, using default", self.min_separation);
            self.min_separation = defaults.min_separation;
        }
        if self.max_attempts == 0 {
            warn!("max_attempts of 0, drawing once per bubble");
            self.max_attempts = 1;
        }
        self.left_band = self.left_band.normalized();
        self.right_band = self.right_band.normalized();
        if self.contents.is_empty() {
            warn!("Empty content pool, using default hashtags");
            self.contents = defaults.contents;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BubbleConfig::default();
        assert_eq!(config.spawn_interval_ms, IntervalRange { min: 1500, max: 4000 });
        assert_eq!(config.lifetime(), Duration::from_secs(22));
        assert_eq!(config.max_attempts, 20);
        assert_eq!(config.contents.len(), content::BUBBLE_TEXTS.len());
        assert!(config.autostart);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = BubbleConfig::from_json(r#"{ "lifetime_secs": 10.0 }"#).unwrap();
        assert_eq!(config.lifetime_secs, 10.0);
        assert_eq!(config.min_separation, 15.0);
        assert_eq!(config.left_band, BandRange::LEFT);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        assert!(BubbleConfig::from_json("not json").is_none());
    }

    #[test]
    fn test_sanitized_repairs_bad_values() {
        let config = BubbleConfig {
            spawn_interval_ms: IntervalRange { min: 900, max: 300 },
            lifetime_secs: -1.0,
            min_separation: f32::NAN,
            max_attempts: 0,
            left_band: BandRange::new(30.0, 5.0),
            contents: Vec::new(),
            ..Default::default()
        }
        .sanitized();

        assert_eq!(config.spawn_interval_ms, IntervalRange { min: 300, max: 900 });
        assert_eq!(config.lifetime_secs, 22.0);
        assert_eq!(config.min_separation, 15.0);
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.left_band, BandRange::LEFT);
        assert!(!config.contents.is_empty());
    }

    #[test]
    fn test_sanitized_rejects_huge_lifetime() {
        let config = BubbleConfig::from_json(r#"{ "lifetime_secs": 1e30 }"#).unwrap();
        assert_eq!(config.lifetime_secs, 22.0);
        assert_eq!(config.lifetime(), Duration::from_secs(22));
    }

    #[test]
    fn test_lifetime_falls_back_when_unrepresentable() {
        let config = BubbleConfig {
            lifetime_secs: 1e30,
            ..Default::default()
        };
        assert_eq!(config.lifetime(), Duration::from_secs(22));
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("hashtag-bubbles-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let path = scratch_path("missing.json");
        let _ = fs::remove_file(&path);
        assert_eq!(BubbleConfig::load_from(&path), BubbleConfig::default());
    }

    #[test]
    fn test_load_from_reads_file() {
        let path = scratch_path("valid.json");
        fs::write(&path, r#"{ "max_attempts": 5, "autostart": false }"#).unwrap();
        let config = BubbleConfig::load_from(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(config.max_attempts, 5);
        assert!(!config.autostart);
        assert_eq!(config.lifetime_secs, 22.0);
    }

    #[test]
    fn test_load_from_unparsable_file_uses_defaults() {
        let path = scratch_path("broken.json");
        fs::write(&path, "{ lifetime_secs: ").unwrap();
        let config = BubbleConfig::load_from(&path);
        fs::remove_file(&path).unwrap();

        assert_eq!(config, BubbleConfig::default());
    }

    #[test]
    fn test_load_from_unreadable_path_uses_defaults() {
        // A directory exists but cannot be read as a string.
        let path = scratch_path("dir.json");
        fs::create_dir_all(&path).unwrap();
        let config = BubbleConfig::load_from(&path);
        fs::remove_dir(&path).unwrap();

        assert_eq!(config, BubbleConfig::default());
    }
}
