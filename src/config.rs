use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::app_dirs::AppDirs;
use crate::scheduler::SpawnPolicy;
use crate::session::SessionConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("session duration must be greater than zero")]
    ZeroDuration,
    #[error("concurrency cap must be at least 1")]
    ZeroCap,
    #[error("good probability {0} is outside 0..=1")]
    Probability(f64),
    #[error("spawn delay range {min}..{max} is inverted")]
    DelayRange { min: u64, max: u64 },
    #[error("spawn delay must allow at least 1 ms between passes")]
    ZeroDelay,
    #[error("swipe threshold {0} must be positive")]
    Threshold(f64),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub duration_ms: u64,
    pub concurrency_cap: usize,
    pub good_probability: f64,
    pub spawn_delay_min_ms: u64,
    pub spawn_delay_max_ms: u64,
    pub transit_ms: u64,
    pub swipe_threshold: f64,
    pub exit_animation_ms: u64,
    pub miss_flash_ms: u64,
    pub results_delay_ms: u64,
    pub sound: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            duration_ms: session.duration_ms,
            concurrency_cap: session.spawn.concurrency_cap,
            good_probability: session.spawn.good_probability,
            spawn_delay_min_ms: session.spawn.min_delay_ms,
            spawn_delay_max_ms: session.spawn.max_delay_ms,
            transit_ms: session.transit_ms,
            swipe_threshold: session.swipe_threshold,
            exit_animation_ms: session.exit_animation_ms,
            miss_flash_ms: session.miss_flash_ms,
            results_delay_ms: 600,
            sound: true,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.concurrency_cap == 0 {
            return Err(ConfigError::ZeroCap);
        }
        if !(0.0..=1.0).contains(&self.good_probability) {
            return Err(ConfigError::Probability(self.good_probability));
        }
        if self.spawn_delay_min_ms > self.spawn_delay_max_ms {
            return Err(ConfigError::DelayRange {
                min: self.spawn_delay_min_ms,
                max: self.spawn_delay_max_ms,
            });
        }
        if self.spawn_delay_max_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if !(self.swipe_threshold > 0.0) {
            return Err(ConfigError::Threshold(self.swipe_threshold));
        }
        Ok(())
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            duration_ms: self.duration_ms,
            transit_ms: self.transit_ms,
            exit_animation_ms: self.exit_animation_ms,
            miss_flash_ms: self.miss_flash_ms,
            swipe_threshold: self.swipe_threshold,
            spawn: SpawnPolicy {
                concurrency_cap: self.concurrency_cap,
                good_probability: self.good_probability,
                min_delay_ms: self.spawn_delay_min_ms,
                max_delay_ms: self.spawn_delay_max_ms,
            },
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> GameConfig;
    fn save(&self, cfg: &GameConfig) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("sortline_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    /// Missing or unreadable files fall back to defaults
    fn load(&self) -> GameConfig {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<GameConfig>(&bytes) {
                Ok(cfg) => cfg,
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), error = %err, "ignoring malformed config");
                    GameConfig::default()
                }
            },
            Err(_) => GameConfig::default(),
        }
    }

    fn save(&self, cfg: &GameConfig) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
