use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::catalog::Difficulty;
use crate::error::StoreError;
use crate::score_store::DEFAULT_RETENTION;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_limit_secs: u32,
    pub leaderboard_depth: usize,
    pub score_retention: usize,
    pub difficulty: Difficulty,
    pub username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_limit_secs: 30,
            leaderboard_depth: 5,
            score_retention: DEFAULT_RETENTION,
            difficulty: Difficulty::Easy,
            username: None,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> Result<(), StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("codetype_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => tracing::warn!("using default config, {}: {}", self.path.display(), e),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Trimmed name, or "Anonymous" when nothing is left
pub fn normalize_username(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "Anonymous".to_string()
    } else {
        trimmed.to_string()
    }
}
