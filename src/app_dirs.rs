use directories::ProjectDirs;
use std::path::PathBuf;

use crate::score_store::STORAGE_KEY;

const APP_NAME: &str = "codetype";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// $HOME/.local/state/codetype, falling back to the platform data dir
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join(APP_NAME),
            )
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|pd| pd.data_local_dir().to_path_buf())
        }
    }

    pub fn scores_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(format!("{STORAGE_KEY}.json")))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(format!("{APP_NAME}.log")))
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_and_log_share_state_dir() {
        if let (Some(scores), Some(log)) = (AppDirs::scores_path(), AppDirs::log_path()) {
            assert_eq!(scores.parent(), log.parent());
            assert!(scores.ends_with("code_typing_scores.json"));
        }
    }
}
