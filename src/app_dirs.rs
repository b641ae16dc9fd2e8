use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Persisted user preferences (selected letters, duration, mute).
    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "klaw") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("klaw_config.json")
        }
    }

    /// Catch statistics database under $HOME/.local/state/klaw.
    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("catches.db"))
    }

    /// Append-only CSV log of finished games.
    pub fn game_log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("games.csv"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("klaw"),
            )
        } else {
            ProjectDirs::from("", "", "klaw").map(|pd| pd.data_local_dir().to_path_buf())
        }
    }
}
