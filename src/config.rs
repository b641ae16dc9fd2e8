use crate::alphabet::LetterPool;
use crate::app_dirs::AppDirs;
use crate::round::DEFAULT_CAPSULE_COUNT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Preferences remembered between runs: the letter selection, the last round
/// duration, the capsule count, and the mute flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub selected_letters: String,
    pub last_duration_secs: u32,
    pub capsule_count: usize,
    pub muted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selected_letters: String::new(),
            last_duration_secs: 60,
            capsule_count: DEFAULT_CAPSULE_COUNT,
            muted: false,
        }
    }
}

impl Config {
    pub fn pool(&self) -> LetterPool {
        LetterPool::from_letters(&self.selected_letters)
    }

    pub fn set_pool(&mut self, pool: &LetterPool) {
        self.selected_letters = pool.to_letters();
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
