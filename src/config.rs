use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_OVERLAY_PATH: &str = "overlay.png";
const CONFIG_DIR_NAME: &str = "SaltShakerPfp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overlay asset. Relative paths are tried against the working directory,
    /// then next to the executable.
    pub overlay_path: PathBuf,
    /// Where downloads go. Falls back to the platform Downloads folder.
    pub download_dir: Option<PathBuf>,
    /// Starting folder for the next file dialog.
    pub last_open_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            overlay_path: PathBuf::from(DEFAULT_OVERLAY_PATH),
            download_dir: None,
            last_open_dir: None,
        }
    }
}

impl AppConfig {
    /// `<config dir>/SaltShakerPfp/config.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join("config.json")
    }

    pub fn load(path: &Path) -> Option<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return None;
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::error!("Failed to parse config {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::error!("Failed to read config {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::debug!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// First existing candidate for the overlay, or the configured path as is
    /// so the load fails with a useful message.
    pub fn resolve_overlay_path(&self) -> PathBuf {
        if self.overlay_path.is_absolute() {
            return self.overlay_path.clone();
        }

        let mut candidates = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(&self.overlay_path));
        }
        if let Some(exe_dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
            candidates.push(exe_dir.join(&self.overlay_path));
        }

        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .unwrap_or_else(|| self.overlay_path.clone())
    }
}
