use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "cubetime";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("cubetime_config.json"))
    }

    pub fn log_dir() -> PathBuf {
        ProjectDirs::from("", "", APP_NAME)
            .map(|pd| pd.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
