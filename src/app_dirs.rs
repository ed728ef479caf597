use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "sortline").map(|pd| pd.config_dir().join("config.json"))
    }

    /// Where the rolling log files go; stdout belongs to the TUI
    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("sortline"),
            )
        } else {
            ProjectDirs::from("", "", "sortline").map(|pd| pd.data_local_dir().join("logs"))
        }
    }
}
