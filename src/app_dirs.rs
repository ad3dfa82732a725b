use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for log files; nothing else is stored here.
    pub fn log_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("pomodial"),
            )
        } else {
            ProjectDirs::from("", "", "pomodial")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("logs"))
        }
    }
}
