use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dial::{snap_minutes, DEFAULT_MINUTES};
use crate::dial_gesture::DEFAULT_SENSITIVITY;
use crate::focus::{FocusSettings, TimerMode, CANCEL_COUNTDOWN_SECONDS};
use crate::pomodoro::SetupDefaults;
use crate::slide::{DEFAULT_CANCEL_THRESHOLD, DEFAULT_COLOR_THRESHOLD};

/// User preferences. Sessions themselves are never written to disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: TimerMode,
    pub minutes: u32,
    pub cancel_window_secs: u32,
    pub count_cancel_window: bool,
    pub dial_sensitivity: f64,
    pub cancel_threshold: f64,
    pub color_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: TimerMode::Countdown,
            minutes: DEFAULT_MINUTES,
            cancel_window_secs: CANCEL_COUNTDOWN_SECONDS,
            count_cancel_window: true,
            dial_sensitivity: DEFAULT_SENSITIVITY,
            cancel_threshold: DEFAULT_CANCEL_THRESHOLD,
            color_threshold: DEFAULT_COLOR_THRESHOLD,
        }
    }
}

impl Config {
    /// Brings hand-edited values back into range.
    pub fn sanitized(mut self) -> Self {
        self.minutes = snap_minutes(self.minutes);
        self.cancel_window_secs = self.cancel_window_secs.max(1);
        if !self.dial_sensitivity.is_finite() || self.dial_sensitivity <= 0.0 {
            self.dial_sensitivity = DEFAULT_SENSITIVITY;
        }
        self.cancel_threshold = clamp_unit(self.cancel_threshold, DEFAULT_CANCEL_THRESHOLD);
        self.color_threshold = clamp_unit(self.color_threshold, DEFAULT_COLOR_THRESHOLD);
        self
    }

    pub fn setup_defaults(&self) -> SetupDefaults {
        SetupDefaults {
            mode: self.mode,
            minutes: self.minutes,
        }
    }

    pub fn focus_settings(&self) -> FocusSettings {
        FocusSettings {
            cancel_window_secs: self.cancel_window_secs,
            count_cancel_window: self.count_cancel_window,
        }
    }
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
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
        let path = if let Some(pd) = ProjectDirs::from("", "", "pomodial") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pomodial_config.json")
        };
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
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg.sanitized(),
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "failed to read config");
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
