//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ReelcutError, ReelcutResult};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sampling and session inference defaults.
    pub analysis: AnalysisDefaults,

    /// Reference pattern locations.
    pub patterns: PatternSet,

    /// Segment export defaults.
    pub export: ExportDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default analysis parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisDefaults {
    /// Sampling cadence in seconds; also the run-continuity step.
    pub check_interval_secs: u32,

    /// Gaps between transition runs must exceed this to count as a session.
    pub min_session_secs: u32,

    /// Full-frame intensity sum below which a frame counts as a transition.
    pub darkness_threshold: u64,

    /// Similarity score a pattern match must exceed.
    pub match_threshold: f32,

    /// Skip frames that fail to decode instead of aborting the scan.
    pub skip_unreadable_frames: bool,
}

/// Reference pattern files, one per matched category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSet {
    pub kill: PathBuf,
    pub death: PathBuf,
    pub win: PathBuf,
}

/// Default export behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportDefaults {
    /// Wait for every exporter process before exiting.
    pub wait: bool,

    /// Cap on concurrently running exporter processes (`None` = unbounded).
    pub max_parallel: Option<usize>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "reelcut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AnalysisDefaults {
    fn default() -> Self {
        Self {
            check_interval_secs: 1,
            min_session_secs: 180,
            darkness_threshold: 1_000_000,
            match_threshold: 0.8,
            skip_unreadable_frames: false,
        }
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::in_dir(Path::new("."))
    }
}

impl PatternSet {
    /// The standard pattern file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            kill: dir.join("kill_image.png"),
            death: dir.join("death_image.png"),
            win: dir.join("win_image.png"),
        }
    }

    /// Pattern paths that do not exist on disk.
    pub fn missing(&self) -> Vec<&Path> {
        [&self.kill, &self.death, &self.win]
            .into_iter()
            .filter(|p| !p.exists())
            .map(PathBuf::as_path)
            .collect()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    ///
    /// Runs before logging is set up, so a file that exists but cannot be
    /// read is handed back for the caller to report.
    pub fn load() -> (Self, Option<ReelcutError>) {
        Self::load_or_default(&config_file_path())
    }

    /// Load config from `path` if it exists. A missing file yields defaults
    /// silently; an unreadable one yields defaults plus the error.
    pub fn load_or_default(path: &Path) -> (Self, Option<ReelcutError>) {
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load config from an explicit path. Unlike [`AppConfig::load`], a
    /// missing or malformed file is an error.
    pub fn load_from(path: &Path) -> ReelcutResult<Self> {
        if !path.exists() {
            return Err(ReelcutError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ReelcutError::config(format!("{}: {e}", path.display())))
    }

    /// Save config to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("reelcut").join("config.json")
}
