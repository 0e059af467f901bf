use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
    /// Number of daily log files to keep.
    pub max_files: usize,
}

/// Behaviour of the bundled demo form's submit action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated network latency of the submit action.
    pub submit_delay_ms: u64,
    /// Reject the first submission, to exercise the retry path.
    pub fail_first_submit: bool,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 50 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            log_dir: None,
            max_files: 7,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            submit_delay_ms: 2000,
            fail_first_submit: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/stepform/config.toml`.
    /// Returns `Default` if the file is missing or unparseable.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        match std::fs::read_to_string(config_path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!(
                        "Failed to parse config at {}: {e}, using defaults",
                        config_path.display()
                    );
                    Self::default()
                }
            },
            Err(_) => {
                log::debug!(
                    "No config file at {}, using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("stepform").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
