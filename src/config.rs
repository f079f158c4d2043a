//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$SPOOLCHECK_CONFIG` (environment variable)
//! 2. `~/.config/spoolcheck/config.toml` (Linux/macOS)
//!    `%APPDATA%\spoolcheck\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::parser::html::DEFAULT_REGIONS;
use crate::store::spool::ScanOptions;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// How spool directories are walked.
    pub scan: ScanConfig,
    /// Which HTML regions make up the searchable content.
    pub extract: ExtractConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override directory for the log file.
    pub cache_dir: Option<PathBuf>,
    /// Spool directory used when none is given on the command line.
    pub spool_dir: Option<PathBuf>,
}

/// Spool directory walking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Include dot-files and dot-directories.
    pub include_hidden: bool,
    /// Skip files that cannot be read instead of aborting.
    pub skip_unreadable: bool,
}

/// Content extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Class names of the HTML regions to search, in concatenation order.
    pub regions: Vec<String>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
            spool_dir: None,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        let options = ScanOptions::default();
        Self {
            recursive: options.recursive,
            include_hidden: options.include_hidden,
            skip_unreadable: options.skip_unreadable,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS.iter().map(|r| r.to_string()).collect(),
        }
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(cfg: &ScanConfig) -> Self {
        Self {
            recursive: cfg.recursive,
            include_hidden: cfg.include_hidden,
            skip_unreadable: cfg.skip_unreadable,
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("SPOOLCHECK_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("spoolcheck").join("config.toml"))
}

/// Return the cache directory for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spoolcheck")
}
