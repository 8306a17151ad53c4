//! Configuration Module
//!
//! Loads settings from a `KEY=VALUE` file, then applies environment overrides.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::links::PolicyResolver;

pub const DEFAULT_BASE_URL: &str = "www.example.com";
pub const DEFAULT_TTL_MINUTES: u64 = 1440;
pub const DEFAULT_MAX_CLICKS: u64 = 5;
pub const DEFAULT_LINKS_DIR: &str = "links";
pub const DEFAULT_USERS_FILE: &str = "users.txt";
pub const DEFAULT_SWEEP_INTERVAL: u64 = 60;

/// Application configuration parameters.
///
/// Every value falls back to a built-in default when absent or malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Prefix of generated short URLs
    pub base_url: String,
    /// TTL ceiling in minutes
    pub default_ttl_minutes: u64,
    /// Click quota floor
    pub default_max_clicks: u64,
    /// Directory holding one file per link record
    pub links_dir: PathBuf,
    /// Account file
    pub users_file: PathBuf,
    /// Background sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults. A file that exists but cannot be
    /// read is logged and also yields the defaults.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::from_config_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{} not found, using default configuration", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("Failed to read {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parses `KEY=VALUE` lines. Lines without `=` are ignored.
    pub fn from_config_str(content: &str) -> Self {
        let entries: HashMap<String, String> = content
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();

        Self::default().apply_overrides(|key| entries.get(key).cloned())
    }

    /// Applies overrides from environment variables with the same key names.
    ///
    /// # Environment Variables
    /// - `BASE_URL` - Short link prefix
    /// - `DEFAULT_TL_MINUTES` - TTL ceiling in minutes
    /// - `DEFAULT_MAX_CLICKS` - Click quota floor
    /// - `LINKS_DIR` - Record directory
    /// - `USERS_FILE` - Account file
    /// - `SWEEP_INTERVAL_SECS` - Background sweep frequency in seconds
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup("BASE_URL")
                .filter(|v| !v.is_empty())
                .unwrap_or(self.base_url),
            default_ttl_minutes: positive(&lookup, "DEFAULT_TL_MINUTES")
                .unwrap_or(self.default_ttl_minutes),
            default_max_clicks: positive(&lookup, "DEFAULT_MAX_CLICKS")
                .unwrap_or(self.default_max_clicks),
            links_dir: lookup("LINKS_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(self.links_dir),
            users_file: lookup("USERS_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(self.users_file),
            sweep_interval: positive(&lookup, "SWEEP_INTERVAL_SECS")
                .unwrap_or(self.sweep_interval),
        }
    }

    /// Policy built from the configured defaults.
    pub fn policy(&self) -> PolicyResolver {
        PolicyResolver::new(self.default_ttl_minutes, self.default_max_clicks)
    }
}

fn positive(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.parse::<u64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!("Ignoring {}={:?}: expected a positive integer", key, raw);
            None
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_ttl_minutes: DEFAULT_TTL_MINUTES,
            default_max_clicks: DEFAULT_MAX_CLICKS,
            links_dir: PathBuf::from(DEFAULT_LINKS_DIR),
            users_file: PathBuf::from(DEFAULT_USERS_FILE),
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}
