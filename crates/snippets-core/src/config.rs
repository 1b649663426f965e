use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::BackoffSpec;

/// Retry parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt).
    pub max_retries: u32,
    /// Wait between attempts in seconds; the lower bound when a range is set.
    pub wait_min_secs: f64,
    /// Upper bound in seconds. When present, waits are drawn uniformly from
    /// `[wait_min_secs, wait_max_secs]`; when absent, the wait is fixed.
    #[serde(default)]
    pub wait_max_secs: Option<f64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            wait_min_secs: 0.5,
            wait_max_secs: None,
        }
    }
}

impl RetryConfig {
    /// Builds the backoff spec, validating that bounds are finite,
    /// non-negative, and ordered.
    pub fn backoff(&self) -> Result<BackoffSpec> {
        let min = seconds(self.wait_min_secs, "wait_min_secs")?;
        match self.wait_max_secs {
            None => Ok(BackoffSpec::fixed(min)),
            Some(max_secs) => {
                let max = seconds(max_secs, "wait_max_secs")?;
                Ok(BackoffSpec::range(min, max)?)
            }
        }
    }
}

fn seconds(value: f64, field: &str) -> Result<Duration> {
    if !value.is_finite() || value < 0.0 {
        anyhow::bail!("{} must be a non-negative number of seconds, got {}", field, value);
    }
    Ok(Duration::from_secs_f64(value))
}

/// Global configuration loaded from `~/.config/snippets/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetsConfig {
    /// Worker count used when the CLI flag is not given.
    pub default_workers: usize,
    /// Optional retry policy; if missing, calls are made exactly once.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for SnippetsConfig {
    fn default() -> Self {
        Self {
            default_workers: 1,
            retry: None,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("snippets")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<SnippetsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = SnippetsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: SnippetsConfig = toml::from_str(&data)?;
    Ok(cfg)
}
