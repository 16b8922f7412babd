use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SiteError, SiteResult};
use crate::routing::RankerOptions;

pub const SITE_CONFIG_FILENAME: &str = "site.json";

pub const ENV_DIAGNOSTICS: &str = "CLINICPATH_DIAGNOSTICS";
pub const ENV_REPORTING: &str = "CLINICPATH_REPORTING";
pub const ENV_REPORTING_ENDPOINT: &str = "CLINICPATH_REPORTING_ENDPOINT";
pub const ENV_BIND_ADDR: &str = "CLINICPATH_BIND_ADDR";

/// Runtime switches for the site, passed explicitly at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Enables dev-only tooling such as the deferred link checker.
    pub diagnostics_enabled: bool,
    /// Forward analytics to the reporting backend instead of the local log.
    pub reporting_enabled: bool,
    pub reporting_endpoint: Option<String>,
    pub bind_addr: String,
    pub link_check_delay_ms: u64,
    pub suggestion_threshold: f64,
    pub suggestion_limit: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let ranker = RankerOptions::default();
        Self {
            diagnostics_enabled: false,
            reporting_enabled: false,
            reporting_endpoint: None,
            bind_addr: "127.0.0.1:8080".to_string(),
            link_check_delay_ms: 2_000,
            suggestion_threshold: ranker.threshold,
            suggestion_limit: ranker.limit,
        }
    }
}

impl SiteConfig {
    /// Development defaults: diagnostics on, reporting off.
    pub fn development() -> Self {
        Self {
            diagnostics_enabled: true,
            ..Self::default()
        }
    }

    pub fn ranker_options(&self) -> RankerOptions {
        RankerOptions {
            threshold: self.suggestion_threshold,
            limit: self.suggestion_limit,
        }
    }

    pub fn link_check_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.link_check_delay_ms)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> SiteResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> SiteResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_DIAGNOSTICS) {
            self.diagnostics_enabled = parse_flag(ENV_DIAGNOSTICS, &value)?;
        }
        if let Some(value) = lookup(ENV_REPORTING) {
            self.reporting_enabled = parse_flag(ENV_REPORTING, &value)?;
        }
        if let Some(value) = lookup(ENV_REPORTING_ENDPOINT) {
            let value = value.trim();
            self.reporting_endpoint = (!value.is_empty()).then(|| value.to_string());
        }
        if let Some(value) = lookup(ENV_BIND_ADDR) {
            self.bind_addr = value.trim().to_string();
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> SiteResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(SiteError::InvalidInput(format!(
            "{key} must be a boolean, got {other:?}"
        ))),
    }
}

pub fn site_config_path(dir: &Path) -> PathBuf {
    dir.join(SITE_CONFIG_FILENAME)
}

pub fn load_or_create_site_config(dir: &Path) -> SiteResult<SiteConfig> {
    std::fs::create_dir_all(dir)?;

    let path = site_config_path(dir);
    if !path.exists() {
        let config = SiteConfig::default();
        write_site_config(&path, &config)?;
        return Ok(config);
    }

    let data = std::fs::read_to_string(&path)?;
    serde_json::from_str(&data).map_err(|error| SiteError::Config {
        path: path.clone(),
        message: format!("failed to parse: {error}"),
    })
}

fn write_site_config(path: &Path, config: &SiteConfig) -> SiteResult<()> {
    let data = serde_json::to_string_pretty(config).map_err(|error| SiteError::Config {
        path: path.to_path_buf(),
        message: format!("failed to serialize: {error}"),
    })?;
    std::fs::write(path, data)?;
    Ok(())
}
