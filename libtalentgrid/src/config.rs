//! Configuration management for Talentgrid

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::views::ViewKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub views: ViewsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in humantime notation ("30s", "2m")
    #[serde(default = "default_timeout")]
    pub timeout: String,
    #[serde(default = "default_refresh_endpoint")]
    pub refresh_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Fraction of the sentinel row that must be on screen to count as visible
    #[serde(default = "default_sentinel_threshold")]
    pub sentinel_threshold: f32,
}

/// Resource paths per dashboard, relative to `api.base_url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewsConfig {
    #[serde(default = "default_jobs_resource")]
    pub jobs: String,
    #[serde(default = "default_applications_resource")]
    pub applications: String,
    #[serde(default = "default_interviews_resource")]
    pub interviews: String,
    #[serde(default = "default_offers_resource")]
    pub offers: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_identity_path")]
    pub identity_path: String,
}

fn default_timeout() -> String {
    "30s".to_string()
}

fn default_refresh_endpoint() -> String {
    "/auth/refresh-token".to_string()
}

fn default_page_size() -> usize {
    5
}

/// Lowest accepted `paging.sentinel_threshold`
pub const MIN_SENTINEL_THRESHOLD: f32 = 0.9;

fn default_sentinel_threshold() -> f32 {
    1.0
}

fn default_jobs_resource() -> String {
    "/jobs".to_string()
}

fn default_applications_resource() -> String {
    "/applications".to_string()
}

fn default_interviews_resource() -> String {
    "/interviews".to_string()
}

fn default_offers_resource() -> String {
    "/offers".to_string()
}

fn default_identity_path() -> String {
    "~/.local/share/talentgrid/user-storage.json".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout: default_timeout(),
            refresh_endpoint: default_refresh_endpoint(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            sentinel_threshold: default_sentinel_threshold(),
        }
    }
}

impl Default for ViewsConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs_resource(),
            applications: default_applications_resource(),
            interviews: default_interviews_resource(),
            offers: default_offers_resource(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            identity_path: default_identity_path(),
        }
    }
}

impl ApiConfig {
    /// Parse the configured request timeout
    pub fn timeout(&self) -> Result<Duration> {
        humantime::parse_duration(&self.timeout).map_err(|e| {
            ConfigError::InvalidValue {
                field: "api.timeout".to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl ViewsConfig {
    /// Resource path for a dashboard view
    pub fn resource(&self, view: ViewKind) -> &str {
        match view {
            ViewKind::Jobs => &self.jobs,
            ViewKind::Applications => &self.applications,
            ViewKind::Interviews => &self.interviews,
            ViewKind::Offers => &self.offers,
        }
    }
}

impl StorageConfig {
    /// Identity file path with `~` expanded
    pub fn identity_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.identity_path).to_string())
    }
}

impl Config {
    /// Load configuration from the default location
    ///
    /// A missing file yields the default configuration; a present but
    /// malformed file is an error.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        if !config_path.exists() {
            tracing::debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::MissingField("api.base_url".to_string()).into());
        }
        if self.paging.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "paging.page_size".to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }
        let threshold = self.paging.sentinel_threshold;
        if !(MIN_SENTINEL_THRESHOLD..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidValue {
                field: "paging.sentinel_threshold".to_string(),
                reason: format!("{} is outside [{}, 1]", threshold, MIN_SENTINEL_THRESHOLD),
            }
            .into());
        }
        self.api.timeout()?;
        Ok(())
    }
}

/// Resolve the configuration file path following the XDG base directory layout
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("TALENTGRID_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("talentgrid").join("config.toml"))
}

/// Resolve the data directory path following the XDG base directory layout
pub fn resolve_data_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| ConfigError::MissingField("data directory".to_string()))?;

    Ok(data_dir.join("talentgrid"))
}
