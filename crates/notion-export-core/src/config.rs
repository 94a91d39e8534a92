//! Export configuration
//!
//! Resolution order: defaults, then `config.toml`, then environment.
//! The CLI applies its own flags on top.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFAULT_API_BASE: &str = "https://api.notion.com/v1";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
/// Version pinned for the image lookup, whose response shape we decode by hand
pub const DEFAULT_IMAGE_NOTION_VERSION: &str = "2021-08-16";
/// Largest page size the API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

pub const TOKEN_ENV: &str = "NOTION_TOKEN";
pub const API_BASE_ENV: &str = "NOTION_API_BASE";

/// Settings for talking to the content service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Integration token (`secret_...` / `ntn_...`)
    pub token: String,
    pub api_base: String,
    pub notion_version: String,
    pub image_notion_version: String,
    /// Items per page for children and search listings
    pub page_size: u32,
    /// Per-request timeout; `None` leaves it to the HTTP client
    pub timeout_secs: Option<u64>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            image_notion_version: DEFAULT_IMAGE_NOTION_VERSION.to_string(),
            page_size: MAX_PAGE_SIZE,
            timeout_secs: Some(30),
        }
    }
}

impl ExportConfig {
    /// `~/.config/notion-export/config.toml` (platform config dir)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("notion-export").join("config.toml"))
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load from `path`, or the default location if it exists, then apply env
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => {
                    info!("Loading config from {:?}", path);
                    Self::from_file(&path)?
                }
                None => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(TOKEN_ENV).filter(|t| !t.is_empty()) {
            self.token = token;
        }
        if let Some(base) = lookup(API_BASE_ENV).filter(|b| !b.is_empty()) {
            self.api_base = base;
        }
    }

    /// Check the config is usable before any request goes out
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            bail!("no API token configured (set {TOKEN_ENV} or `token` in config.toml)");
        }
        url::Url::parse(&self.api_base)
            .with_context(|| format!("invalid api_base '{}'", self.api_base))?;
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            bail!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            );
        }
        Ok(())
    }
}
