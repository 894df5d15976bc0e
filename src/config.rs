//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.standings-sync.toml` files. Every field has a default, so the tool runs
//! without any configuration file at all.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".standings-sync.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where snapshots are published.
    #[serde(default)]
    pub source: SourceConfig,

    /// Where the consolidated document goes.
    #[serde(default)]
    pub output: OutputConfig,

    /// Regions to collect, in output order.
    #[serde(default = "default_regions")]
    pub regions: Vec<RegionConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            output: OutputConfig::default(),
            regions: default_regions(),
        }
    }
}

/// Remote repository settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the contents API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Base URL for raw file contents.
    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    /// Repository in `owner/name` form.
    #[serde(default = "default_repository")]
    pub repository: String,

    /// Branch raw files are read from.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Directory holding one sub-directory per year.
    #[serde(default = "default_standings_dir")]
    pub standings_dir: String,

    /// Pin a year instead of resolving the latest one.
    #[serde(default)]
    pub year: Option<u16>,

    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds. Unset means no client timeout.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// API token. Usually supplied through `GITHUB_TOKEN` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            repository: default_repository(),
            branch: default_branch(),
            standings_dir: default_standings_dir(),
            year: None,
            user_agent: default_user_agent(),
            timeout_seconds: None,
            token: None,
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_repository() -> String {
    "ValveSoftware/counter-strike_regional_standings".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_standings_dir() -> String {
    "live".to_string()
}

fn default_user_agent() -> String {
    format!("standings-sync/{}", env!("CARGO_PKG_VERSION"))
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Path of the JSON document.
    #[serde(default = "default_output_path")]
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_output_path() -> String {
    "valve_rankings.json".to_string()
}

/// A region: the key used in the output and the publisher's name for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    /// Key in the output document (e.g. `eu`).
    pub key: String,
    /// Canonical name used in snapshot filenames (e.g. `europe`).
    pub name: String,
}

impl RegionConfig {
    pub fn new(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
        }
    }
}

fn default_regions() -> Vec<RegionConfig> {
    vec![
        RegionConfig::new("global", "global"),
        RegionConfig::new("eu", "europe"),
        RegionConfig::new("na", "americas"),
        RegionConfig::new("asia", "asia"),
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.output.path = output.display().to_string();
        }
        if let Some(year) = args.year {
            self.source.year = Some(year);
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = Some(timeout);
        }
        if let Some(ref token) = args.token {
            self.source.token = Some(token.clone());
        }
    }

    /// Check invariants the rest of the program relies on.
    pub fn validate(&self) -> Result<()> {
        if self.regions.is_empty() {
            bail!("At least one region must be configured");
        }

        let mut seen = HashSet::new();
        for region in &self.regions {
            if region.key.is_empty() || region.name.is_empty() {
                bail!("Region key and name must not be empty");
            }
            if region.key == "updated" {
                bail!("Region key 'updated' collides with the timestamp field");
            }
            if !seen.insert(region.key.as_str()) {
                bail!("Duplicate region key: {}", region.key);
            }
        }

        for (field, value) in [
            ("api_base", &self.source.api_base),
            ("raw_base", &self.source.raw_base),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                bail!("source.{} must start with 'http://' or 'https://'", field);
            }
        }

        if !self.source.repository.contains('/') {
            bail!(
                "source.repository must be in 'owner/name' form, got '{}'",
                self.source.repository
            );
        }

        if self.source.timeout_seconds == Some(0) {
            bail!("Timeout must be at least 1 second");
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
