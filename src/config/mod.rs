//! Configuration management
//!
//! Credentials come from three layers, later ones winning: the YAML file
//! (`~/.cfcli.yml` unless `--config` points elsewhere), environment
//! variables, then command-line flags (applied by the caller).

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_CONFIG_FILE: &str = ".cfcli.yml";

/// Settings resolved from the config file and environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API token, or global API key when `email` is set
    pub token: Option<String>,

    /// Account email for global API key auth
    pub email: Option<String>,

    /// Default domain (zone name)
    pub domain: Option<String>,

    /// Output format
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Layout of the YAML file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    accounts: BTreeMap<String, Profile>,
}

#[derive(Debug, Default, Deserialize)]
struct Defaults {
    account: Option<String>,
    #[serde(flatten)]
    profile: Profile,
}

/// One set of credentials
#[derive(Debug, Clone, Default, Deserialize)]
struct Profile {
    token: Option<String>,
    email: Option<String>,
    domain: Option<String>,
}

impl Config {
    /// Load configuration from the config file and environment variables
    pub fn load(path: Option<&Path>, account: Option<&str>) -> Result<Self> {
        let path = match path {
            Some(p) => expand_home(p),
            None => Self::default_path()?,
        };

        let config = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_yaml(&content, account)
                .with_context(|| format!("Invalid config file: {}", path.display()))?
        } else {
            debug!("{} not found, using environment only", path.display());
            Self::default()
        };

        Ok(config.with_env(|key| env::var(key).ok()))
    }

    /// Parse the YAML document and pick the active account
    pub fn from_yaml(content: &str, account: Option<&str>) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;

        let selected = account
            .map(str::to_string)
            .or_else(|| file.defaults.account.clone());

        let profile = match selected {
            Some(name) => file.accounts.get(&name).cloned().ok_or_else(|| {
                let available: Vec<&str> = file.accounts.keys().map(String::as_str).collect();
                anyhow!(
                    "Unable to find account {}. Available accounts: {}",
                    name,
                    available.join(", ")
                )
            })?,
            None => file.defaults.profile,
        };

        Ok(Self {
            token: profile.token,
            email: profile.email,
            domain: profile.domain,
            format: None,
        })
    }

    /// Overlay environment variables; `lookup` is `env::var` outside tests
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = lookup("CF_API_KEY").or_else(|| lookup("CF_API_TOKEN")) {
            self.token = Some(token);
        }
        if let Some(email) = lookup("CF_API_EMAIL") {
            self.email = Some(email);
        }
        if let Some(domain) = lookup("CF_API_DOMAIN") {
            self.domain = Some(domain);
        }
        if let Some(format) = lookup("CF_OUTPUT_FORMAT") {
            match OutputFormat::from_str(&format, true) {
                Ok(f) => self.format = Some(f),
                Err(_) => tracing::warn!("Ignoring unknown CF_OUTPUT_FORMAT '{}'", format),
            }
        }
        self
    }

    /// `~/.cfcli.yml`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
        Ok(home.join(DEFAULT_CONFIG_FILE))
    }
}

fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
