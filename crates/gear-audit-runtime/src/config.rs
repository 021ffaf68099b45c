use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_TABULATE_COMMAND: &str = "fw-heudiconv-tabulate";

pub const ENV_CONFIG_PATH: &str = "FW_GEAR_AUDIT_CONFIG";
pub const ENV_API_KEY: &str = "FW_API_KEY";
pub const ENV_API_URL: &str = "FW_API_URL";
pub const ENV_TABULATE_COMMAND: &str = "FW_TABULATE_CMD";

/// Resolve the config file path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. FW_GEAR_AUDIT_CONFIG environment variable (with tilde expansion)
/// 3. XDG config directory
/// 4. ~/.fw-gear-audit/config.toml (fallback for systems without XDG)
pub fn resolve_config_path(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG_PATH) {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(config_dir) = dirs::config_dir() {
        return Ok(config_dir.join("fw-gear-audit").join("config.toml"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home)
            .join(".fw-gear-audit")
            .join("config.toml"));
    }

    Err(Error::Config(
        "Could not determine config path: no HOME directory or XDG config directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Credential file written by `fw login`
fn flywheel_cli_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("flywheel").join("user.json"))
}

#[derive(Deserialize)]
struct FlywheelCliCredentials {
    key: Option<String>,
}

/// Reads the API key stored by the Flywheel CLI, if any
pub fn read_flywheel_cli_key(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let credentials: FlywheelCliCredentials = serde_json::from_str(&content)?;
    Ok(credentials.key.filter(|k| !k.trim().is_empty()))
}

fn default_tabulate_command() -> String {
    DEFAULT_TABULATE_COMMAND.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Flywheel API key, `<host>[:<port>]:<secret>`
    #[serde(default)]
    pub api_key: Option<String>,

    /// Overrides the API base URL derived from the key
    #[serde(default)]
    pub api_url: Option<String>,

    /// Sequence tabulation executable
    #[serde(default = "default_tabulate_command")]
    pub tabulate_command: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: None,
            tabulate_command: default_tabulate_command(),
        }
    }
}

impl Config {
    /// Loads the config file, applies environment overrides, then falls back
    /// to the Flywheel CLI credentials for the API key.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let config_path = resolve_config_path(explicit_path)?;
        if explicit_path.is_some() && !config_path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());

        if config.api_key.is_none()
            && let Some(path) = flywheel_cli_credentials_path()
        {
            config.api_key = read_flywheel_cli_key(&path)?;
        }

        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Environment values win over file values; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(cmd) = lookup(ENV_TABULATE_COMMAND) {
            self.tabulate_command = cmd;
        }
    }

    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            Error::NotConfigured(format!(
                "Run `fw login` or set {} before auditing.",
                ENV_API_KEY
            ))
        })
    }
}
