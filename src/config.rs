use serde::Deserialize;

use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::api::DEFAULT_TIMEOUT;

/// Used when neither the file, the environment nor the command line name a base
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const CONFIG_PATH_ENV: &str = "NOTES_CLIENT_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";
const ENV_PREFIX: &str = "NOTES_";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base: Option<String>,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: None,
            request_timeout: DEFAULT_TIMEOUT,
            log_dir: None,
        }
    }
}

/// Values read from `NOTES_*` environment variables
#[derive(Debug, Default, Deserialize)]
pub struct EnvOverrides {
    api_base: Option<String>,
    backend_url: Option<String>,
    #[serde(default, with = "humantime_serde")]
    request_timeout: Option<Duration>,
    log_dir: Option<PathBuf>,
}

impl EnvOverrides {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(pairs)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{}' not found", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read config file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid environment configuration: {0}")]
    Env(#[from] envy::Error),
}

impl Config {
    /// Base url requests are sent to
    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub const fn has_custom_base(&self) -> bool {
        self.api_base.is_some()
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(env::temp_dir)
    }

    pub fn set_api_base(&mut self, base: Option<String>) {
        if let Some(base) = non_empty(base) {
            self.api_base = Some(base);
        }
    }

    /// `NOTES_API_BASE` wins over `NOTES_BACKEND_URL`; empty values are ignored
    pub fn apply_env(&mut self, overrides: EnvOverrides) {
        self.set_api_base(non_empty(overrides.api_base).or(overrides.backend_url));
        if let Some(timeout) = overrides.request_timeout {
            self.request_timeout = timeout;
        }
        if let Some(dir) = overrides.log_dir {
            self.log_dir = Some(dir);
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.api_base = non_empty(config.api_base.take());
        Ok(config)
    }
}

/// Something worth logging about how the config was found. Loading happens
/// before the subscriber is installed, so these are handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigNotice {
    EnvFileMissing(PathBuf),
    Defaults,
}

impl ConfigNotice {
    pub fn log(&self) {
        match self {
            Self::EnvFileMissing(path) => tracing::warn!(
                "Config file '{}' from {} not found, falling back to '{}'",
                path.display(),
                CONFIG_PATH_ENV,
                DEFAULT_CONFIG_FILE
            ),
            Self::Defaults => {
                tracing::info!("No config file found, using defaults and environment variables");
            }
        }
    }
}

/// Loads the file layer, then applies the environment on top.
///
/// An explicit path must exist. Otherwise `NOTES_CLIENT_CONFIG` and then
/// `config.yaml` are tried, and defaults are used when neither is present.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Vec<ConfigNotice>), ConfigError> {
    let env_path = env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let (mut config, notices) = load_file_layer(explicit, env_path)?;
    config.apply_env(EnvOverrides::from_env()?);
    Ok((config, notices))
}

fn load_file_layer(
    explicit: Option<&Path>,
    env_path: Option<PathBuf>,
) -> Result<(Config, Vec<ConfigNotice>), ConfigError> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        return Ok((Config::from_file(path)?, Vec::new()));
    }

    let mut notices = Vec::new();

    // Try env path
    if let Some(path) = env_path {
        if path.exists() {
            return Ok((Config::from_file(&path)?, notices));
        }
        notices.push(ConfigNotice::EnvFileMissing(path));
    }

    // Fallback to config.yaml
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    if default_path.exists() {
        return Ok((Config::from_file(default_path)?, notices));
    }

    notices.push(ConfigNotice::Defaults);
    Ok((Config::default(), notices))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
