use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const GRAPHQL_API_ID: &str = "GRAPHQL_API_ID";
pub const AGENTS_FUNCTION: &str = "AGENTS_PART_1";
pub const REST_API_URL: &str = "REST_API_URL";
pub const VERIFY_TIMEOUT_SECS: &str = "VERIFY_TIMEOUT_SECS";
pub const PORT: &str = "PORT";
pub const DOTENV_PATH: &str = "DOTENV_PATH";

const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 3000;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set (either directly or via CONFIG_SECRET_ARN secret)")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Process-wide settings, read once at cold start and injected into handler state
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub graphql_api_id: Option<String>,
    pub agents_function_name: Option<String>,
    pub rest_api_url: Option<String>,
    pub verify_timeout: Duration,
    pub port: u16,
}

/// What the Dispatcher needs to resolve the endpoint and launch the job
#[derive(Debug, Clone, PartialEq)]
pub struct DispatcherConfig {
    pub graphql_api_id: String,
    pub downstream_function: String,
}

/// What GatedProxy needs to reach AuthVerify
#[derive(Debug, Clone, PartialEq)]
pub struct GatedProxyConfig {
    pub verify_base_url: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let verify_timeout = match non_empty(VERIFY_TIMEOUT_SECS) {
            Some(raw) => Duration::from_secs(raw.trim().parse::<u64>().map_err(|_| {
                ConfigError::Invalid {
                    name: VERIFY_TIMEOUT_SECS,
                    value: raw.clone(),
                }
            })?),
            None => Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS),
        };

        let port = match non_empty(PORT) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: PORT,
                value: raw.clone(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            graphql_api_id: non_empty(GRAPHQL_API_ID),
            agents_function_name: non_empty(AGENTS_FUNCTION),
            rest_api_url: non_empty(REST_API_URL),
            verify_timeout,
            port,
        })
    }

    /// Overlay values loaded from Secrets Manager; keys use the env var names
    pub fn with_overrides(self, overrides: &HashMap<String, String>) -> Result<Self, ConfigError> {
        if overrides.is_empty() {
            return Ok(self);
        }

        let base = self.clone();
        let merged = Self::from_lookup(|name| {
            overrides.get(name).cloned().or_else(|| match name {
                GRAPHQL_API_ID => base.graphql_api_id.clone(),
                AGENTS_FUNCTION => base.agents_function_name.clone(),
                REST_API_URL => base.rest_api_url.clone(),
                VERIFY_TIMEOUT_SECS => Some(base.verify_timeout.as_secs().to_string()),
                PORT => Some(base.port.to_string()),
                _ => None,
            })
        })?;

        Ok(merged)
    }

    pub fn dispatcher(&self) -> Result<DispatcherConfig, ConfigError> {
        Ok(DispatcherConfig {
            graphql_api_id: self
                .graphql_api_id
                .clone()
                .ok_or(ConfigError::Missing(GRAPHQL_API_ID))?,
            downstream_function: self
                .agents_function_name
                .clone()
                .ok_or(ConfigError::Missing(AGENTS_FUNCTION))?,
        })
    }

    pub fn gated_proxy(&self) -> Result<GatedProxyConfig, ConfigError> {
        Ok(GatedProxyConfig {
            verify_base_url: self
                .rest_api_url
                .clone()
                .ok_or(ConfigError::Missing(REST_API_URL))?,
            timeout: self.verify_timeout,
        })
    }
}

/// Load `.env` (or the file named by DOTENV_PATH) for local runs, returning
/// the file applied. Lambda never ships one so absence is fine.
///
/// Runs before logging is initialised; the caller logs the returned path.
pub fn load_dotenv() -> Option<PathBuf> {
    match env::var(DOTENV_PATH) {
        Ok(path) => load_env_file(Path::new(&path)),
        Err(_) => dotenvy::dotenv().ok(),
    }
}

pub fn load_env_file(path: &Path) -> Option<PathBuf> {
    dotenvy::from_path(path).ok().map(|_| path.to_path_buf())
}
