use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs, time::Duration};
use thiserror::Error;
use url::Url;

// Client runtime settings: where the API lives and where the login hint is kept.

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_FLAG_PATH: &str = ".staff_session/flag.json";
pub const DEFAULT_FEDERATED_PROVIDER: &str = "google";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid API base url {value:?}: {reason}")]
    BaseUrl { value: String, reason: String },
    #[error("invalid REQUEST_TIMEOUT_MS {0:?}; expected milliseconds")]
    Timeout(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub api_base_url: Url,
    pub flag_path: PathBuf,
    // None leaves requests unbounded.
    pub request_timeout_ms: Option<u64>,
    pub federated_provider: String,
}

// Every key is optional; missing ones fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    flag_path: Option<PathBuf>,
    request_timeout_ms: Option<u64>,
    federated_provider: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            flag_path: PathBuf::from(DEFAULT_FLAG_PATH),
            request_timeout_ms: None,
            federated_provider: DEFAULT_FEDERATED_PROVIDER.to_string(),
        }
    }
}

impl SessionConfig {
    /// Reads the optional TOML file named by `SESSION_CONFIG`, then applies
    /// environment overrides on top.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var("SESSION_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Some(read_file(Path::new(path.trim()))?),
            _ => None,
        };
        Self::from_sources(file.as_deref(), |key| env::var(key).ok())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Self::from_sources(Some(raw), |_| None)
    }

    // `lookup` stands in for the process environment so tests stay hermetic.
    pub fn from_sources<F>(file: Option<&str>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: FileConfig = match file {
            Some(raw) => toml::from_str(raw)?,
            None => FileConfig::default(),
        };
        let mut config = Self::default();

        if let Some(raw) = non_empty(lookup("API_BASE_URL")).or(file.api_base_url) {
            config.api_base_url = parse_base_url(&raw)?;
        }
        if let Some(path) = non_empty(lookup("SESSION_FLAG_PATH"))
            .map(PathBuf::from)
            .or(file.flag_path)
        {
            config.flag_path = path;
        }
        config.request_timeout_ms = match non_empty(lookup("REQUEST_TIMEOUT_MS")) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| ConfigError::Timeout(raw.clone()))?,
            ),
            None => file.request_timeout_ms,
        };
        // Zero disables the timeout, same as leaving it unset.
        config.request_timeout_ms = config.request_timeout_ms.filter(|ms| *ms > 0);
        if let Some(provider) = non_empty(lookup("FEDERATED_PROVIDER")).or(file.federated_provider)
        {
            config.federated_provider = provider.trim().to_string();
        }

        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let value = raw.trim();
    let url = Url::parse(value).map_err(|err| ConfigError::BaseUrl {
        value: value.to_string(),
        reason: err.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::BaseUrl {
            value: value.to_string(),
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

fn default_base_url() -> Url {
    match Url::parse(DEFAULT_API_BASE_URL) {
        Ok(url) => url,
        Err(err) => unreachable!("default API base url is valid: {err}"),
    }
}
