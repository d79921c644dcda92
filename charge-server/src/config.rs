//! Process configuration from environment variables.

use std::collections::HashMap;
use std::fmt::Display;
use std::io::{self, Read};
use std::net::IpAddr;
use std::str::FromStr;

use tracing::{info, warn};

use crate::stations::SearchConfig;
use crate::store::DEFAULT_MAX_CONNECTIONS;
use crate::upstream::DEFAULT_TIMEOUT_SECS;

/// Errors loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("reading {path}: {source}")]
    EnvFile {
        path: &'static str,
        source: dotenvy::Error,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,

    /// Document store connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    /// Cookie-signing secret. Loaded for deployments that set it; no route
    /// currently reads cookies.
    pub cookie_secret: Option<String>,

    /// Origins allowed to make credentialed cross-origin requests.
    pub cors_whitelist: Vec<String>,

    /// Open Charge Map API key
    pub directory_api_key: String,

    /// Google API key, used for both Places and Geocoding
    pub places_api_key: String,

    pub upstream_timeout_secs: u64,

    pub search: SearchConfig,
}

/// Optional dotenv file read at startup.
pub const ENV_FILE: &str = ".env";

impl Config {
    /// Load from the process environment, falling back to `.env` in the
    /// working directory for variables the environment does not set.
    pub fn load() -> Result<Self, ConfigError> {
        match std::fs::File::open(ENV_FILE) {
            Ok(file) => {
                info!("reading {ENV_FILE}");
                Self::from_env_and_file(file)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::from_env(),
            Err(e) => {
                warn!("cannot open {ENV_FILE}: {e}");
                Self::from_env()
            }
        }
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from the process environment with dotenv-format `file` filling
    /// the gaps. Exported variables win.
    pub fn from_env_and_file(file: impl Read) -> Result<Self, ConfigError> {
        let file_vars = read_env_file(file)?;
        Self::from_lookup(layered(|key| std::env::var(key).ok(), file_vars))
    }

    /// Load using `lookup` to read each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let defaults = SearchConfig::default();

        let config = Self {
            bind_addr: parse_or(&var, "BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(&var, "PORT", 8080)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(
                &var,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            cookie_secret: var("COOKIE_SECRET"),
            cors_whitelist: var("WHITELIST")
                .map(|list| split_list(&list))
                .unwrap_or_default(),
            directory_api_key: required_key(&var, "OCM_API_KEY"),
            places_api_key: required_key(&var, "GOOGLE_PLACES_API_KEY"),
            upstream_timeout_secs: parse_or(&var, "UPSTREAM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            search: SearchConfig {
                freshness_ms: parse_or(&var, "CACHE_FRESHNESS_MS", defaults.freshness_ms)?,
                places_radius_m: parse_or(&var, "PLACES_RADIUS_M", defaults.places_radius_m)?,
            },
        };

        if config.database_url.is_none() {
            warn!("DATABASE_URL not set, using in-memory store (data is lost on restart)");
        }
        if config.cookie_secret.is_none() {
            info!("COOKIE_SECRET not set");
        }

        Ok(config)
    }
}

fn parse_or<T>(
    var: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

/// API keys are not fatal when missing; upstream calls will fail instead.
fn required_key(var: &impl Fn(&str) -> Option<String>, key: &str) -> String {
    var(key).unwrap_or_else(|| {
        warn!("{key} not set. API calls will fail.");
        String::new()
    })
}

fn read_env_file(file: impl Read) -> Result<HashMap<String, String>, ConfigError> {
    dotenvy::from_read_iter(file)
        .collect::<Result<_, _>>()
        .map_err(|source| ConfigError::EnvFile {
            path: ENV_FILE,
            source,
        })
}

fn layered(
    primary: impl Fn(&str) -> Option<String>,
    fallback: HashMap<String, String>,
) -> impl Fn(&str) -> Option<String> {
    move |key| primary(key).or_else(|| fallback.get(key).cloned())
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
