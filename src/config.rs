use reqwest::Url;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const API_BASE_URL_VAR: &str = "NETDECK_API_BASE_URL";
pub const STUDIO_ADDR_VAR: &str = "NETDECK_STUDIO_ADDR";
pub const MNIST_DIR_VAR: &str = "NETDECK_MNIST_DIR";

pub const DEFAULT_STUDIO_ADDR: &str = "127.0.0.1:7878";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a valid http(s) URL: {reason}")]
    InvalidUrl { var: &'static str, value: String, reason: String },

    #[error("{var}={value:?} is not a valid socket address")]
    InvalidAddr { var: &'static str, value: String },
}

/// Runtime settings, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Backend to talk to; `None` selects the in-memory repository.
    pub api_base_url: Option<Url>,
    pub studio_addr: SocketAddr,
    /// Directory holding the MNIST IDX files for in-memory samples.
    pub mnist_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from any variable lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let get = |var: &str| lookup(var).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let api_base_url = get(API_BASE_URL_VAR).map(|value| parse_base_url(&value)).transpose()?;

        let addr = get(STUDIO_ADDR_VAR).unwrap_or_else(|| DEFAULT_STUDIO_ADDR.to_owned());
        let studio_addr = addr
            .parse()
            .map_err(|_| ConfigError::InvalidAddr { var: STUDIO_ADDR_VAR, value: addr.clone() })?;

        let mnist_dir = get(MNIST_DIR_VAR).map(PathBuf::from);

        Ok(Config { api_base_url, studio_addr, mnist_dir })
    }
}

fn parse_base_url(value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        var: API_BASE_URL_VAR,
        value: value.to_owned(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
