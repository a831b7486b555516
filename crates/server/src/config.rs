use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use executors::ExecutionMode;
use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_LISTEN_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8050);
const DEFAULT_KUBECTL: &str = "kubectl";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub kubectl: String,
    pub mode: ExecutionMode,
    pub command_timeout: Duration,
    pub auth_token: Option<SecretString>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable `{var}` has invalid value `{value}`")]
    InvalidVar { var: &'static str, value: String },
    #[error("`KUBEDASH_TIMEOUT_SECS` must be greater than zero")]
    ZeroTimeout,
    #[error(
        "refusing to listen on non-loopback address {0} without `KUBEDASH_AUTH_TOKEN`"
    )]
    UnauthenticatedRemoteBind(SocketAddr),
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Build the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

        let listen_addr = match get("KUBEDASH_LISTEN_ADDR") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidVar {
                    var: "KUBEDASH_LISTEN_ADDR",
                    value,
                })?,
            None => DEFAULT_LISTEN_ADDR,
        };

        let kubectl = get("KUBEDASH_KUBECTL").unwrap_or_else(|| DEFAULT_KUBECTL.to_string());

        let mode = match get("KUBEDASH_MODE") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidVar {
                var: "KUBEDASH_MODE",
                value,
            })?,
            None => ExecutionMode::default(),
        };

        let timeout_secs = match get("KUBEDASH_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidVar {
                    var: "KUBEDASH_TIMEOUT_SECS",
                    value,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let auth_token = get("KUBEDASH_AUTH_TOKEN").map(SecretString::from);

        let config = Self {
            listen_addr,
            kubectl,
            mode,
            command_timeout: Duration::from_secs(timeout_secs),
            auth_token,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.listen_addr.ip().is_loopback() && self.auth_token.is_none() {
            return Err(ConfigError::UnauthenticatedRemoteBind(self.listen_addr));
        }
        Ok(())
    }
}
