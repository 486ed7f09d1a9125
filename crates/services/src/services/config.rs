use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

use executors::executors::DEFAULT_COMMAND_TIMEOUT;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings for the installer server, read from the environment.
///
/// | variable | default |
/// |---|---|
/// | `HOST` | `0.0.0.0` |
/// | `PORT` | `3001` |
/// | `INSTALLER_DATA_DIR` | current directory |
/// | `COMMAND_TIMEOUT_SECS` | `30` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub command_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            data_dir: PathBuf::from("."),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.host = host.parse().map_err(|_| ConfigError::InvalidValue {
                key: "HOST",
                value: host.clone(),
            })?;
        }

        if let Some(port) = lookup("PORT") {
            config.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port.clone(),
            })?;
        }

        if let Some(dir) = lookup("INSTALLER_DATA_DIR").filter(|dir| !dir.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(secs) = lookup("COMMAND_TIMEOUT_SECS") {
            let parsed = secs
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "COMMAND_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            config.command_timeout = Duration::from_secs(parsed);
        }

        Ok(config)
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.data_dir.join("templates")
    }

    pub fn shortcuts_path(&self) -> PathBuf {
        self.data_dir.join("configs").join("shortcuts.json")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address().to_string(), "0.0.0.0:3001");
        assert_eq!(config.command_timeout, Duration::from_secs(30));
        assert_eq!(config.templates_dir(), PathBuf::from("./templates"));
        assert_eq!(
            config.shortcuts_path(),
            PathBuf::from("./configs/shortcuts.json")
        );
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("INSTALLER_DATA_DIR", "/srv/installer"),
            ("COMMAND_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address().to_string(), "127.0.0.1:8080");
        assert_eq!(config.data_dir, PathBuf::from("/srv/installer"));
        assert_eq!(config.command_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for (key, value) in [
            ("PORT", "not-a-port"),
            ("HOST", "localhost:3001"),
            ("COMMAND_TIMEOUT_SECS", "0"),
        ] {
            let err = ServerConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { key: k, .. } if k == key));
        }
    }
}
