//! Configuration for the bookshelf daemon.
//!
//! Each setting is taken from the command line first, then from the environment, then from a
//! built-in default:
//!
//! | Setting        | Flag             | Environment      | Default     |
//! |----------------|------------------|------------------|-------------|
//! | host           | `--host`         | `BOOKSHELF_HOST` | `127.0.0.1` |
//! | port           | `--port`         | `PORT`           | `3000`      |
//! | database URL   | `--database-url` | `DATABASE_URL`   | none        |
//!
//! Without a database URL the daemon serves from the in-memory store.

use thiserror::Error;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 3000;

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `PORT` was set to something that is not a port number.
    #[error("invalid port {value:?} in {variable}")]
    InvalidPort { variable: &'static str, value: String },
}

/// Settings given explicitly on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
    pub verbose: bool,
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub verbose: bool,
}

impl ServerConfig {
    /// Resolves `overrides` against the process environment.
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, |name| std::env::var(name).ok())
    }

    /// Resolves `overrides` against the variables `env` returns. Empty values count as unset.
    pub fn resolve(
        overrides: ConfigOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

        let host = overrides
            .host
            .or_else(|| lookup("BOOKSHELF_HOST"))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match overrides.port {
            Some(port) => port,
            None => match lookup("PORT") {
                Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidPort {
                    variable: "PORT",
                    value,
                })?,
                None => DEFAULT_PORT,
            },
        };

        let database_url = overrides.database_url.or_else(|| lookup("DATABASE_URL"));

        Ok(Self {
            host,
            port,
            database_url,
            verbose: overrides.verbose,
        })
    }

    /// `host:port`, suitable for binding a listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
