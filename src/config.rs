use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value `{value}`")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// | Env Var              | Default                 |
/// |----------------------|-------------------------|
/// | `HOST`               | `0.0.0.0`               |
/// | `PORT`               | `4000`                  |
/// | `DATABASE_URL`       | `sqlite://todo.db`      |
/// | `DB_MAX_CONNECTIONS` | `10`                    |
/// | `CORS_ORIGINS`       | `http://localhost:3000` |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    /// Parsed from the comma-separated `CORS_ORIGINS` variable.
    pub cors_origins: Vec<HeaderValue>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let host = parse("HOST", var("HOST", "0.0.0.0"))?;
        let port = parse("PORT", var("PORT", "4000"))?;
        let database_url = var("DATABASE_URL", "sqlite://todo.db");
        let max_connections = parse("DB_MAX_CONNECTIONS", var("DB_MAX_CONNECTIONS", "10"))?;

        let cors_origins = var("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|_| ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            host,
            port,
            database_url,
            max_connections,
            cors_origins,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
