use anyhow::{Context, Result};
use log::warn;
use std::env;

const DEFAULT_JWT_SECRET: &str = "studysync_dev_secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
}

impl AppConfig {
    /// Reads the service configuration from the environment. Call
    /// `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using the development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:studysync.db?mode=rwc".to_string()),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 5)?,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 5000)?,
            jwt_secret,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

/// Parses an optional environment variable, falling back to `default` when unset.
pub fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
