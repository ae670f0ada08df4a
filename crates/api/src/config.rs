use std::env;
use std::str::FromStr;

use dashboard_core::listing::GlobalDashboards;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Server host to bind to.
    pub host: String,
    /// Server port to bind to.
    pub port: u16,
    /// PostgreSQL connection URL.
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// HS256 secret used to read caller identities.
    pub jwt_secret: String,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
    /// Default page size for dashboard listings.
    pub per_page: usize,
    /// List only the caller's own dashboards.
    pub filter_users: bool,
    pub global: GlobalDashboards,
    /// When false every write operation is denied.
    pub allow_write: bool,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            host: text("HOST", "0.0.0.0"),
            port: parse_var(&lookup, "PORT", 3030)?,
            database_url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            db_max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            db_min_connections: parse_var(&lookup, "DB_MIN_CONNECTIONS", 5)?,
            jwt_secret: text("JWT_SECRET", "dev-secret-change-me-in-production"),
            log_level: text("LOG_LEVEL", "info"),
            per_page: parse_var(&lookup, "DASHBOARD_PER_PAGE", 25)?,
            filter_users: parse_var(&lookup, "DASHBOARD_FILTER_USERS", false)?,
            global: GlobalDashboards {
                enabled: parse_var(&lookup, "DASHBOARD_GLOBAL", false)?,
                user: text("DASHBOARD_GLOBAL_USER", "global"),
            },
            allow_write: parse_var(&lookup, "DASHBOARD_ALLOW_WRITE", true)?,
        })
    }

    /// Build the socket address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { name, value }),
        },
    }
}
