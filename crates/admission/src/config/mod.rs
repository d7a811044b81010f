use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the admission service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub paging: PagingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "7077".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = LogFormat::from_str(
            &env::var("APP_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string()),
        );

        let paging = PagingConfig {
            default_limit: parse_page_size("APP_DEFAULT_PAGE_SIZE", PagingConfig::DEFAULT_LIMIT)?,
            max_limit: parse_page_size("APP_MAX_PAGE_SIZE", PagingConfig::MAX_LIMIT)?,
        };

        if paging.default_limit > paging.max_limit {
            return Err(ConfigError::PageSizeOrdering);
        }

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            paging,
        })
    }
}

fn parse_page_size(var: &'static str, fallback: usize) -> Result<usize, ConfigError> {
    let raw = match env::var(var) {
        Ok(raw) => raw,
        Err(_) => return Ok(fallback),
    };

    match raw.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::InvalidPageSize { var }),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Console log rendering. `full` keeps one field per line for local digging;
/// `compact` is the deploy default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
}

impl LogFormat {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Self::Full,
            _ => Self::Compact,
        }
    }
}

/// Bounds for paginated application listings.
#[derive(Debug, Clone, Copy)]
pub struct PagingConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl PagingConfig {
    const DEFAULT_LIMIT: usize = 10;
    const MAX_LIMIT: usize = 100;
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_limit: Self::DEFAULT_LIMIT,
            max_limit: Self::MAX_LIMIT,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPageSize { var: &'static str },
    PageSizeOrdering,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPageSize { var } => {
                write!(f, "{var} must be a positive integer")
            }
            ConfigError::PageSizeOrdering => {
                write!(f, "APP_DEFAULT_PAGE_SIZE must not exceed APP_MAX_PAGE_SIZE")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
