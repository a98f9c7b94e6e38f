use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use docforge_core::AppError;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_LOGO_MAX_BYTES: usize = 2 * 1024 * 1024;
const DEFAULT_SESSION_IDLE_TTL_SECONDS: u64 = 8 * 60 * 60;

/// Where document configs come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentConfigSourceConfig {
    /// The compiled-in letter catalog.
    Builtin,
    /// A remote config service.
    Http { base_url: Url },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub frontend_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub document_config_source: DocumentConfigSourceConfig,
    pub logo_url: Option<String>,
    pub logo_max_bytes: usize,
    pub http_timeout: Duration,
    pub session_idle_ttl: Duration,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned());

        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let document_config_source = match env::var("DOCUMENT_CONFIG_SOURCE")
            .unwrap_or_else(|_| "builtin".to_owned())
            .as_str()
        {
            "builtin" => DocumentConfigSourceConfig::Builtin,
            "http" => {
                let raw_url = required_non_empty_env("DOCUMENT_CONFIG_URL")?;
                let base_url = Url::parse(raw_url.as_str()).map_err(|error| {
                    AppError::Validation(format!("invalid DOCUMENT_CONFIG_URL: {error}"))
                })?;
                DocumentConfigSourceConfig::Http { base_url }
            }
            other => {
                return Err(AppError::Validation(format!(
                    "DOCUMENT_CONFIG_SOURCE must be either 'builtin' or 'http', got '{other}'"
                )));
            }
        };

        let logo_url = env::var("LOGO_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let logo_max_bytes =
            optional_parsed_env("LOGO_MAX_BYTES")?.unwrap_or(DEFAULT_LOGO_MAX_BYTES);
        let http_timeout_seconds: u64 = optional_parsed_env("HTTP_TIMEOUT_SECONDS")?.unwrap_or(10);
        if http_timeout_seconds == 0 {
            return Err(AppError::Validation(
                "HTTP_TIMEOUT_SECONDS must be greater than zero".to_owned(),
            ));
        }

        let session_idle_ttl_seconds: u64 = optional_parsed_env("SESSION_IDLE_TTL_SECONDS")?
            .unwrap_or(DEFAULT_SESSION_IDLE_TTL_SECONDS);
        if session_idle_ttl_seconds == 0 {
            return Err(AppError::Validation(
                "SESSION_IDLE_TTL_SECONDS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            frontend_url,
            api_host,
            api_port,
            document_config_source,
            logo_url,
            logo_max_bytes,
            http_timeout: Duration::from_secs(http_timeout_seconds),
            session_idle_ttl: Duration::from_secs(session_idle_ttl_seconds),
        })
    }

    /// How often idle sessions are swept.
    pub fn session_sweep_period(&self) -> Duration {
        (self.session_idle_ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(5 * 60))
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn optional_parsed_env<T>(name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|error| AppError::Validation(format!("invalid {name}: {error}"))),
        _ => Ok(None),
    }
}
