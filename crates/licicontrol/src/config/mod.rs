use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

const DEFAULT_GATEWAY_URL: &str = "https://ai.gateway.lovable.dev/v1";
const DEFAULT_GATEWAY_MODEL: &str = "google/gemini-2.5-flash";
const DEFAULT_PNCP_URL: &str = "https://pncp.gov.br/api/consulta/v1";

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub gateway: GatewayConfig,
    pub supabase: Option<SupabaseConfig>,
    pub pncp: PncpConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            gateway: GatewayConfig::from_env()?,
            supabase: SupabaseConfig::from_env()?,
            pncp: PncpConfig {
                base_url: non_empty_var("PNCP_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_PNCP_URL.to_string()),
            },
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
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
}

/// Chat-completion gateway used by every AI-assisted workflow.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl GatewayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match non_empty_var("AI_GATEWAY_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidGatewayTimeout)?,
            None => 60,
        };

        Ok(Self {
            base_url: non_empty_var("AI_GATEWAY_URL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            api_key: non_empty_var("AI_GATEWAY_API_KEY"),
            model: non_empty_var("AI_GATEWAY_MODEL")
                .unwrap_or_else(|| DEFAULT_GATEWAY_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: None,
            model: DEFAULT_GATEWAY_MODEL.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Supabase project credentials. Absent configuration selects the in-memory store.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub api_key: String,
}

impl SupabaseConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        match (non_empty_var("SUPABASE_URL"), non_empty_var("SUPABASE_KEY")) {
            (Some(url), Some(api_key)) => Ok(Some(Self { url, api_key })),
            (None, None) => Ok(None),
            _ => Err(ConfigError::IncompleteSupabase),
        }
    }
}

/// National Public Procurement Portal endpoint.
#[derive(Debug, Clone)]
pub struct PncpConfig {
    pub base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must parse to an IPv4 or IPv6 address")]
    InvalidHost {
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("AI_GATEWAY_TIMEOUT_SECS must be a positive integer")]
    InvalidGatewayTimeout,
    #[error("SUPABASE_URL and SUPABASE_KEY must be set together")]
    IncompleteSupabase,
}
