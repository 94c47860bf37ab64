//! Service configuration.

/// Default base URL of the Estonian business registry autocomplete API.
pub const DEFAULT_REGISTRY_API_URL: &str = "https://ariregister.rik.ee/est/api";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// PostgreSQL connection string.
    pub database_url: String,

    /// Shared secret for validating HS256 bearer tokens.
    pub auth_secret: String,

    /// Expected JWT audience (default: "arvekit").
    pub auth_audience: String,

    /// Base URL of the business registry autocomplete API.
    pub registry_api_url: String,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/arvekit".into()),
            auth_secret: std::env::var("AUTH_SECRET").unwrap_or_else(|_| "dev-secret".into()),
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "arvekit".into()),
            registry_api_url: std::env::var("REGISTRY_API_URL")
                .unwrap_or_else(|_| DEFAULT_REGISTRY_API_URL.into()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024), // 1MB
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_url: "postgres://localhost/arvekit".into(),
            auth_secret: "dev-secret".into(),
            auth_audience: "arvekit".into(),
            registry_api_url: DEFAULT_REGISTRY_API_URL.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
