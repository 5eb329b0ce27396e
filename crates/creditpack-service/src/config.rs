//! Service configuration.

use creditpack_core::{ProductCatalog, ProductId};

/// Polar sandbox API base URL.
pub const POLAR_SANDBOX_API_URL: &str = "https://sandbox-api.polar.sh";

/// Polar production API base URL.
pub const POLAR_PRODUCTION_API_URL: &str = "https://api.polar.sh";

/// Which Polar environment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolarServer {
    /// Sandbox (test tokens, no real charges).
    #[default]
    Sandbox,
    /// Production.
    Production,
}

impl PolarServer {
    /// API base URL for this environment.
    #[must_use]
    pub const fn api_url(self) -> &'static str {
        match self {
            Self::Sandbox => POLAR_SANDBOX_API_URL,
            Self::Production => POLAR_PRODUCTION_API_URL,
        }
    }

    fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" => Self::Production,
            "sandbox" => Self::Sandbox,
            other => {
                tracing::warn!(value = %other, "Unknown POLAR_SERVER, using sandbox");
                Self::Sandbox
            }
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// PostgreSQL connection string. Unset means an in-memory store.
    pub database_url: Option<String>,

    /// Shared secret for validating bearer JWTs.
    pub auth_secret: Option<String>,

    /// Polar access token (optional).
    pub polar_access_token: Option<String>,

    /// Polar environment.
    pub polar_server: PolarServer,

    /// Explicit Polar API base URL; overrides `polar_server`.
    pub polar_api_url: Option<String>,

    /// Polar webhook signing secret (optional).
    pub polar_webhook_secret: Option<String>,

    /// Product ids for the three credit packs.
    pub catalog: ProductCatalog,

    /// Where Polar sends the customer after a successful checkout.
    pub success_url: String,

    /// Frontend URL used to resolve relative redirect URLs.
    pub frontend_url: String,

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
        let defaults = Self::default();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or(defaults.listen_addr),
            database_url: env_non_empty("DATABASE_URL"),
            auth_secret: env_non_empty("AUTH_SECRET"),
            polar_access_token: env_non_empty("POLAR_ACCESS_TOKEN"),
            polar_server: std::env::var("POLAR_SERVER")
                .map_or(defaults.polar_server, |v| PolarServer::from_env_value(&v)),
            polar_api_url: env_non_empty("POLAR_API_URL"),
            polar_webhook_secret: env_non_empty("POLAR_WEBHOOK_SECRET"),
            catalog: ProductCatalog::new(
                env_product_id("SMALL_PACK_PRODUCT_ID"),
                env_product_id("MEDIUM_PACK_PRODUCT_ID"),
                env_product_id("LARGE_PACK_PRODUCT_ID"),
            ),
            success_url: std::env::var("SUCCESS_URL").unwrap_or(defaults.success_url),
            frontend_url: std::env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| parse_origins(&s))
                .unwrap_or(defaults.cors_origins),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }

    /// The Polar API base URL in effect.
    #[must_use]
    pub fn polar_base_url(&self) -> &str {
        self.polar_api_url
            .as_deref()
            .unwrap_or_else(|| self.polar_server.api_url())
    }

    /// Absolute URL Polar redirects to after checkout.
    ///
    /// Relative `success_url`s are joined onto `frontend_url`, and a
    /// `checkout_id={CHECKOUT_ID}` parameter is appended for Polar to fill in.
    #[must_use]
    pub fn checkout_success_url(&self) -> String {
        let base = if self.success_url.starts_with("http://")
            || self.success_url.starts_with("https://")
        {
            self.success_url.clone()
        } else {
            format!(
                "{}/{}",
                self.frontend_url.trim_end_matches('/'),
                self.success_url.trim_start_matches('/')
            )
        };

        let separator = if base.contains('?') { '&' } else { '?' };
        format!("{base}{separator}checkout_id={{CHECKOUT_ID}}")
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            database_url: None,
            auth_secret: None,
            polar_access_token: None,
            polar_server: PolarServer::Sandbox,
            polar_api_url: None,
            polar_webhook_secret: None,
            catalog: ProductCatalog::default(),
            success_url: "/dashboard".into(),
            frontend_url: "http://localhost:3000".into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024, // 1MB
            request_timeout_seconds: 30,
        }
    }
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_product_id(key: &str) -> Option<ProductId> {
    let value = env_non_empty(key);
    if value.is_none() {
        tracing::warn!(variable = %key, "Product id not configured - pack cannot be sold");
    }
    value.and_then(|v| v.parse().ok())
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
