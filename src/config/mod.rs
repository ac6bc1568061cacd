//! Configuration types for the citbbs client.

use crate::auth::AuthMethod;
use crate::errors::{CitbbsError, CitbbsErrorKind, CitbbsResult};
use std::time::Duration;

/// Default citbbs API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.planetscale.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "integrations-citbbs/0.1.0";

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,
    /// Idle connection timeout.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 20,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Citbbs client configuration.
#[derive(Debug, Clone)]
pub struct CitbbsConfig {
    /// API base URL.
    pub base_url: String,
    /// Authentication method.
    pub auth: Option<AuthMethod>,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Connection pool configuration.
    pub pool: PoolConfig,
}

impl Default for CitbbsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            pool: PoolConfig::default(),
        }
    }
}

impl CitbbsConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> CitbbsConfigBuilder {
        CitbbsConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CITBBS_TOKEN`: access token, or
    /// - `CITBBS_SERVICE_TOKEN_ID` and `CITBBS_SERVICE_TOKEN`: service token
    /// - `CITBBS_BASE_URL` (optional): custom base URL
    /// - `CITBBS_TIMEOUT` (optional): request timeout in seconds
    pub fn from_env() -> CitbbsResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CitbbsResult<Self> {
        let auth = match (
            lookup("CITBBS_TOKEN"),
            lookup("CITBBS_SERVICE_TOKEN_ID"),
            lookup("CITBBS_SERVICE_TOKEN"),
        ) {
            (Some(token), _, _) => AuthMethod::access_token(token),
            (None, Some(id), Some(token)) => AuthMethod::service_token(id, token),
            _ => {
                return Err(CitbbsError::new(
                    CitbbsErrorKind::MissingAuth,
                    "CITBBS_TOKEN or CITBBS_SERVICE_TOKEN_ID/CITBBS_SERVICE_TOKEN must be set",
                ))
            }
        };

        let mut builder = CitbbsConfigBuilder::new().auth(auth);

        if let Some(base_url) = lookup("CITBBS_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Some(timeout) = lookup("CITBBS_TIMEOUT") {
            let secs = timeout.parse::<u64>().map_err(|e| {
                CitbbsError::configuration(format!("Invalid CITBBS_TIMEOUT: {}", e))
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CitbbsResult<()> {
        if self.base_url.is_empty() {
            return Err(CitbbsError::new(
                CitbbsErrorKind::InvalidBaseUrl,
                "Base URL cannot be empty",
            ));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(CitbbsError::new(
                CitbbsErrorKind::InvalidBaseUrl,
                "Base URL must start with http:// or https://",
            ));
        }

        if self.user_agent.is_empty() {
            return Err(CitbbsError::configuration("User-Agent cannot be empty"));
        }

        Ok(())
    }
}

/// Builder for CitbbsConfig.
#[derive(Debug, Default)]
pub struct CitbbsConfigBuilder {
    base_url: Option<String>,
    auth: Option<AuthMethod>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    pool: Option<PoolConfig>,
}

impl CitbbsConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the connection pool configuration.
    pub fn pool(mut self, config: PoolConfig) -> Self {
        self.pool = Some(config);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CitbbsResult<CitbbsConfig> {
        let config = CitbbsConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            auth: self.auth,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            pool: self.pool.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
