//! Citbbs API client implementation.

use crate::auth::AuthMethod;
use crate::config::{CitbbsConfig, CitbbsConfigBuilder};
use crate::errors::{ApiErrorResponse, CitbbsError, CitbbsErrorKind, CitbbsResult};
use crate::observability::{Metrics, RequestTimer, TracingHooks};
use crate::services::DefaultUsersService;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, Method, ReqwestTransport};
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Header carrying the client-generated request ID.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Citbbs API client.
///
/// Holds no per-call state; share it across tasks behind an `Arc`.
pub struct CitbbsClient {
    config: CitbbsConfig,
    auth: AuthMethod,
    transport: Arc<dyn HttpTransport>,
    metrics: Arc<Metrics>,
}

impl CitbbsClient {
    /// Creates a new client using the reqwest transport.
    pub fn new(config: CitbbsConfig) -> CitbbsResult<Self> {
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Self::with_transport(config, transport)
    }

    /// Creates a new client over a custom transport.
    pub fn with_transport(
        config: CitbbsConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> CitbbsResult<Self> {
        config.validate()?;

        let auth = config.auth.clone().ok_or_else(|| {
            CitbbsError::new(CitbbsErrorKind::MissingAuth, "Authentication required")
        })?;

        Ok(Self {
            config,
            auth,
            transport,
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Creates a client from environment variables.
    pub fn from_env() -> CitbbsResult<Self> {
        Self::new(CitbbsConfig::from_env()?)
    }

    /// Creates a new client builder.
    pub fn builder() -> CitbbsClientBuilder {
        CitbbsClientBuilder::new()
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Gets the configuration.
    pub fn config(&self) -> &CitbbsConfig {
        &self.config
    }

    /// Gets the request metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Gets the users service.
    pub fn users(&self) -> DefaultUsersService<'_> {
        DefaultUsersService::new(self)
    }

    /// Builds a request for `path`, relative to the base URL.
    ///
    /// `path` may carry a query string. The body, if any, is JSON encoded.
    pub fn new_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> CitbbsResult<HttpRequest> {
        let url = self.build_url(path)?;

        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| {
                CitbbsError::invalid_parameter(format!("Failed to serialize request body: {}", e))
                    .with_cause(e)
            })?
            .map(Bytes::from);

        let mut headers = HashMap::new();
        headers.insert("Authorization".to_string(), self.auth.header_value());
        headers.insert("User-Agent".to_string(), self.config.user_agent.clone());
        headers.insert("Accept".to_string(), "application/json".to_string());
        headers.insert(
            REQUEST_ID_HEADER.to_string(),
            uuid::Uuid::new_v4().to_string(),
        );
        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
        })
    }

    /// Sends a request and decodes the JSON response body into `T`.
    ///
    /// Non-2xx responses become typed errors; a body that does not decode
    /// into `T` is a deserialization error.
    pub async fn execute<T: DeserializeOwned>(&self, request: HttpRequest) -> CitbbsResult<T> {
        self.execute_with(request, Self::decode_response).await
    }

    /// Like [`execute`](Self::execute), but a 204, an empty body or a JSON
    /// `null` yields `None`.
    pub async fn execute_optional<T: DeserializeOwned>(
        &self,
        request: HttpRequest,
    ) -> CitbbsResult<Option<T>> {
        self.execute_with(request, Self::decode_optional_response).await
    }

    async fn execute_with<T>(
        &self,
        request: HttpRequest,
        decode: fn(&HttpResponse) -> CitbbsResult<T>,
    ) -> CitbbsResult<T> {
        let method = request.method;
        let url = request.url.clone();
        let request_id = request.header(REQUEST_ID_HEADER).unwrap_or_default().to_string();

        TracingHooks::on_request_start(method.as_str(), &url, &request_id);
        let timer = RequestTimer::new(self.metrics.clone());

        let result = match self.transport.send(request).await {
            Ok(response) => decode(&response).map(|value| (response.status, value)),
            Err(e) => Err(e),
        };

        match result {
            Ok((status, value)) => {
                let elapsed = timer.success();
                TracingHooks::on_request_complete(method.as_str(), &url, status, elapsed);
                Ok(value)
            }
            Err(e) => {
                timer.failure();
                TracingHooks::on_request_error(method.as_str(), &url, &e.to_string());
                Err(e)
            }
        }
    }

    fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> CitbbsResult<T> {
        if !response.is_success() {
            return Err(Self::handle_error_response(response));
        }

        serde_json::from_slice(&response.body).map_err(|e| {
            CitbbsError::deserialization(format!("Failed to deserialize response: {}", e))
                .with_status(response.status)
                .with_cause(e)
        })
    }

    fn decode_optional_response<T: DeserializeOwned>(
        response: &HttpResponse,
    ) -> CitbbsResult<Option<T>> {
        if response.is_success()
            && (response.status == 204 || response.body.iter().all(u8::is_ascii_whitespace))
        {
            return Ok(None);
        }

        Self::decode_response(response)
    }

    fn handle_error_response(response: &HttpResponse) -> CitbbsError {
        let body = serde_json::from_slice::<ApiErrorResponse>(&response.body).ok();
        let request_id = response.headers.get("x-request-id").cloned();
        CitbbsError::from_response(response.status, body, request_id)
    }

    fn build_url(&self, path: &str) -> CitbbsResult<String> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let url = format!("{}/{}", base, path);

        url::Url::parse(&url).map_err(|e| {
            CitbbsError::new(
                CitbbsErrorKind::InvalidBaseUrl,
                format!("Invalid request URL {}: {}", url, e),
            )
            .with_cause(e)
        })?;

        Ok(url)
    }
}

impl std::fmt::Debug for CitbbsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitbbsClient")
            .field("base_url", &self.config.base_url)
            .field("auth", &self.auth.redacted())
            .finish()
    }
}

/// Builder for CitbbsClient.
pub struct CitbbsClientBuilder {
    config_builder: CitbbsConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl CitbbsClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: CitbbsConfig::builder(),
            transport: None,
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.config_builder = self.config_builder.auth(auth);
        self
    }

    /// Sets an access token.
    pub fn access_token(self, token: impl Into<String>) -> Self {
        self.auth(AuthMethod::access_token(token))
    }

    /// Sets a service token.
    pub fn service_token(self, id: impl Into<String>, token: impl Into<String>) -> Self {
        self.auth(AuthMethod::service_token(id, token))
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Uses a custom transport instead of reqwest.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client.
    pub fn build(self) -> CitbbsResult<CitbbsClient> {
        let config = self.config_builder.build()?;
        match self.transport {
            Some(transport) => CitbbsClient::with_transport(config, transport),
            None => CitbbsClient::new(config),
        }
    }
}

impl Default for CitbbsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
