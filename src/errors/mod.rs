//! Error types for the citbbs client.

use std::fmt;
use thiserror::Error;

/// Result type alias for citbbs operations.
pub type CitbbsResult<T> = Result<T, CitbbsError>;

/// Error kinds for categorizing citbbs errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitbbsErrorKind {
    // Configuration errors
    /// Missing authentication configuration.
    MissingAuth,
    /// Invalid base URL.
    InvalidBaseUrl,
    /// Invalid configuration.
    InvalidConfiguration,

    // Request errors
    /// Request could not be built from the given parameters.
    InvalidParameter,
    /// Request validation failed (400).
    ValidationError,
    /// Unprocessable entity (422).
    UnprocessableEntity,

    // Authentication / authorization errors
    /// Missing or invalid credentials (401).
    Unauthorized,
    /// Access forbidden (403).
    Forbidden,

    // Resource errors
    /// Resource not found (404).
    NotFound,
    /// Resource conflict (409).
    Conflict,

    /// Too many requests (429).
    RateLimited,

    // Network errors
    /// Connection failed.
    ConnectionFailed,
    /// Request timeout.
    Timeout,

    // Server errors
    /// Internal server error (500).
    InternalError,
    /// Bad gateway (502).
    BadGateway,
    /// Service unavailable (503).
    ServiceUnavailable,

    /// Failed to deserialize response.
    DeserializationError,

    /// Unknown error.
    Unknown,
}

impl fmt::Display for CitbbsErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAuth => write!(f, "missing_auth"),
            Self::InvalidBaseUrl => write!(f, "invalid_base_url"),
            Self::InvalidConfiguration => write!(f, "invalid_configuration"),
            Self::InvalidParameter => write!(f, "invalid_parameter"),
            Self::ValidationError => write!(f, "validation_error"),
            Self::UnprocessableEntity => write!(f, "unprocessable_entity"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
            Self::NotFound => write!(f, "not_found"),
            Self::Conflict => write!(f, "conflict"),
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::InternalError => write!(f, "internal_error"),
            Self::BadGateway => write!(f, "bad_gateway"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::DeserializationError => write!(f, "deserialization_error"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
}

/// Citbbs API error with detailed information.
#[derive(Error, Debug)]
pub struct CitbbsError {
    kind: CitbbsErrorKind,
    message: String,
    /// Context messages, outermost first.
    context: Vec<String>,
    status_code: Option<u16>,
    /// API error code from the response body.
    code: Option<String>,
    request_id: Option<String>,
    #[source]
    cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CitbbsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ", self.kind)?;
        for ctx in &self.context {
            write!(f, "{}: ", ctx)?;
        }
        write!(f, "{}", self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        if let Some(ref id) = self.request_id {
            write!(f, " [request_id: {}]", id)?;
        }
        Ok(())
    }
}

impl CitbbsError {
    /// Creates a new error.
    pub fn new(kind: CitbbsErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::new(),
            status_code: None,
            code: None,
            request_id: None,
            cause: None,
        }
    }

    /// Sets the HTTP status code.
    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    /// Sets the API error code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Sets the request ID.
    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_cause(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Wraps the error with a context message.
    ///
    /// The kind is preserved; the message renders as `"{context}: {message}"`.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.insert(0, context.into());
        self
    }

    /// Gets the error kind.
    pub fn kind(&self) -> &CitbbsErrorKind {
        &self.kind
    }

    /// Gets the error message, without context.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Gets the context messages, outermost first.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    /// Gets the HTTP status code.
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// Gets the API error code.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Gets the request ID.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns true if the error is transient.
    ///
    /// The client never retries on its own; this is for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind,
            CitbbsErrorKind::RateLimited
                | CitbbsErrorKind::ConnectionFailed
                | CitbbsErrorKind::Timeout
                | CitbbsErrorKind::InternalError
                | CitbbsErrorKind::BadGateway
                | CitbbsErrorKind::ServiceUnavailable
        )
    }

    /// Creates an error from an HTTP status and an optional API error body.
    pub fn from_response(
        status: u16,
        body: Option<ApiErrorResponse>,
        request_id: Option<String>,
    ) -> Self {
        let kind = Self::kind_from_status(status);
        let (message, code) = match body {
            Some(body) if !body.message.is_empty() => (body.message, body.code),
            Some(body) => (format!("HTTP {} error", status), body.code),
            None => (format!("HTTP {} error", status), None),
        };

        let mut error = Self::new(kind, message).with_status(status);
        if let Some(code) = code {
            error = error.with_code(code);
        }
        if let Some(id) = request_id {
            error = error.with_request_id(id);
        }
        error
    }

    fn kind_from_status(status: u16) -> CitbbsErrorKind {
        match status {
            400 => CitbbsErrorKind::ValidationError,
            401 => CitbbsErrorKind::Unauthorized,
            403 => CitbbsErrorKind::Forbidden,
            404 => CitbbsErrorKind::NotFound,
            409 => CitbbsErrorKind::Conflict,
            422 => CitbbsErrorKind::UnprocessableEntity,
            429 => CitbbsErrorKind::RateLimited,
            500 => CitbbsErrorKind::InternalError,
            502 => CitbbsErrorKind::BadGateway,
            503 => CitbbsErrorKind::ServiceUnavailable,
            _ => CitbbsErrorKind::Unknown,
        }
    }

    // Convenience constructors

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(CitbbsErrorKind::InvalidConfiguration, message)
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(CitbbsErrorKind::InvalidParameter, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(CitbbsErrorKind::Timeout, message)
    }

    /// Creates a deserialization error.
    pub fn deserialization(message: impl Into<String>) -> Self {
        Self::new(CitbbsErrorKind::DeserializationError, message)
    }
}

impl From<reqwest::Error> for CitbbsError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            CitbbsErrorKind::Timeout
        } else if e.is_connect() {
            CitbbsErrorKind::ConnectionFailed
        } else if e.is_decode() {
            CitbbsErrorKind::DeserializationError
        } else {
            CitbbsErrorKind::Unknown
        };
        let message = format!("Request failed: {}", e);
        Self::new(kind, message).with_cause(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = CitbbsError::new(CitbbsErrorKind::NotFound, "user not found")
            .with_status(404)
            .with_request_id("abc123");

        let display = format!("{}", error);
        assert!(display.contains("not_found"));
        assert!(display.contains("user not found"));
        assert!(display.contains("404"));
        assert!(display.contains("abc123"));
    }

    #[test]
    fn test_with_context_wraps_message() {
        let error = CitbbsError::invalid_parameter("key must be a string")
            .with_context("error creating request for create user");

        assert_eq!(*error.kind(), CitbbsErrorKind::InvalidParameter);
        assert_eq!(error.message(), "key must be a string");
        assert_eq!(
            error.to_string(),
            "[invalid_parameter] error creating request for create user: key must be a string"
        );
    }

    #[test]
    fn test_nested_context_order() {
        let error = CitbbsError::configuration("bad")
            .with_context("inner")
            .with_context("outer");

        assert_eq!(error.context(), &["outer".to_string(), "inner".to_string()]);
        assert!(error.to_string().contains("outer: inner: bad"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(CitbbsError::timeout("timeout").is_retryable());
        assert!(!CitbbsError::new(CitbbsErrorKind::NotFound, "gone").is_retryable());
    }

    #[test]
    fn test_from_response_with_body() {
        let body = ApiErrorResponse {
            code: Some("not_found".to_string()),
            message: "Not Found".to_string(),
        };
        let error = CitbbsError::from_response(404, Some(body), Some("req-123".to_string()));

        assert_eq!(*error.kind(), CitbbsErrorKind::NotFound);
        assert_eq!(error.status_code(), Some(404));
        assert_eq!(error.code(), Some("not_found"));
        assert_eq!(error.message(), "Not Found");
        assert_eq!(error.request_id(), Some("req-123"));
    }

    #[test]
    fn test_from_response_without_body() {
        let error = CitbbsError::from_response(418, None, None);

        assert_eq!(*error.kind(), CitbbsErrorKind::Unknown);
        assert_eq!(error.message(), "HTTP 418 error");
        assert!(error.code().is_none());
    }

    #[test]
    fn test_from_response_code_without_message() {
        let body: ApiErrorResponse = serde_json::from_str(r#"{"code":"not_found"}"#).unwrap();
        let error = CitbbsError::from_response(404, Some(body), None);

        assert_eq!(*error.kind(), CitbbsErrorKind::NotFound);
        assert_eq!(error.code(), Some("not_found"));
        assert_eq!(error.message(), "HTTP 404 error");
    }
}
