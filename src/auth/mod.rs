//! Authentication for the citbbs API.

use secrecy::{ExposeSecret, SecretString};

/// Authentication method for the citbbs API.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// OAuth access token, sent as a bearer token.
    AccessToken(SecretString),
    /// Service token, sent as `{id}:{token}`.
    ServiceToken {
        /// Service token ID.
        id: String,
        /// Service token secret.
        token: SecretString,
    },
}

impl AuthMethod {
    /// Creates an access token authentication method.
    pub fn access_token(token: impl Into<String>) -> Self {
        Self::AccessToken(SecretString::new(token.into()))
    }

    /// Creates a service token authentication method.
    pub fn service_token(id: impl Into<String>, token: impl Into<String>) -> Self {
        Self::ServiceToken {
            id: id.into(),
            token: SecretString::new(token.into()),
        }
    }

    /// Generates the Authorization header value.
    pub fn header_value(&self) -> String {
        match self {
            Self::AccessToken(token) => format!("Bearer {}", token.expose_secret()),
            Self::ServiceToken { id, token } => format!("{}:{}", id, token.expose_secret()),
        }
    }

    /// Gets a redacted description for logging.
    pub fn redacted(&self) -> String {
        match self {
            Self::AccessToken(_) => "Bearer ***".to_string(),
            Self::ServiceToken { id, .. } => format!("{}:***", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_header() {
        let auth = AuthMethod::access_token("pscale_oauth_abc");
        assert_eq!(auth.header_value(), "Bearer pscale_oauth_abc");
    }

    #[test]
    fn test_service_token_header() {
        let auth = AuthMethod::service_token("svc-id", "svc-secret");
        assert_eq!(auth.header_value(), "svc-id:svc-secret");
    }

    #[test]
    fn test_redacted_hides_secret() {
        let auth = AuthMethod::service_token("svc-id", "svc-secret");
        let redacted = auth.redacted();
        assert!(!redacted.contains("svc-secret"));
        assert!(redacted.starts_with("svc-id"));

        let debug = format!("{:?}", AuthMethod::access_token("top-secret"));
        assert!(!debug.contains("top-secret"));
    }
}
