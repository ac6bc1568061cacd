//! HTTP transport implementation using reqwest.

use async_trait::async_trait;
use std::collections::HashMap;

use super::{HttpRequest, HttpResponse, HttpTransport};
use crate::config::CitbbsConfig;
use crate::errors::{CitbbsError, CitbbsErrorKind, CitbbsResult};

/// Reqwest-based HTTP transport implementation.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport from client configuration.
    pub fn new(config: &CitbbsConfig) -> CitbbsResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .build()
            .map_err(|e| {
                CitbbsError::new(
                    CitbbsErrorKind::InvalidConfiguration,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self { client })
    }

    /// Converts response headers to a HashMap.
    fn extract_headers(headers: &reqwest::header::HeaderMap) -> HashMap<String, String> {
        headers
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|val| (k.as_str().to_string(), val.to_string()))
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> CitbbsResult<HttpResponse> {
        let mut builder = self.client.request(request.method.into(), &request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = Self::extract_headers(response.headers());
        let body = response.bytes().await?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
