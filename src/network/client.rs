//! HTTP client for talking to the search service and the drafts API

use super::request::{ApiRequest, ApiResponse, HttpMethod};
use crate::config::OutgoingSettings;
use crate::error::FetchError;
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use std::time::Duration;

/// HTTP client wrapper with service-wide defaults
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    extra_headers: Vec<(String, String)>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let default_timeout = Duration::try_from_secs_f64(settings.request_timeout)
            .with_context(|| format!("invalid request_timeout {}", settings.request_timeout))?;

        let mut builder = Client::builder()
            .timeout(default_timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .user_agent(format!("doclist-rs/{}", crate::VERSION))
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        let mut extra_headers: Vec<(String, String)> = settings
            .extra_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        extra_headers.sort();

        Ok(Self {
            client,
            default_timeout,
            extra_headers,
        })
    }

    /// Configured per-request timeout
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Execute a request with the default timeout
    pub async fn execute(&self, request: ApiRequest) -> std::result::Result<ApiResponse, FetchError> {
        self.execute_with_timeout(request, self.default_timeout).await
    }

    /// Execute a request with custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: ApiRequest,
        timeout: Duration,
    ) -> std::result::Result<ApiResponse, FetchError> {
        let url = request.full_url();
        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        };

        req_builder = req_builder
            .timeout(timeout)
            .header("Accept", "application/json");

        for (key, value) in &self.extra_headers {
            req_builder = req_builder.header(key, value);
        }
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if let Some(json) = request.json {
            req_builder = req_builder.json(&json);
        }

        let response = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout(timeout)
            } else {
                FetchError::Network(e)
            }
        })?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: Response) -> std::result::Result<ApiResponse, FetchError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let text = response.text().await?;

        Ok(ApiResponse { status, text, url })
    }
}
