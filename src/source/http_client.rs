use crate::config::ProviderConfig;
use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Thin reqwest wrapper. One request per call, no retry.
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            // Yahoo sets consent cookies on the first response
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { inner })
    }

    /// GET a URL and return status + body; non-2xx is not an error here so
    /// callers can read the provider's own error payload.
    pub async fn get_text(&self, url: &url::Url) -> Result<HttpResponse> {
        debug!("GET {}", url);

        let resp = self
            .inner
            .get(url.as_str())
            .send()
            .await
            .with_context(|| format!("Request error for {}", url))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("Failed to read response body")?;

        debug!("{} → {} ({} bytes)", url, status, body.len());
        Ok(HttpResponse { status, body })
    }
}
