//! HTTP client for the gateway dashboard API
//!
//! Wraps reqwest::Client with the configured base URL and status checking.

use thiserror::Error;
use url::Url;

use crate::config::Config;

/// Errors from a dashboard API request.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid server URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("malformed response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Client bound to one gateway dashboard.
pub struct GatewayClient {
    http: reqwest::Client,
    base: Url,
}

impl GatewayClient {
    /// Build a client from config. Fails only on an unparseable server URL
    /// or TLS backend initialization.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let base = Url::parse(&config.server_url).map_err(|source| FetchError::InvalidUrl {
            url: config.server_url.clone(),
            source,
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| FetchError::Transport {
            url: base.to_string(),
            source,
        })?;

        Ok(Self { http, base })
    }

    /// Absolute URL for an API path such as `/api/incoming/`.
    pub fn url(&self, path: &str) -> Result<Url, FetchError> {
        self.base.join(path).map_err(|source| FetchError::InvalidUrl {
            url: format!("{}{}", self.base, path),
            source,
        })
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str) -> Result<T, FetchError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = self.url(path)?;
        tracing::debug!("GET {}", url);

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let resp = check_response(resp, &url).await?;

        // Read as text first so decode errors carry serde's position info.
        let text = resp.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Check HTTP response status code and return a clear error on failure.
async fn check_response(
    resp: reqwest::Response,
    url: &Url,
) -> Result<reqwest::Response, FetchError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(resp)
}
