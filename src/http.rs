//! Thin HTTP layer over reqwest
//!
//! All network access of a conversion goes through [`HttpClient`] so that the
//! User-Agent, timeout and status handling are applied uniformly. There is no
//! retry: the first failure is returned to the caller.

use crate::config::HttpConfig;
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// A fetched binary body along with the metadata needed to name it on disk
#[derive(Debug)]
pub struct Download {
    /// Response body
    pub bytes: Vec<u8>,
    /// `Content-Type` header value without parameters, if any
    pub content_type: Option<String>,
}

/// HTTP client shared by the resolver, the post fetcher and the image downloader
#[derive(Clone, Debug)]
pub struct HttpClient {
    inner: reqwest::Client,
}

impl HttpClient {
    /// Build a client from the HTTP settings
    ///
    /// # Errors
    /// Returns error if the underlying client cannot be created (TLS backend
    /// initialization failure)
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder
            .build()
            .map_err(|e| Error::config("http", format!("failed to create HTTP client: {e}")))?;
        Ok(Self { inner })
    }

    /// Fetch `url` and return the body as text
    pub async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;
        Ok(response.text().await?)
    }

    /// Fetch `url` and deserialize the JSON body
    ///
    /// The body is read as text first so malformed JSON surfaces as
    /// [`Error::Serialization`] rather than a transport error.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.get_text(url).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch `url` as raw bytes
    pub async fn get_bytes(&self, url: &str) -> Result<Download> {
        let response = self.send(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty());
        let bytes = response.bytes().await?.to_vec();
        Ok(Download {
            bytes,
            content_type,
        })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        debug!(url, "GET");
        let response = self.inner.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}
