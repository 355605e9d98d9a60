//! HTTP transport
//!
//! Handlers talk to a [`Transport`] so the request/response flow can be tested
//! without a server. [`ReqwestTransport`] is the real implementation: a cookie
//! store keeps the session between login and later requests, redirects are
//! followed and reported.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::utils::log_sanitizer::{body_for_log, reply_for_log};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// JSON body; `None` sends an empty body without JSON headers.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            body,
        }
    }

    pub fn put(url: impl Into<String>, body: Option<serde_json::Value>) -> Self {
        Self {
            method: HttpMethod::Put,
            url: url.into(),
            body,
        }
    }
}

/// Response after redirects were followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// URL of the final response.
    pub url: String,
    /// At least one redirect was followed.
    pub redirected: bool,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turns a non-2xx reply into [`ClientError::HttpStatus`].
    pub fn error_for_status(self) -> ClientResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::HttpStatus {
                status: self.status,
                body: self.body,
            })
        }
    }

    /// Parses the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            log::error!("JSON parse failed: {e}");
            log::error!("Raw response: {}", reply_for_log(&self.body));
            ClientError::Parse(e.to_string())
        })
    }
}

/// Sends requests. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> ClientResult<HttpReply>;
}

/// [`Transport`] backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> ClientResult<HttpReply> {
        log::debug!("{} {}", request.method, request.url);

        let mut builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
        };
        if let Some(body) = &request.body {
            log::debug!("Request Body: {}", body_for_log(body));
            builder = builder
                .header(reqwest::header::ACCEPT, "application/json")
                .json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout(e.to_string())
            } else {
                ClientError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let url = response.url().to_string();
        let redirected = url != request.url;
        log::debug!("Response Status: {status}{}", if redirected { " (redirected)" } else { "" });

        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Network(format!("Failed to read response body: {e}")))?;
        log::debug!("Response Body: {}", reply_for_log(&body));

        Ok(HttpReply {
            status,
            url,
            redirected,
            body,
        })
    }
}
