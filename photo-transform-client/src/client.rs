//! 客户端上下文：传输层 + 页面基址

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::http_client::{HttpReply, HttpRequest, ReqwestTransport, Transport};

/// Submitted form fields in form order.
pub type FormFields = IndexMap<String, String>;

/// Entry point of the form handlers.
///
/// Every handler issues at most one request and never retries.
#[derive(Clone)]
pub struct PhotoClient {
    transport: Arc<dyn Transport>,
    base: Url,
}

impl PhotoClient {
    pub fn new(transport: Arc<dyn Transport>, base: Url) -> Self {
        Self { transport, base }
    }

    /// Client with a [`ReqwestTransport`] built from `config`.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config.base_url()?))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolves a form action or endpoint path against the base URI.
    pub fn resolve(&self, path: &str) -> ClientResult<String> {
        self.base
            .join(path)
            .map(String::from)
            .map_err(|e| ClientError::Config(format!("invalid URL '{path}': {e}")))
    }

    /// Sends `request` and rejects non-2xx replies.
    pub(crate) async fn send(&self, request: HttpRequest) -> ClientResult<HttpReply> {
        self.transport.execute(request).await?.error_for_status()
    }
}

/// JSON object of the form fields.
pub(crate) fn form_body(fields: &FormFields) -> Value {
    Value::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect(),
    )
}
