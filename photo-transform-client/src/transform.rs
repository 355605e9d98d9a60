//! 变换提交：`create_body` → POST/PUT → 处理响应

use photo_transform_core::PhotoTransform;

use crate::client::PhotoClient;
use crate::error::ClientResult;
use crate::http_client::HttpRequest;
use crate::response::{FieldErrorSink, Flow, handle_errors};
use crate::types::{Outcome, ResponseEnvelope, SuccessKey};

/// Navigation target when the server redirects without a URL.
const FALLBACK_REDIRECT: &str = "/";

/// Where and how a transform is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTarget {
    /// Form action, absolute or relative to the base URI.
    pub action: String,
    /// The photo already has a transformed version; sent as `PUT`.
    pub is_update: bool,
}

impl SubmitTarget {
    pub fn create(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            is_update: false,
        }
    }

    pub fn update(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            is_update: true,
        }
    }
}

impl PhotoClient {
    /// Submits the encoded form of `engine`.
    ///
    /// On a non-redirect answer the submitted body becomes the engine's stored
    /// transform data. Any failure alerts the error and reloads.
    pub async fn submit_transform(
        &self,
        engine: &mut PhotoTransform,
        target: &SubmitTarget,
        sink: &mut dyn FieldErrorSink,
    ) -> Outcome {
        sink.clear_errors();
        let mut flow = Flow::default();
        if let Err(e) = self.submit_inner(engine, target, sink, &mut flow).await {
            flow.fail("transform", &e);
        }
        flow.finish(Some(FALLBACK_REDIRECT))
    }

    async fn submit_inner(
        &self,
        engine: &mut PhotoTransform,
        target: &SubmitTarget,
        sink: &mut dyn FieldErrorSink,
        flow: &mut Flow,
    ) -> ClientResult<()> {
        let body = engine.create_body()?;
        let json = serde_json::to_value(&body)?;
        let url = self.resolve(&target.action)?;
        let request = if target.is_update {
            HttpRequest::put(url, Some(json))
        } else {
            HttpRequest::post(url, Some(json))
        };

        let reply = self.send(request).await?;
        if reply.redirected {
            flow.follow_redirect(&reply);
            return Ok(());
        }

        let detail = reply.json::<ResponseEnvelope>()?.detail;
        engine.set_trans_data(body);

        if let Some(errors) = detail.errors {
            handle_errors(&errors, sink, &mut flow.alerts);
        } else if let Some(success) = detail.success {
            for entry in success {
                match SuccessKey::parse(&entry.key) {
                    SuccessKey::Redirect => flow.redirect = Some(entry.text()),
                    SuccessKey::Message => flow.alerts.push(format!("Message: {}", entry.text())),
                    SuccessKey::Reload => flow.reload = true,
                    SuccessKey::FileUrl if target.is_update => flow.file_url = Some(entry.text()),
                    SuccessKey::QrUrl if target.is_update => flow.qr_url = Some(entry.text()),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
