//! 响应结构与处理结果

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One `{key, value}` entry of a response detail list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Value as display text; `null` is empty, non-strings are rendered as JSON.
    pub fn text(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// `detail` object of every JSON response.
///
/// When `errors` is present, `success` is ignored, even if the list is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<Vec<KeyValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<KeyValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub detail: ResponseDetail,
}

/// Known success keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessKey {
    Redirect,
    Reload,
    Message,
    FileUrl,
    QrUrl,
    Other,
}

impl SuccessKey {
    pub fn parse(key: &str) -> Self {
        match key {
            "redirect" => Self::Redirect,
            "reload" => Self::Reload,
            "message" => Self::Message,
            "file_url" => Self::FileUrl,
            "qr_url" => Self::QrUrl,
            _ => Self::Other,
        }
    }
}

/// What the page should do once a handler returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageAction {
    #[default]
    Stay,
    Navigate(String),
    Reload,
}

/// Result of one form handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Messages to show the user, in order.
    pub alerts: Vec<String>,
    pub action: PageAction,
    /// New source of the transformed photo (updates only).
    pub file_url: Option<String>,
    /// New QR image source (updates only); empty hides the image.
    pub qr_url: Option<String>,
}
