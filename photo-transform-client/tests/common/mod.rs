//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use photo_transform_client::{
    ClientError, ClientResult, HttpReply, HttpRequest, PhotoClient, Transport,
};
use tokio::sync::Mutex;
use url::Url;

pub const BASE: &str = "http://photos.test/";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_server {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// Transport replaying canned replies and recording every request.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<ClientResult<HttpReply>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, reply: ClientResult<HttpReply>) {
        self.replies.lock().await.push_back(reply);
    }

    pub async fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> ClientResult<HttpReply> {
        self.requests.lock().await.push(request);
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::Network("no reply queued".to_string())))
    }
}

/// Client over a fresh mock transport.
pub fn client() -> (PhotoClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let base = Url::parse(BASE).unwrap_or_else(|e| panic!("bad test base: {e}"));
    (PhotoClient::new(transport.clone(), base), transport)
}

/// 200 reply at `url` with a JSON body.
pub fn json_reply(url: &str, body: &str) -> ClientResult<HttpReply> {
    Ok(HttpReply {
        status: 200,
        url: url.to_string(),
        redirected: false,
        body: body.to_string(),
    })
}

/// 200 reply after a redirect to `url`.
pub fn redirect_reply(url: &str, body: &str) -> ClientResult<HttpReply> {
    Ok(HttpReply {
        status: 200,
        url: url.to_string(),
        redirected: true,
        body: body.to_string(),
    })
}

pub fn status_reply(status: u16, body: &str) -> ClientResult<HttpReply> {
    Ok(HttpReply {
        status,
        url: BASE.to_string(),
        redirected: false,
        body: body.to_string(),
    })
}

/// `{"detail": {"success": [...]}}` from key/value pairs.
pub fn success(entries: &[(&str, &str)]) -> String {
    detail("success", entries)
}

/// `{"detail": {"errors": [...]}}` from key/value pairs.
pub fn errors(entries: &[(&str, &str)]) -> String {
    detail("errors", entries)
}

fn detail(kind: &str, entries: &[(&str, &str)]) -> String {
    let list: Vec<serde_json::Value> = entries
        .iter()
        .map(|(k, v)| serde_json::json!({"key": k, "value": v}))
        .collect();
    let mut detail = serde_json::Map::new();
    detail.insert(kind.to_string(), serde_json::Value::Array(list));
    serde_json::json!({ "detail": detail }).to_string()
}
