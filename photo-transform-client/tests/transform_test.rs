//! 变换提交测试

mod common;

use std::sync::Arc;

use common::{client, errors, json_reply, redirect_reply, status_reply, success};
use photo_transform_client::response::REDIRECT_NOT_URL;
use photo_transform_client::{FormErrors, HttpMethod, PageAction, SubmitTarget};
use photo_transform_core::{PhotoTransform, TransData, TransformSchema, UiEvent};
use serde_json::json;

const SCHEMA: &str = r#"{
    "qualifiers": {
        "crop": {"commands": [
            {"command": "fill"},
            {"command": "scale", "details": [{"detail": ":<width>", "range_int": {"min": 1}}]}
        ]},
        "angle": {"commands": [{"command": "a", "details": [{"detail": ":<deg>", "range_int": {}}]}]}
    }
}"#;

fn engine() -> PhotoTransform {
    let schema = TransformSchema::from_json_str(SCHEMA).unwrap_or_else(|e| panic!("{e}"));
    let mut engine = PhotoTransform::new(Arc::new(schema), TransData::new());
    engine.setup().unwrap_or_else(|e| panic!("{e}"));
    engine
        .dispatch(UiEvent::Check {
            id: "crop".into(),
            checked: true,
        })
        .unwrap_or_else(|e| panic!("{e}"));
    engine
}

#[tokio::test]
async fn test_create_posts_body_and_stores_it() {
    let (client, transport) = client();
    transport
        .push(json_reply(
            common::BASE,
            &success(&[("message", "Saved"), ("reload", "1"), ("file_url", "/f.jpg")]),
        ))
        .await;

    let mut engine = engine();
    let outcome = client
        .submit_transform(
            &mut engine,
            &SubmitTarget::create("/photos/7/transform"),
            &mut FormErrors::default(),
        )
        .await;

    assert_eq!(outcome.alerts, vec!["Message: Saved"]);
    assert_eq!(outcome.action, PageAction::Reload);
    assert_eq!(outcome.file_url, None, "file_url is for updates only");
    assert_eq!(engine.trans_data().get("crop"), Some("fill"));

    let requests = transport.requests().await;
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].url, "http://photos.test/photos/7/transform");
    assert_eq!(requests[0].body, Some(json!({"crop": "fill"})));
}

#[tokio::test]
async fn test_update_puts_and_reports_urls() {
    let (client, transport) = client();
    transport
        .push(json_reply(
            common::BASE,
            &success(&[("file_url", "/t/7.jpg"), ("qr_url", "")]),
        ))
        .await;

    let mut engine = engine();
    let outcome = client
        .submit_transform(
            &mut engine,
            &SubmitTarget::update("/photos/7/transform"),
            &mut FormErrors::default(),
        )
        .await;

    assert_eq!(transport.requests().await[0].method, HttpMethod::Put);
    assert_eq!(outcome.file_url.as_deref(), Some("/t/7.jpg"));
    assert_eq!(outcome.qr_url.as_deref(), Some(""));
    assert_eq!(outcome.action, PageAction::Stay);
}

#[tokio::test]
async fn test_redirected_submit_keeps_stored_data() {
    let (client, transport) = client();
    transport
        .push(redirect_reply(
            "http://photos.test/login?message=Session%20expired",
            "<html></html>",
        ))
        .await;

    let mut engine = engine();
    let outcome = client
        .submit_transform(
            &mut engine,
            &SubmitTarget::create("/photos/7/transform"),
            &mut FormErrors::default(),
        )
        .await;

    assert_eq!(outcome.alerts, vec!["Session expired"]);
    assert_eq!(
        outcome.action,
        PageAction::Navigate("http://photos.test/login".into())
    );
    assert!(engine.trans_data().is_empty());
}

#[tokio::test]
async fn test_empty_redirect_goes_home() {
    let (client, transport) = client();
    transport
        .push(json_reply(common::BASE, &success(&[("redirect", "")])))
        .await;

    let mut engine = engine();
    let outcome = client
        .submit_transform(
            &mut engine,
            &SubmitTarget::create("/photos/7/transform"),
            &mut FormErrors::default(),
        )
        .await;
    assert_eq!(outcome.alerts, vec![REDIRECT_NOT_URL]);
    assert_eq!(outcome.action, PageAction::Navigate("/".into()));
}

#[tokio::test]
async fn test_rejected_submit_alerts_and_reloads() {
    let (client, transport) = client();
    transport.push(status_reply(422, "invalid body")).await;

    let mut engine = engine();
    let outcome = client
        .submit_transform(
            &mut engine,
            &SubmitTarget::create("/photos/7/transform"),
            &mut FormErrors::default(),
        )
        .await;
    assert_eq!(outcome.alerts, vec!["Error: HTTP 422: invalid body"]);
    assert_eq!(outcome.action, PageAction::Reload);
    assert!(engine.trans_data().is_empty());
}

#[tokio::test]
async fn test_submit_errors_reach_fields() {
    let (client, transport) = client();
    transport
        .push(json_reply(
            common::BASE,
            &errors(&[("transform-error", "Unsupported crop"), ("message", "Not saved")]),
        ))
        .await;

    let mut engine = engine();
    let mut sink = FormErrors::with_fields(["transform-error"]);
    let outcome = client
        .submit_transform(
            &mut engine,
            &SubmitTarget::create("/photos/7/transform"),
            &mut sink,
        )
        .await;
    assert_eq!(sink.get("transform-error"), Some("Unsupported crop"));
    assert_eq!(outcome.alerts, vec!["Error message: Not saved"]);
    assert_eq!(outcome.action, PageAction::Stay);
}
