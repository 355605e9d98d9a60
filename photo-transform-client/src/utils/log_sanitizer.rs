//! Log sanitization utilities
//!
//! Request and response bodies are logged with login/signup secrets masked and
//! long pages (a redirect target rendered as HTML, a server error page) clipped.

use serde_json::Value;

/// Characters of a body kept in a log line.
const LOG_BODY_CHARS: usize = 256;

const MASK: &str = "***";

fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_lowercase();
    key.contains("password") || key.contains("token")
}

/// Copy of a JSON body with password-like fields masked.
pub fn mask_secrets(body: &Value) -> Value {
    match body {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if is_secret_key(k) {
                        Value::String(MASK.to_string())
                    } else {
                        mask_secrets(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(mask_secrets).collect()),
        other => other.clone(),
    }
}

/// First [`LOG_BODY_CHARS`] characters of `text`, plus how many bytes were cut.
fn clip(text: &str) -> String {
    match text.char_indices().nth(LOG_BODY_CHARS) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}... (+{} bytes)", &text[..cut], text.len() - cut),
    }
}

/// Log form of an outgoing JSON body.
pub fn body_for_log(body: &Value) -> String {
    clip(&mask_secrets(body).to_string())
}

/// Log form of a raw response body; JSON bodies are masked first.
pub fn reply_for_log(text: &str) -> String {
    match serde_json::from_str::<Value>(text) {
        Ok(json) => body_for_log(&json),
        Err(_) => clip(text),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn short_body_unchanged() {
        assert_eq!(reply_for_log("<p>ok</p>"), "<p>ok</p>");
        assert_eq!(body_for_log(&json!({"crop": "fill"})), r#"{"crop":"fill"}"#);
    }

    #[test]
    fn long_page_clipped() {
        let page = format!("<html>{}</html>", "x".repeat(LOG_BODY_CHARS));
        let logged = reply_for_log(&page);
        assert!(logged.starts_with("<html>x"));
        assert!(logged.ends_with("... (+13 bytes)"));
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "фото".repeat(100);
        let logged = reply_for_log(&s);
        assert!(logged.starts_with(&"фото".repeat(64)));
        assert!(logged.contains("... (+"));
    }

    #[test]
    fn passwords_masked() {
        let body = json!({
            "username": "ann",
            "password": "hunter2",
            "confirm_Password": "hunter2",
            "nested": {"access_token": "abc"}
        });
        let masked = mask_secrets(&body);
        assert_eq!(masked["username"], "ann");
        assert_eq!(masked["password"], MASK);
        assert_eq!(masked["confirm_Password"], MASK);
        assert_eq!(masked["nested"]["access_token"], MASK);

        let logged = body_for_log(&body);
        assert!(!logged.contains("hunter2"));
    }

    #[test]
    fn json_reply_masked() {
        let logged = reply_for_log(r#"{"detail": {"success": [{"key": "token", "value": "t"}]}, "token": "abc"}"#);
        assert!(logged.contains(r#""token":"***""#));
        assert!(!logged.contains("abc"));
    }
}
