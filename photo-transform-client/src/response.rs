//! 响应处理：字段错误分发、重定向与页面动作

use indexmap::IndexMap;
use photo_transform_core::Document;

use crate::error::ClientError;
use crate::http_client::HttpReply;
use crate::query::check_message_in_url;
use crate::types::{KeyValue, Outcome, PageAction};

/// Class of the per-field error paragraphs of a form.
pub const ERROR_CLASS: &str = "inp-error";

/// Alert shown when a redirect carries no target.
pub const REDIRECT_NOT_URL: &str = "Redirect.value is not URL";

/// Target of field-level error messages.
pub trait FieldErrorSink {
    /// Empties every error slot before a submit.
    fn clear_errors(&mut self);

    /// Writes `message` into the element `id`; `false` when there is none.
    fn show_error(&mut self, id: &str, message: &str) -> bool;
}

impl FieldErrorSink for Document {
    fn clear_errors(&mut self) {
        for nid in self.with_class(ERROR_CLASS) {
            if let Some(node) = self.get_mut(nid) {
                node.text.clear();
            }
        }
    }

    fn show_error(&mut self, id: &str, message: &str) -> bool {
        self.set_text(id, message)
    }
}

/// Error slots of a form that is not rendered as a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    slots: IndexMap<String, String>,
}

impl FormErrors {
    /// Form with one error slot per field id.
    pub fn with_fields<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: ids.into_iter().map(|id| (id.into(), String::new())).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.slots.get(id).map(String::as_str)
    }

    /// Slots currently holding a message.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.slots
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(id, message)| (id.as_str(), message.as_str()))
    }
}

impl FieldErrorSink for FormErrors {
    fn clear_errors(&mut self) {
        for message in self.slots.values_mut() {
            message.clear();
        }
    }

    fn show_error(&mut self, id: &str, message: &str) -> bool {
        match self.slots.get_mut(id) {
            Some(slot) => {
                *slot = message.to_string();
                true
            }
            None => false,
        }
    }
}

/// Routes each error to its field, alerting the ones without a field.
pub fn handle_errors(errors: &[KeyValue], sink: &mut dyn FieldErrorSink, alerts: &mut Vec<String>) {
    for error in errors {
        let message = error.text();
        if sink.show_error(&error.key, &message) {
            continue;
        }
        match error.key.as_str() {
            "message" | "error-msg" => alerts.push(format!("Error message: {message}")),
            key => {
                log::warn!("Unhandled response error: {key} = {message}");
                alerts.push(format!("Error response: {key}: {message}"));
            }
        }
    }
}

/// Handler state accumulated while a response is processed.
#[derive(Debug, Default)]
pub(crate) struct Flow {
    pub alerts: Vec<String>,
    /// `Some("")` is a redirect without target.
    pub redirect: Option<String>,
    pub reload: bool,
    pub file_url: Option<String>,
    pub qr_url: Option<String>,
}

impl Flow {
    /// Records a followed redirect, surfacing its `message=` parameters.
    pub fn follow_redirect(&mut self, reply: &HttpReply) {
        if !reply.redirected {
            return;
        }
        let (link, messages) = check_message_in_url(&reply.url);
        self.alerts.extend(messages);
        self.redirect = Some(link);
    }

    /// Turns a failed request into an alert followed by a reload.
    pub fn fail(&mut self, context: &str, error: &ClientError) {
        error.log(context);
        self.alerts.push(format!("Error: {error}"));
        self.redirect = None;
        self.reload = true;
    }

    /// A redirect wins over a reload; an empty redirect navigates to `fallback` if given.
    pub fn finish(mut self, fallback: Option<&str>) -> Outcome {
        let action = match self.redirect.take() {
            Some(url) if !url.is_empty() => PageAction::Navigate(url),
            Some(_) => {
                self.alerts.push(REDIRECT_NOT_URL.to_string());
                fallback.map_or(PageAction::Stay, |url| PageAction::Navigate(url.to_string()))
            }
            None if self.reload => PageAction::Reload,
            None => PageAction::Stay,
        };
        Outcome {
            alerts: self.alerts,
            action,
            file_url: self.file_url,
            qr_url: self.qr_url,
        }
    }
}
