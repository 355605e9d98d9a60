//! 登录 / 登出 / 注册

use crate::client::{FormFields, PhotoClient, form_body};
use crate::error::{ClientError, ClientResult};
use crate::http_client::HttpRequest;
use crate::response::{FieldErrorSink, Flow, handle_errors};
use crate::types::{Outcome, ResponseEnvelope, SuccessKey};

pub const LOGIN_PATH: &str = "api/auth/login";
pub const LOGOUT_PATH: &str = "api/auth/logout";

impl PhotoClient {
    /// Posts the login form.
    ///
    /// Failures are logged only; the page stays as it is.
    pub async fn login(&self, fields: &FormFields, sink: &mut dyn FieldErrorSink) -> Outcome {
        sink.clear_errors();
        let mut flow = Flow::default();
        if let Err(e) = self.login_inner(fields, sink, &mut flow).await {
            e.log("login");
        }
        flow.finish(None)
    }

    async fn login_inner(
        &self,
        fields: &FormFields,
        sink: &mut dyn FieldErrorSink,
        flow: &mut Flow,
    ) -> ClientResult<()> {
        let url = self.resolve(LOGIN_PATH)?;
        let reply = self.send(HttpRequest::post(url, Some(form_body(fields)))).await?;
        flow.follow_redirect(&reply);

        let detail = reply.json::<ResponseEnvelope>()?.detail;
        if let Some(errors) = detail.errors {
            handle_errors(&errors, sink, &mut flow.alerts);
        } else if let Some(success) = detail.success {
            for entry in success {
                match SuccessKey::parse(&entry.key) {
                    SuccessKey::Redirect => flow.redirect = Some(entry.text()),
                    SuccessKey::Reload => flow.reload = true,
                    SuccessKey::Message => flow.alerts.push(entry.text()),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Posts the logout request (no body).
    ///
    /// A rejected request alerts the response text; a failed one alerts the
    /// error and reloads.
    pub async fn logout(&self, sink: &mut dyn FieldErrorSink) -> Outcome {
        let mut flow = Flow::default();
        match self.logout_inner(sink, &mut flow).await {
            Ok(()) => {}
            Err(ClientError::HttpStatus { status, body }) => {
                log::warn!("[logout] HTTP {status}");
                flow.alerts.push(body);
            }
            Err(e) => flow.fail("logout", &e),
        }
        flow.finish(None)
    }

    async fn logout_inner(&self, sink: &mut dyn FieldErrorSink, flow: &mut Flow) -> ClientResult<()> {
        let url = self.resolve(LOGOUT_PATH)?;
        let reply = self.send(HttpRequest::post(url, None)).await?;

        let detail = reply.json::<ResponseEnvelope>()?.detail;
        if let Some(errors) = detail.errors {
            handle_errors(&errors, sink, &mut flow.alerts);
        } else if let Some(success) = detail.success {
            for entry in success {
                match SuccessKey::parse(&entry.key) {
                    SuccessKey::Message => flow.alerts.push(entry.text()),
                    SuccessKey::Reload => flow.reload = true,
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Posts the signup form to its `action`.
    ///
    /// Failures are logged only; the page stays as it is.
    pub async fn signup(
        &self,
        action: &str,
        fields: &FormFields,
        sink: &mut dyn FieldErrorSink,
    ) -> Outcome {
        sink.clear_errors();
        let mut flow = Flow::default();
        if let Err(e) = self.signup_inner(action, fields, sink, &mut flow).await {
            e.log("signup");
        }
        flow.finish(None)
    }

    async fn signup_inner(
        &self,
        action: &str,
        fields: &FormFields,
        sink: &mut dyn FieldErrorSink,
        flow: &mut Flow,
    ) -> ClientResult<()> {
        let url = self.resolve(action)?;
        let reply = self.send(HttpRequest::post(url, Some(form_body(fields)))).await?;
        flow.follow_redirect(&reply);

        let detail = reply.json::<ResponseEnvelope>()?.detail;
        if let Some(errors) = detail.errors {
            handle_errors(&errors, sink, &mut flow.alerts);
        } else if let Some(success) = detail.success {
            for entry in success {
                match SuccessKey::parse(&entry.key) {
                    SuccessKey::Redirect => flow.redirect = Some(entry.text()),
                    SuccessKey::Message => flow.alerts.push(entry.text()),
                    _ => {}
                }
            }
        }
        Ok(())
    }
}
