//! # photo-transform-client
//!
//! HTTP glue of the photo-transform web app:
//! - login / logout / signup form handlers
//! - transform submit (`POST` for new photos, `PUT` for updates)
//! - response-detail handling and redirect message extraction
//!
//! Handlers return an [`Outcome`] (alerts plus a [`PageAction`]) instead of
//! touching a page; field errors are written through a [`FieldErrorSink`].
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls.

mod auth;
mod client;
pub mod config;
pub mod error;
pub mod http_client;
pub mod response;
mod transform;
pub mod types;
pub mod query;
pub mod utils;

pub use auth::{LOGIN_PATH, LOGOUT_PATH};
pub use client::{FormFields, PhotoClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http_client::{HttpMethod, HttpReply, HttpRequest, ReqwestTransport, Transport};
pub use response::{FieldErrorSink, FormErrors, handle_errors};
pub use transform::SubmitTarget;
pub use types::{KeyValue, Outcome, PageAction, ResponseDetail, ResponseEnvelope};
