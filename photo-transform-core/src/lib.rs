//! Photo Transform Core Library
//!
//! Schema-driven form engine for image transformation requests, including:
//! - Schema model and template extraction
//! - Control document and HTML rendering
//! - Dependency tracking between qualifiers
//! - Encoding/decoding of the compact transform string format
//!
//! The library has no browser bindings: the control tree is an explicit
//! [`Document`] owned by a [`PhotoTransform`] rendering context.

pub mod document;
pub mod engine;
pub mod error;
pub mod store;
pub mod template;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use document::{Document, Node, NodeId};
pub use engine::{DependsLink, DependsList, PhotoTransform, UiEvent};
pub use error::{CoreError, CoreResult};
pub use store::SchemaStore;
pub use types::{TransData, TransformBody, TransformSchema};
