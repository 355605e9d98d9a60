//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Qualifier missing from the loaded schema
    #[error("Qualifier not found: {0}")]
    QualifierNotFound(String),

    /// Command missing from a qualifier
    #[error("Command not found: {qualifier} - {command}")]
    CommandNotFound { qualifier: String, command: String },

    /// Control node missing from the document
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Schema is structurally invalid (duplicate prefix, two kinds on one detail, ...)
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// File system error (schema store, transform data files)
    #[error("IO error: {0}")]
    Io(String),
}

impl CoreError {
    /// Whether it is expected behavior (unknown qualifier, stale command, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::QualifierNotFound(_) | Self::CommandNotFound { .. } => true,
            Self::ElementNotFound(_)
            | Self::InvalidSchema(_)
            | Self::SerializationError(_)
            | Self::Io(_) => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn lookup_failures_are_expected() {
        assert!(CoreError::QualifierNotFound("crop".into()).is_expected());
        assert!(
            CoreError::CommandNotFound {
                qualifier: "crop".into(),
                command: "zoom".into()
            }
            .is_expected()
        );
        assert!(!CoreError::InvalidSchema("dup".into()).is_expected());
        assert!(!CoreError::ElementNotFound("c_det".into()).is_expected());
    }

    #[test]
    fn serializes_with_code_and_details() {
        let json = serde_json::to_value(CoreError::QualifierNotFound("crop".into())).unwrap();
        assert_eq!(json["code"], "QualifierNotFound");
        assert_eq!(json["details"], "crop");
    }

    #[test]
    fn display_includes_context() {
        let err = CoreError::CommandNotFound {
            qualifier: "crop".into(),
            command: "zoom".into(),
        };
        assert_eq!(err.to_string(), "Command not found: crop - zoom");
    }
}
