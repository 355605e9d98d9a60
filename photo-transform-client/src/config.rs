//! 客户端配置（TOML）

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::error::{ClientError, ClientResult};

const DEFAULT_BASE_URI: &str = "http://127.0.0.1:8000/";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_uri() -> String {
    DEFAULT_BASE_URI.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("photo-transform/{}", env!("CARGO_PKG_VERSION"))
}

fn default_schema_path() -> PathBuf {
    PathBuf::from(photo_transform_core::store::SCHEMA_FILE)
}

/// Client settings.
///
/// ```toml
/// base_uri = "https://photos.example.com"
/// timeout_secs = 30
/// schema_path = "static/transformation.json"
/// trans_data_path = "data/photo.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Page base URI; auth endpoints are resolved against it.
    #[serde(default = "default_base_uri")]
    pub base_uri: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_schema_path")]
    pub schema_path: PathBuf,
    /// Stored transform data of the photo being edited.
    #[serde(default)]
    pub trans_data_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_uri: default_base_uri(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            schema_path: default_schema_path(),
            trans_data_path: None,
        }
    }
}

impl ClientConfig {
    /// Reads and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validated()
    }

    /// Normalizes `base_uri` to end with `/` and checks the remaining fields.
    pub fn validated(mut self) -> ClientResult<Self> {
        if !self.base_uri.ends_with('/') {
            self.base_uri.push('/');
        }
        Url::parse(&self.base_uri)
            .map_err(|e| ClientError::Config(format!("invalid base_uri '{}': {e}", self.base_uri)))?;
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(self)
    }

    /// Parsed base URI.
    pub fn base_url(&self) -> ClientResult<Url> {
        Url::parse(&self.base_uri)
            .map_err(|e| ClientError::Config(format!("invalid base_uri '{}': {e}", self.base_uri)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = ClientConfig::from_toml_str("").unwrap();
        assert_eq!(config.base_uri, DEFAULT_BASE_URI);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.schema_path, PathBuf::from("transformation.json"));
        assert!(config.trans_data_path.is_none());
        assert!(config.user_agent.starts_with("photo-transform/"));
    }

    #[test]
    fn test_base_uri_gets_trailing_slash() {
        let config =
            ClientConfig::from_toml_str(r#"base_uri = "https://photos.example.com/app""#).unwrap();
        assert_eq!(config.base_uri, "https://photos.example.com/app/");
        assert_eq!(
            config.base_url().unwrap().join("api/auth/login").unwrap().as_str(),
            "https://photos.example.com/app/api/auth/login"
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ClientConfig::from_toml_str(r#"base_uri = "not a url""#),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("timeout_secs = 0"),
            Err(ClientError::Config(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("colour = 1"),
            Err(ClientError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(
            &path,
            "timeout_secs = 5\ntrans_data_path = \"photo.json\"\n",
        )
        .unwrap();
        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.trans_data_path, Some(PathBuf::from("photo.json")));

        let missing = ClientConfig::load(dir.path().join("nope.toml"));
        assert!(matches!(missing, Err(ClientError::Config(_))));
    }
}
