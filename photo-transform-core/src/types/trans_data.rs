//! Persisted transform data and submit bodies.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreResult;

/// Qualifier name -> encoded string, in insertion order.
///
/// Used both for the stored transform of a photo and for the body sent on
/// submit. `null` and empty values are dropped on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TransData(IndexMap<String, String>);

/// Request body produced by `create_body`.
pub type TransformBody = TransData;

impl<'de> Deserialize<'de> for TransData {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, Option<String>>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v)))
            .collect())
    }
}

impl TransData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, qualifier: &str) -> Option<&str> {
        self.0.get(qualifier).map(String::as_str)
    }

    pub fn insert(&mut self, qualifier: impl Into<String>, encoded: impl Into<String>) {
        self.0.insert(qualifier.into(), encoded.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TransData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
