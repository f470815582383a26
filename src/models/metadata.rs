use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{AppError, AppResult};

pub const DEFAULT_MAX_METADATA_ENTRIES: usize = 32;

/// Scalar values allowed in record metadata. Nested objects and arrays are
/// rejected when deserializing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Metadata(pub BTreeMap<String, MetadataValue>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetadataValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn check_bounds(&self, max_entries: usize) -> AppResult<()> {
        if self.0.len() > max_entries {
            return Err(AppError::invalid(format!(
                "metadata has {} entries, at most {} allowed",
                self.0.len(),
                max_entries
            )));
        }
        if self.0.keys().any(|k| k.trim().is_empty()) {
            return Err(AppError::invalid("metadata keys must not be empty"));
        }
        Ok(())
    }

    /// Parse `key=value` pairs from the command line. Values that look like
    /// booleans or integers keep that type.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = &'a str>) -> AppResult<Self> {
        let mut metadata = Self::new();
        for pair in pairs {
            let (key, raw) = pair
                .split_once('=')
                .ok_or_else(|| AppError::invalid(format!("expected key=value, got {:?}", pair)))?;
            let value = match raw {
                "true" => MetadataValue::Bool(true),
                "false" => MetadataValue::Bool(false),
                "null" => MetadataValue::Null,
                _ => raw
                    .parse::<i64>()
                    .map(MetadataValue::Integer)
                    .unwrap_or_else(|_| MetadataValue::Text(raw.to_string())),
            };
            metadata.insert(key.trim(), value);
        }
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_kinds_deserialize() {
        let metadata: Metadata = serde_json::from_str(
            r#"{"appointmentId": "a1", "attempt": 2, "urgent": true, "score": 4.5, "note": null}"#,
        )
        .unwrap();
        assert_eq!(metadata.get("appointmentId"), Some(&MetadataValue::Text("a1".into())));
        assert_eq!(metadata.get("attempt"), Some(&MetadataValue::Integer(2)));
        assert_eq!(metadata.get("urgent"), Some(&MetadataValue::Bool(true)));
        assert_eq!(metadata.get("score"), Some(&MetadataValue::Float(4.5)));
        assert_eq!(metadata.get("note"), Some(&MetadataValue::Null));
    }

    #[test]
    fn nested_values_are_rejected() {
        assert!(serde_json::from_str::<Metadata>(r#"{"nested": {"a": 1}}"#).is_err());
        assert!(serde_json::from_str::<Metadata>(r#"{"list": [1, 2]}"#).is_err());
    }

    #[test]
    fn bounds_are_checked() {
        let mut metadata = Metadata::new();
        for i in 0..3 {
            metadata.insert(format!("k{}", i), i as i64);
        }
        assert!(metadata.check_bounds(3).is_ok());
        assert!(metadata.check_bounds(2).is_err());

        let mut blank = Metadata::new();
        blank.insert(" ", "x");
        assert!(blank.check_bounds(8).is_err());
    }

    #[test]
    fn pairs_keep_simple_types() {
        let metadata = Metadata::from_pairs(["mentorId=m1", "count=3", "urgent=false"]).unwrap();
        assert_eq!(metadata.len(), 3);
        assert_eq!(metadata.get("count"), Some(&MetadataValue::Integer(3)));
        assert_eq!(metadata.get("urgent"), Some(&MetadataValue::Bool(false)));
        assert!(Metadata::from_pairs(["novalue"]).is_err());
    }
}
