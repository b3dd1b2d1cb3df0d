//! Serializable error record
//!
//! A `DataError` is an error with arbitrary attached data. It is what
//! executors fail with, what results carry in their `error` field, and what
//! an action's `expectedError` is compared against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::EngineError;

const DATA_ERROR: &str = "DataError";

/// Error with attached data, serialized as `{ name, message, data?, ...fields }`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataError {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Extra properties an executor attaches (status codes, error codes, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn default_name() -> String {
    "Error".to_string()
}

impl DataError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            data: None,
            fields: Map::new(),
        }
    }

    /// A `DataError` carrying a list of messages, usually validation errors
    pub fn with_messages(message: impl Into<String>, messages: Vec<String>) -> Self {
        Self::new(DATA_ERROR, message)
            .with_data(Value::Array(messages.into_iter().map(Value::String).collect()))
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Attached messages, if `data` is a list of strings
    pub fn messages(&self) -> Vec<&str> {
        match &self.data {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// JSON form used for expected-error comparisons
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for DataError {}

impl From<EngineError> for DataError {
    fn from(err: EngineError) -> Self {
        DataError::new(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_with_messages() {
        let err = DataError::with_messages("failed", vec!["a".into(), "b".into()]);
        assert_eq!(err.name, "DataError");
        assert_eq!(err.messages(), vec!["a", "b"]);
    }

    #[test]
    fn test_fields_are_flattened() {
        let err = DataError::new("HttpStatusError", "Not Found").with_field("statusCode", 404);
        let value = err.to_value();
        assert_eq!(value["statusCode"], json!(404));
        assert_eq!(value["name"], json!("HttpStatusError"));
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_deserialize_foreign_error() {
        let err: DataError =
            serde_json::from_value(json!({"message": "boom", "code": "E1"})).unwrap();
        assert_eq!(err.name, "Error");
        assert_eq!(err.fields.get("code"), Some(&json!("E1")));
    }
}
