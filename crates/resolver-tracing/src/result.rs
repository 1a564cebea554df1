//! Execution result container that the tracing report is attached to.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::path::ResponsePath;

/// An error reported in the `errors` list of an execution result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<ResponsePath>,
}

impl GraphQLError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Attach the path of the field that failed.
    pub fn at(mut self, path: ResponsePath) -> Self {
        self.path = Some(path);
        self
    }
}

/// Result of one execution: data, errors, and an extensions bag shared
/// with other producers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Map<String, Value>>,
}

impl ExecutionResult {
    /// A result carrying `data` and no errors.
    pub fn from_data(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Default::default()
        }
    }

    /// Append an error.
    pub fn with_error(mut self, error: GraphQLError) -> Self {
        self.errors.push(error);
        self
    }

    /// Set one extensions entry, creating the bag if needed.
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions_mut().insert(key.into(), value);
        self
    }

    /// Extensions bag, created on first access.
    pub fn extensions_mut(&mut self) -> &mut Map<String, Value> {
        self.extensions.get_or_insert_with(Map::new)
    }

    /// Look up one extensions entry.
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.as_ref().and_then(|ext| ext.get(key))
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
