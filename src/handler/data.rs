//! Per-request data bag and the default-data adders filling it.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::http::request::RequestContext;

/// Adds process-wide default entries to every data bag, in registration order.
pub type DataAdder = Arc<dyn Fn(&mut DataBag, &RequestContext) + Send + Sync>;

/// String-keyed values handed to the template renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataBag(Map<String, Value>);

impl DataBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous entry.
    ///
    /// Values that fail to serialize are stored as null.
    pub fn insert<T: Serialize>(&mut self, key: impl Into<String>, value: T) {
        let key = key.into();
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::warn!(key = %key, error = %e, "Failed to serialize data bag value");
            Value::Null
        });
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dotted path (`User.Login`) through nested objects.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
