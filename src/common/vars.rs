//! Variable bag passed in and out of nodes.
//!
//! `Vars` wraps a JSON object: upstream inputs arrive as vars, and each node
//! returns its pass-through outputs as vars.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A set of named JSON values.
///
/// Keys come back in a stable order across invocations, so the host UI can
/// list outputs deterministically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vars {
    #[serde(flatten)]
    inner: Map<String, Value>,
}

impl Vars {
    /// Create an empty vars set.
    pub fn new() -> Self {
        Self {
            inner: Map::new(),
        }
    }

    /// Set a value under `key`, serializing it to JSON.
    pub fn set<T: Serialize>(
        &mut self,
        key: &str,
        value: T,
    ) {
        if let Ok(value) = serde_json::to_value(value) {
            self.inner.insert(key.to_string(), value);
        }
    }

    /// Get the value under `key`, deserialized into `T`.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        self.inner.get(key).cloned().and_then(|value| serde_json::from_value(value).ok())
    }

    /// Insert a raw JSON value under `key`.
    pub fn insert(
        &mut self,
        key: String,
        value: Value,
    ) {
        self.inner.insert(key, value);
    }

    /// Remove the value under `key`.
    pub fn remove(
        &mut self,
        key: &str,
    ) -> Option<Value> {
        self.inner.remove(key)
    }

    pub fn contains_key(
        &self,
        key: &str,
    ) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate over the entries.
    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.inner.iter()
    }
}

impl From<Vars> for Value {
    fn from(vars: Vars) -> Self {
        Value::Object(vars.inner)
    }
}

impl TryFrom<Value> for Vars {
    type Error = crate::HookflowError;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(inner) => Ok(Self {
                inner,
            }),
            other => Err(crate::HookflowError::Convert(format!("expected a JSON object for vars, got: {}", other))),
        }
    }
}

impl FromIterator<(String, Value)> for Vars {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}
