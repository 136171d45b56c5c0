//! Request descriptors
//!
//! A `RequestDescriptor` is the caller's description of one outbound call:
//! method, target, headers, body and an optional per-call TTL override. It is
//! an open JSON object so callers can carry any option their origin understands.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Field carrying the per-call TTL override, in seconds
pub const TTL_FIELD: &str = "ttl";

/// Open mapping from field name to value describing an outbound call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestDescriptor {
    fields: Map<String, Value>,
}

impl RequestDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor for a plain GET of `url`
    pub fn get(url: &str) -> Self {
        Self::new().with_method("get").with_url(url)
    }

    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn with_method(self, method: &str) -> Self {
        self.with_field("method", method)
    }

    pub fn with_url(self, url: &str) -> Self {
        self.with_field("url", url)
    }

    /// Add a request header, creating the `headers` object if needed
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        let headers = self
            .fields
            .entry("headers")
            .or_insert_with(|| Value::Object(Map::new()));
        if !headers.is_object() {
            *headers = Value::Object(Map::new());
        }
        if let Value::Object(map) = headers {
            map.insert(name.to_string(), Value::String(value.to_string()));
        }
        self
    }

    /// Add a query string parameter, creating the `qs` object if needed
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        let query = self
            .fields
            .entry("qs")
            .or_insert_with(|| Value::Object(Map::new()));
        if !query.is_object() {
            *query = Value::Object(Map::new());
        }
        if let Value::Object(map) = query {
            map.insert(name.to_string(), Value::String(value.to_string()));
        }
        self
    }

    pub fn with_body(self, body: &str) -> Self {
        self.with_field("body", body)
    }

    pub fn with_json(self, json: Value) -> Self {
        self.with_field("json", json)
    }

    pub fn with_timeout_ms(self, timeout_ms: u64) -> Self {
        self.with_field("timeout", timeout_ms)
    }

    /// Override the store TTL for this call only
    pub fn with_ttl(self, seconds: u64) -> Self {
        self.with_field(TTL_FIELD, seconds)
    }

    /// Raw fields exactly as the caller supplied them
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Lower-cased, sorted view of the top-level fields.
    ///
    /// Names are visited in sorted order of their original spelling, so when two
    /// names differ only in case the one sorting last wins.
    pub fn normalized(&self) -> BTreeMap<String, &Value> {
        let mut names: Vec<&String> = self.fields.keys().collect();
        names.sort();

        let mut normalized = BTreeMap::new();
        for name in names {
            if let Some(value) = self.fields.get(name) {
                normalized.insert(name.to_lowercase(), value);
            }
        }
        normalized
    }

    /// Case-insensitive field lookup, consistent with `normalized`
    pub fn field(&self, name: &str) -> Option<&Value> {
        let wanted = name.to_lowercase();
        let mut found: Option<(&String, &Value)> = None;
        for (key, value) in &self.fields {
            if key.to_lowercase() != wanted {
                continue;
            }
            match found {
                Some((current, _)) if current > key => {}
                _ => found = Some((key, value)),
            }
        }
        found.map(|(_, value)| value)
    }

    pub fn method(&self) -> Option<&str> {
        self.field("method").and_then(Value::as_str)
    }

    pub fn url(&self) -> Option<&str> {
        self.field("url")
            .or_else(|| self.field("uri"))
            .and_then(Value::as_str)
    }

    pub fn headers(&self) -> Option<&Map<String, Value>> {
        self.field("headers").and_then(Value::as_object)
    }

    pub fn query(&self) -> Option<&Map<String, Value>> {
        self.field("qs").and_then(Value::as_object)
    }

    pub fn body(&self) -> Option<&str> {
        self.field("body").and_then(Value::as_str)
    }

    pub fn json(&self) -> Option<&Value> {
        self.field("json")
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.field("timeout").and_then(Value::as_u64)
    }

    /// Per-call TTL in seconds. Zero, negative and non-integer values count as absent.
    pub fn ttl_override(&self) -> Option<u64> {
        self.field(TTL_FIELD)
            .and_then(Value::as_u64)
            .filter(|ttl| *ttl > 0)
    }
}

impl From<Map<String, Value>> for RequestDescriptor {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl TryFrom<Value> for RequestDescriptor {
    type Error = Value;

    /// Only JSON objects describe a request; anything else is handed back
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(other),
        }
    }
}
