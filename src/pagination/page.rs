//! Page payloads
//!
//! A page is kept as the raw JSON body so it can be stored verbatim.
//! Accessors default to empty on any structural surprise.

use crate::types::{JsonValue, Resource};
use serde::{Deserialize, Serialize};

/// One response body of a paginated MDS collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page(JsonValue);

impl Page {
    /// Wrap a JSON body
    pub fn new(body: JsonValue) -> Self {
        Self(body)
    }

    /// Records under `data.<resource>`, empty when absent or not an array
    pub fn payload(&self, resource: Resource) -> &[JsonValue] {
        self.0
            .get("data")
            .and_then(|data| data.get(resource.as_str()))
            .and_then(JsonValue::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of records for `resource`
    pub fn payload_len(&self, resource: Resource) -> usize {
        self.payload(resource).len()
    }

    /// Whether the page carries at least one record for `resource`
    pub fn has_data(&self, resource: Resource) -> bool {
        !self.payload(resource).is_empty()
    }

    /// Cursor URL of the following page, from `links.next`
    pub fn next_link(&self) -> Option<&str> {
        self.0
            .get("links")
            .and_then(|links| links.get("next"))
            .and_then(JsonValue::as_str)
            .filter(|next| !next.is_empty())
    }

    /// The raw body
    pub fn as_value(&self) -> &JsonValue {
        &self.0
    }

    /// Take the raw body
    pub fn into_value(self) -> JsonValue {
        self.0
    }
}

impl From<JsonValue> for Page {
    fn from(body: JsonValue) -> Self {
        Self(body)
    }
}
