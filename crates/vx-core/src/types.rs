use serde::{Deserialize, Serialize};
use std::fmt;

/// Record identifier. Serialized untagged so it reads back as a plain
/// JSON number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for RecordId {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for RecordId {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// One unit of input: an id, an opaque payload and optional metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record<P> {
    pub id: RecordId,
    pub payload: P,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl<P> Record<P> {
    pub fn new(id: impl Into<RecordId>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

impl<P> From<(RecordId, P, Option<serde_json::Value>)> for Record<P> {
    fn from((id, payload, metadata): (RecordId, P, Option<serde_json::Value>)) -> Self {
        Self { id, payload, metadata }
    }
}
