//! Console payload values.
//!
//! Log data arrives as arbitrary JSON from the sandbox runtime. It is kept
//! as a small tagged union so that equality is structural: objects compare
//! as keyed mappings (key order does not matter, a repeated key resolves to
//! its last value), arrays compare positionally, and numbers compare by
//! value with `NaN == NaN`.

use serde::{Deserialize, Serialize};

/// Marker field that tags a pre-formatted rich-text span.
pub const SPAN_MARKER: &str = "@t";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum LogValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<LogValue>),
    /// Keyed mapping in arrival order. Order is kept for rendering only.
    Object(Vec<(String, LogValue)>),
}

impl LogValue {
    /// Build an object. A repeated key keeps its first position and its
    /// last value, as JSON parsing does.
    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, LogValue)>,
    {
        let mut out: Vec<(String, LogValue)> = Vec::new();
        for (key, value) in fields {
            let key = key.into();
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some((_, slot)) => *slot = value,
                None => out.push((key, value)),
            }
        }
        Self::Object(out)
    }

    /// A formatted span as emitted by the runtime, e.g. `[[undefined]]`.
    pub fn span(text: impl Into<String>) -> Self {
        Self::Object(vec![(SPAN_MARKER.to_string(), Self::String(text.into()))])
    }

    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    /// Text of a formatted span, if this value is one.
    pub fn as_span(&self) -> Option<&str> {
        match self.get(SPAN_MARKER) {
            Some(Self::String(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Field lookup on an object; the last occurrence of a key wins.
    pub fn get(&self, key: &str) -> Option<&LogValue> {
        match self {
            Self::Object(fields) => fields.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }
}

fn numbers_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for LogValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_equal(*a, *b),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a
                .iter()
                .chain(b)
                .all(|(k, _)| self.get(k) == other.get(k)),
            _ => false,
        }
    }
}

impl Eq for LogValue {}

impl From<serde_json::Value> for LogValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<LogValue> for serde_json::Value {
    fn from(value: LogValue) -> Self {
        match value {
            LogValue::Null => Self::Null,
            LogValue::Bool(b) => Self::Bool(b),
            LogValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Self::Number)
                .unwrap_or(Self::Null),
            LogValue::String(s) => Self::String(s),
            LogValue::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            LogValue::Object(fields) => Self::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for LogValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for LogValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<f64> for LogValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for LogValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
