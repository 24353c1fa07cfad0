//! Message context: ordered key-value metadata attached to log entries
//!
//! This module provides:
//! - `ContextValue`: the value type stored under a context key
//! - `Context`: an insertion-ordered map of context entries
//! - `TraceFrame`: a serializable call-stack frame
//!
//! Keys used by convention: `category`, `time`, `memory`, `trace`, `exception`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single call-stack frame, reduced to its serializable fields.
///
/// Receiver objects and raw argument lists are stripped before a frame is
/// stored in a message context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub file: String,
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
}

impl TraceFrame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
            function: None,
        }
    }

    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }
}

/// Value type for context entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
    Trace(Vec<TraceFrame>),
    Structured(serde_json::Value),
}

impl ContextValue {
    /// Render this value for a context block line.
    ///
    /// Strings are quoted (`'app'`), scalars render plainly, and structured
    /// values are delegated to the compact JSON dump.
    pub fn stringify(&self) -> String {
        match self {
            ContextValue::Str(s) => format!("'{}'", s),
            ContextValue::Int(i) => i.to_string(),
            ContextValue::Float(f) => f.to_string(),
            ContextValue::Bool(b) => b.to_string(),
            ContextValue::Null => "null".to_string(),
            ContextValue::Trace(frames) => {
                serde_json::to_string(frames).unwrap_or_else(|_| "[]".to_string())
            }
            ContextValue::Structured(value) => {
                serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
            }
        }
    }

    /// Coerce this value for `{placeholder}` substitution.
    ///
    /// Unlike [`stringify`](Self::stringify), strings are inserted verbatim
    /// (no quoting) since they become part of the message body.
    pub fn placeholder_text(&self) -> String {
        match self {
            ContextValue::Str(s) => s.clone(),
            ContextValue::Int(i) => i.to_string(),
            ContextValue::Float(f) => f.to_string(),
            ContextValue::Bool(b) => b.to_string(),
            ContextValue::Null => String::new(),
            other => other.stringify(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_trace(&self) -> Option<&[TraceFrame]> {
        match self {
            ContextValue::Trace(frames) => Some(frames),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ContextValue::Float(f) => Some(*f),
            ContextValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.placeholder_text())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::Str(s)
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Str(s.to_string())
    }
}

impl From<i64> for ContextValue {
    fn from(i: i64) -> Self {
        ContextValue::Int(i)
    }
}

impl From<i32> for ContextValue {
    fn from(i: i32) -> Self {
        ContextValue::Int(i as i64)
    }
}

impl From<u64> for ContextValue {
    fn from(i: u64) -> Self {
        ContextValue::Int(i as i64)
    }
}

impl From<f64> for ContextValue {
    fn from(f: f64) -> Self {
        ContextValue::Float(f)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

impl From<Vec<TraceFrame>> for ContextValue {
    fn from(frames: Vec<TraceFrame>) -> Self {
        ContextValue::Trace(frames)
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(value: serde_json::Value) -> Self {
        ContextValue::Structured(value)
    }
}

/// Insertion-ordered key-value metadata attached to a log entry.
///
/// Order matters: context lines in rendered output follow insertion order,
/// so formatting is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Context {
    entries: IndexMap<String, ContextValue>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Add an entry (builder form)
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<ContextValue>,
    {
        self.entries.insert(key.into(), value.into());
    }

    /// Insert only when the key is absent; returns whether an insert happened.
    pub fn insert_if_absent<V>(&mut self, key: &str, value: V) -> bool
    where
        V: Into<ContextValue>,
    {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), value.into());
        true
    }

    /// Like [`insert_if_absent`](Self::insert_if_absent) but the value is
    /// only produced when needed (trace capture and memory probes are not
    /// free).
    pub fn insert_with_if_absent<V, F>(&mut self, key: &str, make: F) -> bool
    where
        V: Into<ContextValue>,
        F: FnOnce() -> V,
    {
        if self.entries.contains_key(key) {
            return false;
        }
        self.entries.insert(key.to_string(), make().into());
        true
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(ContextValue::as_str).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ContextValue)> {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<ContextValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut context = Context::new();
        for (key, value) in iter {
            context.insert(key, value);
        }
        context
    }
}
