//! Log message construction and placeholder substitution

use super::context::{Context, ContextValue};
use super::level::Level;
use regex::Regex;
use std::fmt;
use std::sync::{Arc, LazyLock};

/// Placeholder tokens: `{identifier}` where identifier is word characters
/// and dots. No escaping syntax exists.
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([\w.]+)\}").expect("placeholder pattern compiles"));

/// The raw value handed to the logger.
///
/// Scalars and strings convert directly; structured values go through the
/// JSON dump; errors render via their `Display` impl and are additionally
/// captured under the `exception` context key by [`Logger::log`].
///
/// [`Logger::log`]: super::logger::Logger::log
#[derive(Debug, Clone)]
pub enum Payload {
    Text(String),
    Structured(serde_json::Value),
    Error(Arc<dyn std::error::Error + Send + Sync>),
}

impl Payload {
    /// Wrap an error value as a payload
    pub fn from_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Payload::Error(Arc::new(error))
    }

    pub fn as_error(&self) -> Option<&Arc<dyn std::error::Error + Send + Sync>> {
        match self {
            Payload::Error(err) => Some(err),
            _ => None,
        }
    }

    /// Convert the raw payload into message text, before substitution.
    fn render(&self) -> String {
        match self {
            Payload::Text(text) => text.clone(),
            Payload::Structured(value) => {
                serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
            }
            Payload::Error(err) => err.to_string(),
        }
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Payload::Text(s)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Payload::Text(s.to_string())
    }
}

impl From<i64> for Payload {
    fn from(i: i64) -> Self {
        Payload::Text(i.to_string())
    }
}

impl From<f64> for Payload {
    fn from(f: f64) -> Self {
        Payload::Text(f.to_string())
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Payload::Text(b.to_string())
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Payload::Structured(value)
    }
}

impl From<Arc<dyn std::error::Error + Send + Sync>> for Payload {
    fn from(err: Arc<dyn std::error::Error + Send + Sync>) -> Self {
        Payload::Error(err)
    }
}

/// A single log entry, immutable once constructed.
///
/// The body holds the rendered message text with `{name}` placeholders
/// already substituted from the context; the context itself is retained
/// verbatim for later formatting.
#[derive(Debug, Clone)]
pub struct Message {
    level: Level,
    body: String,
    context: Context,
}

impl Message {
    pub fn new(level: Level, payload: impl Into<Payload>, context: Context) -> Self {
        let body = parse(&payload.into().render(), &context);
        Self {
            level,
            body,
            context,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Look up a single context entry
    pub fn context_value(&self, name: &str) -> Option<&ContextValue> {
        self.context.get(name)
    }

    /// The message category, defaulting to the empty string
    pub fn category(&self) -> &str {
        self.context.get_str("category", "")
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.body)
    }
}

/// Substitute `{identifier}` tokens from the context.
///
/// Single pass, exact key match, unmatched tokens left verbatim.
fn parse(text: &str, context: &Context) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures<'_>| match context.get(&caps[1]) {
            Some(value) => value.placeholder_text(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
