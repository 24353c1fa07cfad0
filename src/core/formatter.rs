//! Rendering messages into display strings
//!
//! The default layout is `<timestamp> <prefix>[<level>] <body><context block>`.
//! A handler may install a custom format hook (replacing the whole layout)
//! and/or a prefix hook; both receive the message and the handler's common
//! context and must produce a string.

use super::context::Context;
use super::error::{LogError, Result};
use super::message::Message;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Custom whole-line format hook
pub type FormatFn = Arc<dyn Fn(&Message, &Context) -> Result<String> + Send + Sync>;

/// Prefix hook, rendered in front of both the default layout and any custom
/// format hook output
pub type PrefixFn = Arc<dyn Fn(&Message, &Context) -> Result<String> + Send + Sync>;

/// Default strftime pattern: date, time, microseconds
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Clone)]
pub struct Formatter {
    format: Option<FormatFn>,
    prefix: Option<PrefixFn>,
    timestamp_format: String,
}

impl Default for Formatter {
    fn default() -> Self {
        Self {
            format: None,
            prefix: None,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_format(&mut self, format: FormatFn) {
        self.format = Some(format);
    }

    pub fn set_prefix(&mut self, prefix: PrefixFn) {
        self.prefix = Some(prefix);
    }

    pub fn set_timestamp_format(&mut self, timestamp_format: impl Into<String>) {
        self.timestamp_format = timestamp_format.into();
    }

    /// Render one message, including the handler's common context.
    pub fn format(&self, message: &Message, common_context: &Context) -> Result<String> {
        match &self.format {
            None => self.default_format(message, common_context),
            Some(format) => {
                let formatted = format(message, common_context)
                    .map_err(|e| LogError::format_hook("format", e.to_string()))?;
                Ok(format!(
                    "{}{}",
                    self.render_prefix(message, common_context)?,
                    formatted
                ))
            }
        }
    }

    fn default_format(&self, message: &Message, common_context: &Context) -> Result<String> {
        let time = self.render_time(message)?;
        let prefix = self.render_prefix(message, common_context)?;
        let context = context_block(message, common_context);
        Ok(format!(
            "{} {}[{}] {}{}",
            time,
            prefix,
            message.level(),
            message.body(),
            context
        ))
    }

    /// Render the `time` context entry (fallback: now) with the configured
    /// strftime pattern. An unparseable value is a hard error.
    fn render_time(&self, message: &Message) -> Result<String> {
        let seconds = match message.context_value("time") {
            Some(value) => parse_epoch_seconds(value)?,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_err(|e| LogError::invalid_timestamp(e.to_string()))?
                .as_secs_f64(),
        };
        let datetime = epoch_to_datetime(seconds)?;
        Ok(datetime.format(&self.timestamp_format).to_string())
    }

    fn render_prefix(&self, message: &Message, common_context: &Context) -> Result<String> {
        match &self.prefix {
            None => Ok(String::new()),
            Some(prefix) => prefix(message, common_context)
                .map_err(|e| LogError::format_hook("prefix", e.to_string())),
        }
    }
}

impl std::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Formatter")
            .field("format", &self.format.as_ref().map(|_| "<hook>"))
            .field("prefix", &self.prefix.as_ref().map(|_| "<hook>"))
            .field("timestamp_format", &self.timestamp_format)
            .finish()
    }
}

/// Parse an epoch-seconds context value, recognizing `.` or `,` as the
/// fractional separator in textual values.
fn parse_epoch_seconds(value: &super::context::ContextValue) -> Result<f64> {
    use super::context::ContextValue;

    match value {
        ContextValue::Float(f) => Ok(*f),
        ContextValue::Int(i) => Ok(*i as f64),
        ContextValue::Str(s) => {
            let normalized = s.replace(',', ".");
            normalized
                .trim()
                .parse::<f64>()
                .map_err(|_| LogError::invalid_timestamp(s.clone()))
        }
        other => Err(LogError::invalid_timestamp(other.stringify())),
    }
}

fn epoch_to_datetime(seconds: f64) -> Result<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(LogError::invalid_timestamp(seconds.to_string()));
    }
    let mut secs = seconds.trunc() as i64;
    let mut micros = ((seconds - seconds.trunc()) * 1_000_000.0).round() as i64;
    if micros >= 1_000_000 {
        secs += 1;
        micros -= 1_000_000;
    }
    if micros < 0 {
        secs -= 1;
        micros += 1_000_000;
    }
    Utc.timestamp_opt(secs, (micros * 1_000) as u32)
        .single()
        .ok_or_else(|| LogError::invalid_timestamp(seconds.to_string()))
}

/// Build the context tail of the default layout: trace lines and context
/// keys under "Message context:", then the handler's "Common context:"
/// block, each preceded by a blank line and the whole tail ending in a
/// newline.
fn context_block(message: &Message, common_context: &Context) -> String {
    let mut context_lines: Vec<String> = Vec::new();

    let trace = trace_lines(message);
    if !trace.is_empty() {
        context_lines.push(trace);
    }

    for (name, value) in message.context().iter() {
        if name != "trace" {
            context_lines.push(format!("{}: {}", name, value.stringify()));
        }
    }

    let common_lines: Vec<String> = common_context
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.stringify()))
        .collect();

    let mut out = String::new();
    if !context_lines.is_empty() {
        out.push_str("\n\nMessage context:\n\n");
        out.push_str(&context_lines.join("\n"));
    }
    if !common_lines.is_empty() {
        out.push_str("\n\nCommon context:\n\n");
        out.push_str(&common_lines.join("\n"));
    }
    out.push('\n');
    out
}

fn trace_lines(message: &Message) -> String {
    let frames = message
        .context_value("trace")
        .and_then(|value| value.as_trace())
        .unwrap_or(&[]);

    if frames.is_empty() {
        return String::new();
    }

    let rendered: Vec<String> = frames
        .iter()
        .map(|frame| format!("in {}:{}", frame.file, frame.line))
        .collect();
    format!("trace:\n    {}", rendered.join("\n    "))
}
