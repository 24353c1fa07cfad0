//! Handler contract: per-destination filtering, buffering, and batched writes
//!
//! A handler owns its own filter state, message buffer, formatter, and write
//! threshold, independent of every other handler. Concrete handlers supply
//! [`Handler::write`]; the collect/filter/threshold protocol is provided.

use super::category_filter::CategoryFilter;
use super::context::Context;
use super::error::Result;
use super::formatter::{FormatFn, Formatter, PrefixFn};
use super::level::Level;
use super::message::Message;
use std::sync::Arc;

/// Enabled predicate: consulted by dispatch when no explicit flag override
/// has been set.
pub type EnabledFn = Arc<dyn Fn() -> bool + Send + Sync>;

#[derive(Clone)]
enum Enabled {
    Flag(bool),
    Predicate(EnabledFn),
}

/// State shared by every handler implementation.
pub struct HandlerState {
    categories: CategoryFilter,
    formatter: Formatter,
    buffer: Vec<Message>,
    levels: Vec<Level>,
    common_context: Context,
    export_interval: usize,
    enabled: Enabled,
}

impl Default for HandlerState {
    fn default() -> Self {
        Self {
            categories: CategoryFilter::new(),
            formatter: Formatter::new(),
            buffer: Vec::new(),
            levels: Vec::new(),
            common_context: Context::new(),
            export_interval: 1000,
            enabled: Enabled::Flag(true),
        }
    }
}

impl HandlerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_categories(&mut self, categories: impl IntoIterator<Item = impl Into<String>>) {
        self.categories.include(categories);
    }

    pub fn set_except(&mut self, except: impl IntoIterator<Item = impl Into<String>>) {
        self.categories.exclude(except);
    }

    /// Accepted levels; empty means all levels are accepted.
    pub fn set_levels(&mut self, levels: impl IntoIterator<Item = Level>) {
        self.levels = levels.into_iter().collect();
    }

    pub fn set_common_context(&mut self, common_context: Context) {
        self.common_context = common_context;
    }

    pub fn set_format(&mut self, format: FormatFn) {
        self.formatter.set_format(format);
    }

    pub fn set_prefix(&mut self, prefix: PrefixFn) {
        self.formatter.set_prefix(prefix);
    }

    pub fn set_export_interval(&mut self, export_interval: usize) {
        self.export_interval = export_interval;
    }

    pub fn set_timestamp_format(&mut self, timestamp_format: impl Into<String>) {
        self.formatter.set_timestamp_format(timestamp_format);
    }

    /// Install an enabled predicate, replacing any explicit flag.
    pub fn set_enabled_fn(&mut self, enabled: EnabledFn) {
        self.enabled = Enabled::Predicate(enabled);
    }

    /// Force-enable, overriding any predicate.
    pub fn enable(&mut self) {
        self.enabled = Enabled::Flag(true);
    }

    /// Force-disable, overriding any predicate.
    pub fn disable(&mut self) {
        self.enabled = Enabled::Flag(false);
    }

    pub fn is_enabled(&self) -> bool {
        match &self.enabled {
            Enabled::Flag(flag) => *flag,
            Enabled::Predicate(predicate) => predicate(),
        }
    }

    pub fn common_context(&self) -> &Context {
        &self.common_context
    }

    pub fn buffered(&self) -> &[Message] {
        &self.buffer
    }

    /// Append the messages that pass the level and category filters.
    fn filter_messages(&mut self, messages: &[Message]) {
        for message in messages {
            if !self.levels.is_empty() && !self.levels.contains(&message.level()) {
                continue;
            }
            if self.categories.is_excluded(message.category()) {
                continue;
            }
            self.buffer.push(message.clone());
        }
    }

    /// Render each buffered message through the formatter.
    pub fn formatted_messages(&self) -> Result<Vec<String>> {
        self.buffer
            .iter()
            .map(|message| self.formatter.format(message, &self.common_context))
            .collect()
    }

    /// Render all buffered messages, `separator` appended after each one.
    pub fn render_joined(&self, separator: &str) -> Result<String> {
        let mut out = String::new();
        for message in &self.buffer {
            out.push_str(&self.formatter.format(message, &self.common_context)?);
            out.push_str(separator);
        }
        Ok(out)
    }
}

impl std::fmt::Debug for HandlerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerState")
            .field("buffered", &self.buffer.len())
            .field("levels", &self.levels)
            .field("export_interval", &self.export_interval)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// A configured output destination.
///
/// Implementations provide [`write`](Handler::write), which renders the
/// currently buffered messages and delivers them to the concrete sink. The
/// collect protocol, filter state, and enable/disable surface are provided.
pub trait Handler: Send + Sync {
    fn state(&self) -> &HandlerState;
    fn state_mut(&mut self) -> &mut HandlerState;

    /// Deliver the buffered messages to the sink. Never called with an
    /// empty buffer by [`collect`](Handler::collect).
    fn write(&mut self) -> Result<()>;

    /// Short destination name, used in failure diagnostics.
    fn name(&self) -> &str;

    /// Filter `messages` into the buffer and trigger one write pass when the
    /// buffer is non-empty and either `is_final` is set or the export
    /// threshold is reached.
    ///
    /// The export interval is zeroed across the `write()` call so a
    /// re-entrant collect cannot trigger a nested threshold write; it is
    /// restored afterward and the buffer is cleared on success.
    fn collect(&mut self, messages: &[Message], is_final: bool) -> Result<()> {
        self.state_mut().filter_messages(messages);

        let count = self.state().buffer.len();
        let threshold = self.state().export_interval;
        if count == 0 || !(is_final || (threshold > 0 && count >= threshold)) {
            return Ok(());
        }

        self.state_mut().export_interval = 0;
        let result = self.write();
        let state = self.state_mut();
        state.export_interval = threshold;
        if result.is_ok() {
            state.buffer.clear();
        }
        result
    }

    fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    fn enable(&mut self) {
        self.state_mut().enable();
    }

    fn disable(&mut self) {
        self.state_mut().disable();
    }

    // Fluent configuration surface for concrete handlers.

    #[must_use]
    fn with_categories(
        mut self,
        categories: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_categories(categories);
        self
    }

    #[must_use]
    fn with_except(mut self, except: impl IntoIterator<Item = impl Into<String>>) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_except(except);
        self
    }

    #[must_use]
    fn with_levels(mut self, levels: impl IntoIterator<Item = Level>) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_levels(levels);
        self
    }

    #[must_use]
    fn with_common_context(mut self, common_context: Context) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_common_context(common_context);
        self
    }

    #[must_use]
    fn with_format(mut self, format: FormatFn) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_format(format);
        self
    }

    #[must_use]
    fn with_prefix(mut self, prefix: PrefixFn) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_prefix(prefix);
        self
    }

    #[must_use]
    fn with_export_interval(mut self, export_interval: usize) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_export_interval(export_interval);
        self
    }

    #[must_use]
    fn with_timestamp_format(mut self, timestamp_format: impl Into<String>) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_timestamp_format(timestamp_format);
        self
    }

    #[must_use]
    fn with_enabled_fn(mut self, enabled: EnabledFn) -> Self
    where
        Self: Sized,
    {
        self.state_mut().set_enabled_fn(enabled);
        self
    }
}
