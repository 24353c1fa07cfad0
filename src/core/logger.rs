//! Central logger: buffering, enrichment, flush scheduling, and dispatch

use super::context::{Context, TraceFrame};
use super::error::Result;
use super::handler::Handler;
use super::level::{validate_level, Level};
use super::message::{Message, Payload};
use parking_lot::Mutex;
use std::sync::{Arc, LazyLock};
use std::time::{SystemTime, UNIX_EPOCH};
use sysinfo::{ProcessesToUpdate, System};

/// Buffer size at which an automatic flush is triggered; 0 disables
/// automatic flushing entirely.
pub const DEFAULT_FLUSH_INTERVAL: usize = 1000;

/// Category assigned to entries that do not carry one.
pub const DEFAULT_CATEGORY: &str = "application";

/// Produces the raw call stack for an entry, innermost frame first.
///
/// The default capture produces nothing; the crate's logging macros install
/// the call site as a single frame, and hosts with a richer stack source can
/// plug their own capture in via [`LoggerBuilder::trace_capture`].
pub type TraceCaptureFn = Arc<dyn Fn() -> Vec<TraceFrame> + Send + Sync>;

static MEMORY_PROBE: LazyLock<Mutex<System>> = LazyLock::new(|| Mutex::new(System::new()));

/// Current epoch time as fractional seconds, the `time` context format.
pub(crate) fn current_epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Resident memory of the current process in bytes, 0 when unavailable.
pub(crate) fn current_memory_usage() -> i64 {
    let Ok(pid) = sysinfo::get_current_pid() else {
        return 0;
    };
    let mut system = MEMORY_PROBE.lock();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).map(|p| p.memory() as i64).unwrap_or(0)
}

/// The public entry point of the pipeline.
///
/// Entries are enriched with `category`/`time`/`trace`/`memory` context,
/// buffered, and flushed to all registered handlers either when the buffer
/// reaches `flush_interval` or on an explicit [`flush`](Logger::flush).
/// Handler failures during dispatch are isolated: the failing handler is
/// disabled for the process lifetime and a warning diagnostic is delivered
/// to the remaining handlers; callers of `log` never observe them.
pub struct Logger {
    buffer: Mutex<Vec<Message>>,
    handlers: Mutex<Vec<Box<dyn Handler>>>,
    flush_interval: usize,
    trace_level: usize,
    excluded_trace_paths: Vec<String>,
    trace_capture: Option<TraceCaptureFn>,
}

impl Logger {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
            handlers: Mutex::new(Vec::new()),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            trace_level: 0,
            excluded_trace_paths: Vec::new(),
            trace_capture: None,
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn push_handler(&mut self, handler: Box<dyn Handler>) {
        self.handlers.lock().push(handler);
    }

    pub fn set_flush_interval(&mut self, flush_interval: usize) {
        self.flush_interval = flush_interval;
    }

    /// How many qualifying stack frames to retain per entry; 0 disables
    /// trace capture.
    pub fn set_trace_level(&mut self, trace_level: usize) {
        self.trace_level = trace_level;
    }

    /// Frames whose source path contains any of these substrings are
    /// skipped during trace collection.
    pub fn set_excluded_trace_paths(
        &mut self,
        paths: impl IntoIterator<Item = impl Into<String>>,
    ) {
        self.excluded_trace_paths = paths.into_iter().map(Into::into).collect();
    }

    pub fn set_trace_capture(&mut self, capture: TraceCaptureFn) {
        self.trace_capture = Some(capture);
    }

    /// Log an entry at the given level.
    ///
    /// If the payload is an error value and the context has no `exception`
    /// entry, the error is captured there so callers passing raw errors do
    /// not need to duplicate them.
    pub fn log(&self, level: Level, payload: impl Into<Payload>, context: Context) {
        let raw_stack = self
            .trace_capture
            .as_ref()
            .map(|capture| capture())
            .unwrap_or_default();
        self.log_with_stack(level, payload, context, &raw_stack);
    }

    /// Like [`log`](Self::log) with an explicit raw call stack; this is what
    /// the crate's macros call with the call-site frame.
    pub fn log_with_stack(
        &self,
        level: Level,
        payload: impl Into<Payload>,
        mut context: Context,
        raw_stack: &[TraceFrame],
    ) {
        let payload = payload.into();
        if let Some(err) = payload.as_error() {
            if !context.contains_key("exception") {
                context.insert("exception", err.to_string());
            }
        }
        context.insert_if_absent("category", DEFAULT_CATEGORY);
        context.insert_with_if_absent("time", current_epoch_seconds);
        context.insert_with_if_absent("trace", || self.collect_trace(raw_stack));
        context.insert_with_if_absent("memory", current_memory_usage);

        let message = Message::new(level, payload, context);
        let should_flush = {
            let mut buffer = self.buffer.lock();
            buffer.push(message);
            self.flush_interval > 0 && buffer.len() >= self.flush_interval
        };
        if should_flush {
            self.flush(false);
        }
    }

    /// Level-validating entry point for callers holding a level string.
    pub fn log_str(
        &self,
        level: &str,
        payload: impl Into<Payload>,
        context: Context,
    ) -> Result<()> {
        let level = validate_level(level)?;
        self.log(level, payload, context);
        Ok(())
    }

    pub fn emergency(&self, payload: impl Into<Payload>) {
        self.log(Level::Emergency, payload, Context::new());
    }

    pub fn alert(&self, payload: impl Into<Payload>) {
        self.log(Level::Alert, payload, Context::new());
    }

    pub fn critical(&self, payload: impl Into<Payload>) {
        self.log(Level::Critical, payload, Context::new());
    }

    pub fn error(&self, payload: impl Into<Payload>) {
        self.log(Level::Error, payload, Context::new());
    }

    pub fn warning(&self, payload: impl Into<Payload>) {
        self.log(Level::Warning, payload, Context::new());
    }

    pub fn notice(&self, payload: impl Into<Payload>) {
        self.log(Level::Notice, payload, Context::new());
    }

    pub fn info(&self, payload: impl Into<Payload>) {
        self.log(Level::Info, payload, Context::new());
    }

    pub fn debug(&self, payload: impl Into<Payload>) {
        self.log(Level::Debug, payload, Context::new());
    }

    /// Walk the raw stack innermost-first, skipping frames whose file path
    /// contains an excluded substring, keeping at most `trace_level` frames.
    pub fn collect_trace(&self, raw_stack: &[TraceFrame]) -> Vec<TraceFrame> {
        if self.trace_level == 0 {
            return Vec::new();
        }
        let mut frames = Vec::new();
        for frame in raw_stack {
            if self
                .excluded_trace_paths
                .iter()
                .any(|path| frame.file.contains(path))
            {
                continue;
            }
            frames.push(frame.clone());
            if frames.len() >= self.trace_level {
                break;
            }
        }
        frames
    }

    /// Drain the buffer and hand the batch to all enabled handlers.
    ///
    /// The buffer is swapped out before dispatch so messages logged while
    /// handlers run (e.g. by a failure diagnostic) land in a fresh buffer.
    /// `is_final` forces every handler to write regardless of its threshold;
    /// the host must guarantee one `flush(true)` before process exit.
    pub fn flush(&self, is_final: bool) {
        let batch = std::mem::take(&mut *self.buffer.lock());
        let mut handlers = self.handlers.lock();
        Self::dispatch(&mut handlers, &batch, is_final);
    }

    /// Iterate handlers in registration order inside a failure boundary.
    ///
    /// A handler that fails (error or panic) is disabled permanently and
    /// one warning diagnostic about it is queued; diagnostics are then
    /// re-dispatched with `final = true` to the still-enabled handlers.
    /// The recursion is bounded because each failing handler is disabled
    /// before the recursive pass.
    fn dispatch(handlers: &mut [Box<dyn Handler>], messages: &[Message], is_final: bool) {
        let mut errors: Vec<Message> = Vec::new();

        for handler in handlers.iter_mut() {
            if !handler.is_enabled() {
                continue;
            }

            let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler.collect(messages, is_final)
            }));
            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(panic_info) => Some(describe_panic(panic_info.as_ref())),
            };

            if let Some(description) = failure {
                let name = handler.name().to_string();
                handler.disable();
                errors.push(Message::new(
                    Level::Warning,
                    format!("Unable to send log via {}: {}", name, description),
                    Context::new()
                        .with("time", current_epoch_seconds())
                        .with("exception", description),
                ));
            }
        }

        if !errors.is_empty() {
            Self::dispatch(handlers, &errors, true);
        }
    }

    /// Read-only snapshot of the pending buffer, mainly for tests and
    /// introspection.
    pub fn buffered_messages(&self) -> Vec<Message> {
        self.buffer.lock().clone()
    }
}

fn describe_panic(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Stands in for a process shutdown hook: the pending buffer and
        // every handler's internal buffer are written out exactly once.
        self.flush(true);
    }
}

/// Builder for constructing a Logger with a fluent API
///
/// # Example
/// ```no_run
/// use log_relay::prelude::*;
///
/// let logger = Logger::builder()
///     .flush_interval(100)
///     .trace_level(3)
///     .handler(StreamHandler::stdout())
///     .build();
/// logger.info("pipeline ready");
/// ```
pub struct LoggerBuilder {
    flush_interval: usize,
    trace_level: usize,
    excluded_trace_paths: Vec<String>,
    trace_capture: Option<TraceCaptureFn>,
    handlers: Vec<Box<dyn Handler>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            trace_level: 0,
            excluded_trace_paths: Vec::new(),
            trace_capture: None,
            handlers: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn flush_interval(mut self, flush_interval: usize) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn trace_level(mut self, trace_level: usize) -> Self {
        self.trace_level = trace_level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn excluded_trace_paths(
        mut self,
        paths: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.excluded_trace_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn trace_capture(mut self, capture: TraceCaptureFn) -> Self {
        self.trace_capture = Some(capture);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn handler<H: Handler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            buffer: Mutex::new(Vec::new()),
            handlers: Mutex::new(self.handlers),
            flush_interval: self.flush_interval,
            trace_level: self.trace_level,
            excluded_trace_paths: self.excluded_trace_paths,
            trace_capture: self.trace_capture,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
