//! # Log Relay
//!
//! A buffered, handler-based logging pipeline: leveled entries with
//! contextual metadata are buffered, filtered, formatted, and dispatched to
//! one or more pluggable output handlers, with batching to amortize I/O and
//! isolation of individual handler failures.
//!
//! ## Features
//!
//! - **Batched Dispatch**: entries are buffered and flushed to all handlers
//!   at a configurable interval; each handler batches again at its own
//!   export threshold
//! - **Per-Handler Filtering**: severity-level sets and glob-like category
//!   include/exclude rules, independent per handler
//! - **Deterministic Formatting**: placeholder substitution, configurable
//!   timestamps, and byte-stable context blocks, with custom format and
//!   prefix hooks
//! - **Failure Isolation**: a failing handler is disabled and reported to
//!   the remaining handlers; callers never observe handler errors

pub mod core;
pub mod handlers;
pub mod macros;

pub mod prelude {
    pub use crate::core::{
        validate_level, CategoryFilter, Context, ContextValue, EnabledFn, FormatFn, Formatter,
        Handler, HandlerState, Level, LogError, Logger, LoggerBuilder, Message, Payload, PrefixFn,
        Result, TraceCaptureFn, TraceFrame, DEFAULT_CATEGORY, DEFAULT_FLUSH_INTERVAL,
        DEFAULT_TIMESTAMP_FORMAT, LEVELS,
    };
    pub use crate::handlers::{SharedWriter, StreamHandler, StreamTarget};
}

pub use crate::core::{
    validate_level, CategoryFilter, Context, ContextValue, EnabledFn, FormatFn, Formatter, Handler,
    HandlerState, Level, LogError, Logger, LoggerBuilder, Message, Payload, PrefixFn, Result,
    TraceCaptureFn, TraceFrame, DEFAULT_CATEGORY, DEFAULT_FLUSH_INTERVAL, DEFAULT_TIMESTAMP_FORMAT,
    LEVELS,
};
pub use crate::handlers::{SharedWriter, StreamHandler, StreamTarget};
