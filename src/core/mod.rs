//! Core pipeline types: messages, filters, formatting, handlers, and the logger

pub mod category_filter;
pub mod context;
pub mod error;
pub mod formatter;
pub mod handler;
pub mod level;
pub mod logger;
pub mod message;

pub use category_filter::CategoryFilter;
pub use context::{Context, ContextValue, TraceFrame};
pub use error::{LogError, Result};
pub use formatter::{FormatFn, Formatter, PrefixFn, DEFAULT_TIMESTAMP_FORMAT};
pub use handler::{EnabledFn, Handler, HandlerState};
pub use level::{validate_level, Level, LEVELS};
pub use logger::{
    Logger, LoggerBuilder, TraceCaptureFn, DEFAULT_CATEGORY, DEFAULT_FLUSH_INTERVAL,
};
pub use message::{Message, Payload};
