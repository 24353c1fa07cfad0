//! Error types for the logging pipeline

pub type Result<T> = std::result::Result<T, LogError>;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// Level string outside the fixed severity set
    #[error("Invalid log message level \"{level}\" provided. The following values are supported: \
             \"emergency\", \"alert\", \"critical\", \"error\", \"warning\", \"notice\", \"info\", \"debug\".")]
    InvalidLevel { level: String },

    /// The `time` context value could not be parsed as epoch seconds
    #[error("Invalid timestamp value in message context: {value}")]
    InvalidTimestamp { value: String },

    /// A custom format or prefix hook failed
    #[error("Formatter hook \"{hook}\" failed: {message}")]
    FormatHook { hook: String, message: String },

    /// Stream sink could not be opened
    #[error("The \"{target}\" stream cannot be opened: {source}")]
    StreamOpen {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the stream sink failed
    #[error("Unable to export the log because of an error writing to \"{target}\": {source}")]
    StreamWrite {
        target: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to acquire the exclusive lock on a sink
    #[error("Failed to acquire exclusive lock on '{target}'")]
    StreamLock { target: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LogError {
    /// Create an invalid-level error
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LogError::InvalidLevel {
            level: level.into(),
        }
    }

    /// Create an invalid-timestamp error
    pub fn invalid_timestamp(value: impl Into<String>) -> Self {
        LogError::InvalidTimestamp {
            value: value.into(),
        }
    }

    /// Create a format-hook error
    pub fn format_hook(hook: impl Into<String>, message: impl Into<String>) -> Self {
        LogError::FormatHook {
            hook: hook.into(),
            message: message.into(),
        }
    }

    /// Create a stream-open error
    pub fn stream_open(target: impl Into<String>, source: std::io::Error) -> Self {
        LogError::StreamOpen {
            target: target.into(),
            source,
        }
    }

    /// Create a stream-write error
    pub fn stream_write(target: impl Into<String>, source: std::io::Error) -> Self {
        LogError::StreamWrite {
            target: target.into(),
            source,
        }
    }

    /// Create a stream-lock error
    pub fn stream_lock(target: impl Into<String>) -> Self {
        LogError::StreamLock {
            target: target.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LogError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LogError::invalid_level("verbose");
        assert!(matches!(err, LogError::InvalidLevel { .. }));

        let err = LogError::format_hook("format", "hook returned an error");
        assert!(matches!(err, LogError::FormatHook { .. }));

        let err = LogError::stream_lock("/var/log/app.log");
        assert!(matches!(err, LogError::StreamLock { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LogError::invalid_level("verbose");
        assert!(err.to_string().contains("\"verbose\""));
        assert!(err.to_string().contains("\"emergency\""));

        let err = LogError::invalid_timestamp("not-a-time");
        assert_eq!(
            err.to_string(),
            "Invalid timestamp value in message context: not-a-time"
        );

        let err = LogError::format_hook("prefix", "no prefix available");
        assert_eq!(
            err.to_string(),
            "Formatter hook \"prefix\" failed: no prefix available"
        );
    }

    #[test]
    fn test_stream_errors_carry_target() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LogError::stream_open("/var/log/app.log", io_err);
        assert!(err.to_string().contains("/var/log/app.log"));
        assert!(err.to_string().contains("access denied"));
    }
}
