//! Stream handler: writes batched, formatted messages to a byte-stream sink

use crate::core::error::{LogError, Result};
use crate::core::handler::{Handler, HandlerState};
use fs2::FileExt;
use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

/// An already-open sink shared with the handler.
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Where a [`StreamHandler`] delivers its output.
///
/// `Path` targets are opened lazily in append mode on every write and closed
/// afterward, so nothing leaks across writes and a rotated/recreated file is
/// picked up automatically.
#[derive(Clone)]
pub enum StreamTarget {
    Stdout,
    Stderr,
    Path(PathBuf),
    Writer(SharedWriter),
}

impl fmt::Display for StreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamTarget::Stdout => write!(f, "stdout"),
            StreamTarget::Stderr => write!(f, "stderr"),
            StreamTarget::Path(path) => write!(f, "{}", path.display()),
            StreamTarget::Writer(_) => write!(f, "<writer>"),
        }
    }
}

/// Reference handler implementation backed by a byte stream.
pub struct StreamHandler {
    state: HandlerState,
    target: StreamTarget,
}

impl StreamHandler {
    pub fn new(target: StreamTarget) -> Self {
        Self {
            state: HandlerState::new(),
            target,
        }
    }

    pub fn stdout() -> Self {
        Self::new(StreamTarget::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(StreamTarget::Stderr)
    }

    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::new(StreamTarget::Path(path.into()))
    }

    pub fn writer(writer: SharedWriter) -> Self {
        Self::new(StreamTarget::Writer(writer))
    }
}

impl Handler for StreamHandler {
    fn state(&self) -> &HandlerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut HandlerState {
        &mut self.state
    }

    /// One write pass: render the buffered messages newline-joined and push
    /// them to the sink in a single write call.
    ///
    /// For path targets an exclusive lock is held across the write body and
    /// released on every exit path; the file handle is dropped afterward.
    fn write(&mut self) -> Result<()> {
        let payload = self.state.render_joined("\n")?;

        match &self.target {
            StreamTarget::Path(path) => {
                let target = path.display().to_string();
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|e| LogError::stream_open(target.clone(), e))?;
                FileExt::lock_exclusive(&file)
                    .map_err(|_| LogError::stream_lock(target.clone()))?;
                let result = file
                    .write_all(payload.as_bytes())
                    .and_then(|()| file.flush())
                    .map_err(|e| LogError::stream_write(target, e));
                let _ = FileExt::unlock(&file);
                result
            }
            StreamTarget::Stdout => {
                let stdout = std::io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(payload.as_bytes())
                    .and_then(|()| lock.flush())
                    .map_err(|e| LogError::stream_write("stdout", e))
            }
            StreamTarget::Stderr => {
                let stderr = std::io::stderr();
                let mut lock = stderr.lock();
                lock.write_all(payload.as_bytes())
                    .and_then(|()| lock.flush())
                    .map_err(|e| LogError::stream_write("stderr", e))
            }
            StreamTarget::Writer(writer) => {
                let mut guard = writer.lock();
                guard
                    .write_all(payload.as_bytes())
                    .and_then(|()| guard.flush())
                    .map_err(|e| LogError::stream_write("<writer>", e))
            }
        }
    }

    fn name(&self) -> &str {
        "StreamHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::Context;
    use crate::core::level::Level;
    use crate::core::message::Message;
    use std::io;

    /// In-memory sink whose contents stay readable after handing it over.
    #[derive(Clone, Default)]
    struct VecSink(Arc<Mutex<Vec<u8>>>);

    impl Write for VecSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn plain_handler(target: StreamTarget) -> StreamHandler {
        StreamHandler::new(target).with_format(Arc::new(|message, _| {
            Ok(format!("[{}] {}", message.level(), message.body()))
        }))
    }

    fn batch() -> Vec<Message> {
        vec![
            Message::new(Level::Info, "message-1", Context::new().with("foo", "bar")),
            Message::new(Level::Debug, "message-2", Context::new().with("foo", true)),
            Message::new(Level::Error, "message-3", Context::new().with("foo", 1i64)),
        ]
    }

    #[test]
    fn test_write_joins_with_newlines() {
        let sink = VecSink::default();
        let mut handler = plain_handler(StreamTarget::Writer(Arc::new(Mutex::new(Box::new(
            sink.clone(),
        )))));

        handler.collect(&batch(), true).unwrap();

        let written = String::from_utf8(sink.0.lock().clone()).unwrap();
        assert_eq!(
            written,
            "[info] message-1\n[debug] message-2\n[error] message-3\n"
        );
    }

    #[test]
    fn test_reopened_path_target_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("relay.log");
        let mut handler = plain_handler(StreamTarget::Path(path.clone()));

        handler.collect(&batch(), true).unwrap();
        handler.collect(&batch(), true).unwrap();

        let expected = "[info] message-1\n[debug] message-2\n[error] message-3\n";
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{}{}", expected, expected));
    }

    #[test]
    fn test_unopenable_path_is_stream_open_error() {
        let mut handler = plain_handler(StreamTarget::Path(PathBuf::from(
            "/nonexistent-dir/deeper/relay.log",
        )));
        let err = handler.collect(&batch(), true).unwrap_err();
        assert!(matches!(err, LogError::StreamOpen { .. }));
    }

    #[test]
    fn test_failed_write_surfaces_and_keeps_buffer() {
        struct BrokenSink;

        impl Write for BrokenSink {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "gone"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut handler =
            plain_handler(StreamTarget::Writer(Arc::new(Mutex::new(Box::new(BrokenSink)))));
        let err = handler.collect(&batch(), true).unwrap_err();
        assert!(matches!(err, LogError::StreamWrite { .. }));
        assert_eq!(handler.state().buffered().len(), 3);
    }
}
