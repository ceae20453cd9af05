use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::logging::context::RequestContext;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

#[derive(Clone)]
enum Target {
    Stderr,
    Shared(SharedWriter),
}

/// A cloneable handle to a writable error stream.
///
/// The stream is borrowed, never closed: dropping the last handle only drops
/// the writer it wraps.
#[derive(Clone)]
pub struct ErrorStream {
    target: Target,
}

impl ErrorStream {
    /// The process's standard error.
    pub fn stderr() -> Self {
        Self { target: Target::Stderr }
    }

    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            target: Target::Shared(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    pub fn is_stderr(&self) -> bool {
        matches!(self.target, Target::Stderr)
    }

    /// Whether both handles write to the same underlying stream.
    pub fn same_stream(&self, other: &ErrorStream) -> bool {
        match (&self.target, &other.target) {
            (Target::Stderr, Target::Stderr) => true,
            (Target::Shared(a), Target::Shared(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Writes one formatted record followed by a newline, then flushes.
    pub fn write_line(&self, line: &str) -> Result<()> {
        match &self.target {
            Target::Stderr => {
                let mut err = io::stderr().lock();
                writeln!(err, "{}", line)?;
                err.flush()?;
            }
            Target::Shared(writer) => {
                let mut writer = writer.lock().map_err(|_| Error::poisoned("stream"))?;
                writeln!(writer, "{}", line)?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for ErrorStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Stderr => f.write_str("ErrorStream(stderr)"),
            Target::Shared(_) => f.write_str("ErrorStream(shared)"),
        }
    }
}

/// Where a handler obtains its stream for each record.
pub trait StreamSource: Send + Sync {
    fn stream(&self) -> ErrorStream;
}

impl StreamSource for ErrorStream {
    fn stream(&self) -> ErrorStream {
        self.clone()
    }
}

/// Resolves the stream at emission time via [`resolve_error_stream`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextStream;

impl StreamSource for ContextStream {
    fn stream(&self) -> ErrorStream {
        resolve_error_stream()
    }
}

/// The error stream of the request being handled, or stderr outside a request.
pub fn resolve_error_stream() -> ErrorStream {
    RequestContext::with_current(|ctx| ctx.errors().clone()).unwrap_or_else(ErrorStream::stderr)
}

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(poisoned) => String::from_utf8_lossy(&poisoned.into_inner()).into_owned(),
        }
    }

    pub fn stream(&self) -> ErrorStream {
        ErrorStream::new(self.clone())
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| io::Error::other("Mutex poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
