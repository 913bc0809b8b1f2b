/*
 *   Copyright (c) 2025 R3BL LLC
 *   All rights reserved.
 *
 *   Licensed under the Apache License, Version 2.0 (the "License");
 *   you may not use this file except in compliance with the License.
 *   You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 *   Unless required by applicable law or agreed to in writing, software
 *   distributed under the License is distributed on an "AS IS" BASIS,
 *   WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *   See the License for the specific language governing permissions and
 *   limitations under the License.
 */

use std::{fmt::{Debug, Formatter},
          io::Write,
          sync::{Arc, MutexGuard, PoisonError}};

use super::SinkMock;
use crate::{LogbookErrorCouldNot, LogbookResult, StdMutex, ok};

pub type SendWriter = dyn Write + Send;
pub type SafeWriter = Arc<StdMutex<SendWriter>>;

/// One of the two byte sinks that a [`crate::Logger`] renders into (conventionally
/// stdout and stderr).
/// - It is safe to clone, clones point to the same writer.
/// - Each call to [`Self::write_str`] holds the writer lock for the whole write, so
///   concurrent writers never interleave within one rendered chunk.
#[derive(Clone)]
pub struct LogSink {
    pub resource: SafeWriter,
    pub is_mock: bool,
}

impl Debug for LogSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSink")
            .field("is_mock", &self.is_mock)
            .finish_non_exhaustive()
    }
}

impl Default for LogSink {
    fn default() -> Self { Self::new_stdout() }
}

impl LogSink {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stdout())),
            is_mock: false,
        }
    }

    #[must_use]
    pub fn new_stderr() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stderr())),
            is_mock: false,
        }
    }

    #[must_use]
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            resource: Arc::new(StdMutex::new(writer)),
            is_mock: false,
        }
    }

    /// Returns a sink that writes into memory, and the [`SinkMock`] that can be used to
    /// read back what was written.
    #[must_use]
    pub fn new_mock() -> (Self, SinkMock) {
        let mock = SinkMock::new();
        let sink = Self {
            resource: Arc::new(StdMutex::new(mock.clone())),
            is_mock: true,
        };
        (sink, mock)
    }
}

impl LogSink {
    /// Locks the writer. A poisoned lock is recovered, since a panic in some other
    /// writer leaves the byte sink itself intact.
    pub fn lock(&self) -> MutexGuard<'_, SendWriter> {
        self.resource.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes and flushes `text`.
    ///
    /// # Errors
    ///
    /// If the underlying writer fails.
    pub fn write_str(&self, text: &str) -> LogbookResult<()> {
        self.write_bytes(text.as_bytes())
    }

    /// Writes and flushes `bytes` as is.
    ///
    /// # Errors
    ///
    /// If the underlying writer fails.
    pub fn write_bytes(&self, bytes: &[u8]) -> LogbookResult<()> {
        if bytes.is_empty() {
            return ok!();
        }
        let mut writer = self.lock();
        writer
            .write_all(bytes)
            .map_err(|source| LogbookErrorCouldNot::WriteToSink { source })?;
        writer
            .flush()
            .map_err(|source| LogbookErrorCouldNot::FlushSink { source })?;
        ok!()
    }

    /// # Errors
    ///
    /// If the underlying writer fails to flush.
    pub fn flush(&self) -> LogbookResult<()> {
        self.lock()
            .flush()
            .map_err(|source| LogbookErrorCouldNot::FlushSink { source })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::assert_eq2;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    #[test]
    fn test_mock_sink_collects_writes() {
        let (sink, mock) = LogSink::new_mock();
        assert!(sink.is_mock);
        sink.write_str("hello ").unwrap();
        sink.clone().write_str("world").unwrap();
        assert_eq2!(mock.get_copy_of_buffer_as_string(), "hello world");
    }

    #[test]
    fn test_stdout_sink_is_not_mock() {
        assert!(!LogSink::new_stdout().is_mock);
        assert!(!LogSink::new_stderr().is_mock);
    }

    #[test]
    fn test_failing_writer_reports_error() {
        let sink = LogSink::from_writer(FailingWriter);
        let result = sink.write_str("x");
        assert!(matches!(
            result,
            Err(LogbookErrorCouldNot::WriteToSink { .. })
        ));
    }

    #[test]
    fn test_empty_write_is_noop() {
        let sink = LogSink::from_writer(FailingWriter);
        assert!(sink.write_str("").is_ok());
    }
}
