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

//! There are two kinds of failures that originate in this crate:
//!
//! 1. [`LogbookErrorCouldNot`]: the byte sink refused a write. A renderer that can't
//!    write has no degraded mode, so the rendering verbs turn this into a panic via
//!    [`escalate_sink_error`].
//! 2. [`ProcessLifecycleError`]: a [`crate::LogProcess`] was driven out of order (double
//!    start, end before start, etc). This is a bug in the caller and always panics.
//!
//! Errors returned by caller supplied process and block bodies are never wrapped; they
//! are handed back unchanged.

use std::io;

pub type LogbookResult<T> = Result<T, LogbookErrorCouldNot>;

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum LogbookErrorCouldNot {
    #[error("📝 Could not write rendered output to the sink")]
    #[diagnostic(
        code(r3bl_logbook::sink::write),
        help("The writer behind the stream was closed or is failing")
    )]
    WriteToSink {
        #[source]
        source: io::Error,
    },

    #[error("🚿 Could not flush the sink")]
    #[diagnostic(code(r3bl_logbook::sink::flush))]
    FlushSink {
        #[source]
        source: io::Error,
    },
}

#[derive(thiserror::Error, Debug, miette::Diagnostic, Clone, Copy, PartialEq, Eq)]
pub enum ProcessLifecycleError {
    #[error("process has been already started")]
    #[diagnostic(code(r3bl_logbook::process::already_started))]
    AlreadyStarted,

    #[error("process has been already launched")]
    #[diagnostic(code(r3bl_logbook::process::already_launched))]
    AlreadyLaunched,

    #[error("process has not been started yet")]
    #[diagnostic(code(r3bl_logbook::process::not_started))]
    NotStarted,
}

/// Turns a failed sink write into a panic. Logs it first, so the failure is visible to
/// a tracing subscriber even when the panic message itself is lost (eg: stderr is the
/// sink that failed).
///
/// # Panics
///
/// Always, when `result` is an [`Err`].
pub fn escalate_sink_error<T>(result: LogbookResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(error) => {
            tracing::error!(message = "sink write failed", ?error);
            panic!("{error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_lifecycle_messages() {
        assert_eq2!(
            ProcessLifecycleError::AlreadyStarted.to_string(),
            "process has been already started"
        );
        assert_eq2!(
            ProcessLifecycleError::AlreadyLaunched.to_string(),
            "process has been already launched"
        );
        assert_eq2!(
            ProcessLifecycleError::NotStarted.to_string(),
            "process has not been started yet"
        );
    }

    #[test]
    fn test_escalate_passes_ok_through() {
        assert_eq2!(escalate_sink_error(Ok(42)), 42);
    }

    #[test]
    #[should_panic(expected = "Could not write rendered output to the sink")]
    fn test_escalate_panics_on_err() {
        let error = LogbookErrorCouldNot::WriteToSink {
            source: io::Error::new(io::ErrorKind::BrokenPipe, "closed"),
        };
        escalate_sink_error::<()>(Err(error));
    }
}
