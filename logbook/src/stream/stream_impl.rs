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

use std::sync::MutexGuard;

use crate::{LogSink, LogbookResult, ProxyStream, SharedStreamState, StreamState, Style,
            escalate_sink_error, fit_text, ok};

/// How [`Stream::format_and_log`] wraps its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FitMode {
    /// The text is complete. Whatever is left at the end is flushed.
    #[default]
    OneShot,
    /// The text is a chunk of a longer stream. A trailing fragment without a line
    /// break is held back in the fitter of the state until more data arrives.
    Streaming,
}

/// Options for [`Stream::fit_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FitTextOptions {
    /// Spaces added in front of every fitted line. They count against the width.
    pub extra_indent_width: usize,
    /// Caps the stream width before the service width is taken off.
    pub max_width: Option<usize>,
    /// Fits to exactly this many columns, ignoring the stream width and the service.
    pub width: Option<usize>,
    pub mark_wrapped_line: bool,
}

/// One output (eg: stdout) of a logger. It pairs a byte sink with the state it shares
/// with the other output.
#[derive(Debug, Clone)]
pub struct Stream {
    pub sink: LogSink,
    pub state: SharedStreamState,
}

mod constructors {
    use super::*;

    impl Stream {
        #[must_use]
        pub fn new(sink: LogSink, state: SharedStreamState) -> Self { Self { sink, state } }

        /// A writer that pipes arbitrary bytes through the formatting pipeline of this
        /// stream.
        #[must_use]
        pub fn proxy(&self) -> ProxyStream { ProxyStream::new(self.clone(), Style::None) }
    }
}

mod emit {
    use super::*;

    impl Stream {
        pub fn lock_state(&self) -> MutexGuard<'_, StreamState> { self.state.lock() }

        /// Runs `render` under the state lock and writes what it returns before the lock
        /// is released, so concurrent writers never interleave within one render.
        ///
        /// # Panics
        ///
        /// If the sink fails, see [`escalate_sink_error`].
        pub fn emit(&self, render: impl FnOnce(&mut StreamState) -> String) {
            escalate_sink_error(self.try_emit(render));
        }

        /// Like [`Self::emit`], but a sink failure is returned instead.
        pub fn try_emit(
            &self,
            render: impl FnOnce(&mut StreamState) -> String,
        ) -> LogbookResult<()> {
            let mut state = self.lock_state();
            let output = render(&mut *state);
            if !output.is_empty() {
                self.sink.write_str(&output)?;
            }
            drop(state);
            ok!()
        }

        /// Writes `text` as is. No service part, no fitting, no cursor tracking.
        pub fn write_raw(&self, text: &str) { self.emit(|_| text.to_string()); }

        /// Adds the service part in front of each line of `text`.
        pub fn process_and_log(&self, text: &str) {
            self.emit(|state| state.process_text(text));
        }

        /// Styles, fits (when line wrapping is enabled) and then writes `text` with the
        /// service part in front of each line. Nothing happens while muted.
        pub fn format_and_log(&self, style: &Style, text: &str, mode: FitMode) {
            escalate_sink_error(self.try_format_and_log(style, text, mode));
        }

        /// Like [`Self::format_and_log`], but a sink failure is returned instead.
        pub fn try_format_and_log(
            &self,
            style: &Style,
            text: &str,
            mode: FitMode,
        ) -> LogbookResult<()> {
            self.try_emit(|state| state.format_and_fit(style, text, mode))
        }

        /// Renders the pending optional line, if there is one.
        pub fn apply_optional_ln(&self) { self.emit(StreamState::take_optional_ln); }

        /// Emits whatever the streaming fitter holds back.
        pub fn flush_fitter(&self) -> LogbookResult<()> {
            self.try_emit(|state| {
                if state.modes.is_muted || !state.fitter.has_incomplete_line() {
                    return String::new();
                }
                let content_width = state.content_width();
                let fitted = state.fitter.flush(content_width, true);
                state.process_text(&fitted)
            })
        }
    }
}

mod fitting {
    use super::*;

    impl Stream {
        /// Fits `text` for display inside this stream, without writing anything.
        #[must_use]
        pub fn fit_text(&self, text: &str, options: FitTextOptions) -> String {
            let line_width = match options.width {
                Some(width) => isize::try_from(width).unwrap_or(isize::MAX),
                None => {
                    let state = self.lock_state();
                    let width = match options.max_width {
                        Some(max_width) => state.width.min(max_width),
                        None => state.width,
                    };
                    let width = isize::try_from(width).unwrap_or(isize::MAX);
                    width - isize::try_from(state.service_width()).unwrap_or(0)
                }
            };
            fit_text_with_indent(
                text,
                line_width,
                options.extra_indent_width,
                options.mark_wrapped_line,
            )
        }
    }

    fn fit_text_with_indent(
        text: &str,
        line_width: isize,
        extra_indent_width: usize,
        mark_wrapped_line: bool,
    ) -> String {
        let content_width = line_width - isize::try_from(extra_indent_width).unwrap_or(0);
        let indent = " ".repeat(extra_indent_width);
        fit_text(text, content_width, mark_wrapped_line)
            .split('\n')
            .map(|line| format!("{indent}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

mod resets {
    use super::*;

    impl Stream {
        /// Ends every active process (rendering its footer), then resets the transient
        /// state. The width, the modes and the tag are kept.
        pub fn reset_state(&self) {
            let active = self.lock_state().active_processes.len();
            if active > 0 {
                tracing::warn!(
                    message = "resetting stream state with active processes",
                    active
                );
            }
            self.end_all_active_processes();
            self.state.lock().reset_state();
        }

        pub fn reset_modes(&self) { self.state.reset_modes(); }

        pub fn reset(&self) {
            self.reset_state();
            self.reset_modes();
        }
    }
}
