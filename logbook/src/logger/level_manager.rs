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

//! Every verb of a [`LevelManager`] is gated on its level: when the level is not
//! accepted by the logger, nothing is rendered. Structured operations still run their
//! bodies, see [`crate::RunDecision`].

use std::{fmt::{Arguments, Display},
          io::{self, Write}};

use crate::{FitMode, Level, LogBlock, LogProcess, LogProcessInline, Logger, ProxyStream,
            Stream, Style, details_style, highlight_style};

/// A view of a [`Logger`] at one [`Level`]. Cheap to copy.
#[derive(Debug, Clone, Copy)]
pub struct LevelManager<'a> {
    logger: &'a Logger,
    level: Level,
}

mod constructors {
    use super::*;

    impl<'a> LevelManager<'a> {
        #[must_use]
        pub fn new(logger: &'a Logger, level: Level) -> Self { Self { logger, level } }
    }
}

mod accessors {
    use super::*;

    impl LevelManager<'_> {
        #[must_use]
        pub fn level(&self) -> Level { self.level }

        #[must_use]
        pub fn is_accepted(&self) -> bool {
            self.level.is_accepted_by(self.logger.accepted_level())
        }

        /// The default style of this level, used by the plain verbs and by the
        /// structured operations that are not given a style.
        #[must_use]
        pub fn style(&self) -> Style { self.logger.level_style(self.level) }

        pub fn set_style(&self, style: Style) { self.logger.set_level_style(self.level, style); }

        /// The stream that this level is routed to (out or err).
        #[must_use]
        pub fn output_stream(&self) -> Stream { self.logger.level_stream(self.level) }
    }
}

mod verbs {
    use super::*;

    impl LevelManager<'_> {
        fn log_custom(&self, style: &Style, text: &str) {
            if !self.is_accepted() {
                return;
            }
            self.output_stream()
                .format_and_log(style, text, FitMode::OneShot);
        }

        pub fn log(&self, text: impl Display) { self.log_custom(&self.style(), &text.to_string()); }

        pub fn log_ln(&self, text: impl Display) {
            self.log_custom(&self.style(), &format!("{text}\n"));
        }

        /// Use with [`format_args!`].
        pub fn log_f(&self, args: Arguments<'_>) {
            self.log_custom(&self.style(), &args.to_string());
        }

        pub fn log_details(&self, text: impl Display) {
            self.log_with_custom_style(&details_style(), text);
        }

        pub fn log_details_ln(&self, text: impl Display) {
            self.log_with_custom_style_ln(&details_style(), text);
        }

        pub fn log_details_f(&self, args: Arguments<'_>) {
            self.log_with_custom_style_f(&details_style(), args);
        }

        pub fn log_highlight(&self, text: impl Display) {
            self.log_with_custom_style(&highlight_style(), text);
        }

        pub fn log_highlight_ln(&self, text: impl Display) {
            self.log_with_custom_style_ln(&highlight_style(), text);
        }

        pub fn log_highlight_f(&self, args: Arguments<'_>) {
            self.log_with_custom_style_f(&highlight_style(), args);
        }

        pub fn log_with_custom_style(&self, style: &Style, text: impl Display) {
            self.log_custom(style, &text.to_string());
        }

        pub fn log_with_custom_style_ln(&self, style: &Style, text: impl Display) {
            self.log_custom(style, &format!("{text}\n"));
        }

        pub fn log_with_custom_style_f(&self, style: &Style, args: Arguments<'_>) {
            self.log_custom(style, &args.to_string());
        }

        /// Arms the optional line: a blank line that is only rendered if something else
        /// is logged after it.
        pub fn log_optional_ln(&self) {
            if !self.is_accepted() {
                return;
            }
            self.output_stream().state.enable_optional_ln();
        }
    }
}

mod structured {
    use super::*;

    impl<'a> LevelManager<'a> {
        #[must_use]
        pub fn log_block(&self, title: impl Into<String>) -> LogBlock<'a> {
            LogBlock::new(*self, self.output_stream(), title)
        }

        #[must_use]
        pub fn log_process_inline(&self, message: impl Into<String>) -> LogProcessInline<'a> {
            LogProcessInline::new(*self, self.output_stream(), message)
        }

        #[must_use]
        pub fn log_process(&self, message: impl Into<String>) -> LogProcess<'a> {
            LogProcess::new(*self, self.output_stream(), message)
        }

        /// A writer for arbitrary bytes (eg: the output of a child process) that renders
        /// them at this level.
        #[must_use]
        pub fn stream(&self) -> LevelStream<'a> {
            LevelStream {
                manager: *self,
                proxy: ProxyStream::new(self.output_stream(), self.style()),
            }
        }
    }
}

/// [`Write`] adapter returned by [`LevelManager::stream`]. Writes at a level that is
/// not accepted are swallowed (and reported as written).
#[derive(Debug, Clone)]
pub struct LevelStream<'a> {
    manager: LevelManager<'a>,
    proxy: ProxyStream,
}

impl Write for LevelStream<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.manager.is_accepted() {
            return Ok(buf.len());
        }
        self.proxy.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> { self.proxy.flush() }
}
