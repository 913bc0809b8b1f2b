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

use std::{fmt::{Arguments, Display},
          sync::{MutexGuard, PoisonError,
                 atomic::{AtomicI8, Ordering}}};

use strum::EnumCount;

use crate::{ErrStreamLevels, FitTextOptions, Level, LevelManager, LevelStream, LogBlock,
            LogProcess, LogProcessInline, LogSink, LoggerConfig, SharedStreamState,
            StdMutex, Stream, Style, default_err_stream_levels};

type LevelStyles = [Style; Level::COUNT];

/// Renders log calls into two sinks, conventionally stdout and stderr. Both streams
/// share one [`SharedStreamState`], so a process started on one of them is bordered on
/// the other one too.
///
/// - Levels are selected with [`Self::error`], [`Self::warn`], [`Self::default_level`],
///   [`Self::info`] and [`Self::debug`]. The verbs on the logger itself log at
///   [`Level::Default`].
/// - [`Self::streams`] controls the width, modes, indent, tag and prefix.
///
/// A logger is [`Sync`]; it can be used from several threads at once.
#[derive(Debug)]
pub struct Logger {
    accepted_level: AtomicI8,
    level_styles: StdMutex<LevelStyles>,
    err_stream_levels: StdMutex<ErrStreamLevels>,
    state: SharedStreamState,
    out_stream: Stream,
    err_stream: Stream,
}

mod constructors {
    use super::*;

    impl Logger {
        /// Uses [`LoggerConfig::default`].
        #[must_use]
        pub fn new(out: LogSink, err: LogSink) -> Self {
            Self::new_with_config(out, err, LoggerConfig::default())
        }

        #[must_use]
        pub fn new_with_config(out: LogSink, err: LogSink, config: LoggerConfig) -> Self {
            let state = SharedStreamState::new(config.width, config.stream_modes());
            let logger = Self::new_with_state(out, err, state);
            logger.set_accepted_level(config.accepted_level);
            logger.set_err_stream_levels(config.err_stream_levels);
            logger
        }

        fn new_with_state(out: LogSink, err: LogSink, state: SharedStreamState) -> Self {
            Self {
                accepted_level: AtomicI8::new(Level::Default.as_i8()),
                level_styles: StdMutex::new(std::array::from_fn(|_| Style::None)),
                err_stream_levels: StdMutex::new(default_err_stream_levels()),
                out_stream: Stream::new(out, state.clone()),
                err_stream: Stream::new(err, state.clone()),
                state,
            }
        }

        /// Copies the accepted level, the error stream levels and the level styles.
        fn inherit_settings_from(self, other: &Logger) -> Self {
            self.set_accepted_level(other.accepted_level());
            self.set_err_stream_levels(other.err_stream_levels());
            *lock(&self.level_styles) = lock(&other.level_styles).clone();
            self
        }

        /// A logger for a nested context (eg: the output of a sub command). Its width is
        /// the content width of this logger, and it starts with its own fresh state that
        /// only carries over the modes.
        #[must_use]
        pub fn new_sub_logger(&self, out: LogSink, err: LogSink) -> Self {
            Self::new_with_state(out, err, self.state.sub_state()).inherit_settings_from(self)
        }

        /// A logger that renders into other sinks, but shares the stream state of this
        /// logger: borders, indent and processes are common to both.
        #[must_use]
        pub fn new_shared_logger(&self, out: LogSink, err: LogSink) -> Self {
            Self::new_with_state(out, err, self.state.clone()).inherit_settings_from(self)
        }

        /// Replaces the stream settings of this logger with a copy of those of `other`.
        /// Transient state (borders, processes, cursor) starts over.
        pub fn get_streams_settings_from(&self, other: &Logger) {
            let copied = other.state.lock().copied_state();
            *self.state.lock() = copied;
        }
    }
}

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

mod levels {
    use super::*;

    impl Logger {
        #[must_use]
        pub fn level(&self, level: Level) -> LevelManager<'_> { LevelManager::new(self, level) }

        #[must_use]
        pub fn error(&self) -> LevelManager<'_> { self.level(Level::Error) }

        #[must_use]
        pub fn warn(&self) -> LevelManager<'_> { self.level(Level::Warn) }

        #[must_use]
        pub fn default_level(&self) -> LevelManager<'_> { self.level(Level::Default) }

        #[must_use]
        pub fn info(&self) -> LevelManager<'_> { self.level(Level::Info) }

        #[must_use]
        pub fn debug(&self) -> LevelManager<'_> { self.level(Level::Debug) }

        #[must_use]
        pub fn accepted_level(&self) -> Level {
            Level::from_i8(self.accepted_level.load(Ordering::Relaxed))
        }

        pub fn set_accepted_level(&self, level: Level) {
            self.accepted_level.store(level.as_i8(), Ordering::Relaxed);
        }

        #[must_use]
        pub fn is_accepted_level(&self, level: Level) -> bool {
            level.is_accepted_by(self.accepted_level())
        }

        #[must_use]
        pub fn level_style(&self, level: Level) -> Style {
            lock(&self.level_styles)[level.index()].clone()
        }

        pub fn set_level_style(&self, level: Level, style: Style) {
            lock(&self.level_styles)[level.index()] = style;
        }
    }
}

mod routing {
    use super::*;

    impl Logger {
        /// Levels in this list are written to the err stream, all the others to the out
        /// stream.
        pub fn set_err_stream_levels(&self, levels: impl IntoIterator<Item = Level>) {
            *lock(&self.err_stream_levels) = levels.into_iter().collect();
        }

        #[must_use]
        pub fn err_stream_levels(&self) -> ErrStreamLevels {
            lock(&self.err_stream_levels).clone()
        }

        #[must_use]
        pub fn level_stream(&self, level: Level) -> Stream {
            if lock(&self.err_stream_levels).contains(&level) {
                self.err_stream.clone()
            } else {
                self.out_stream.clone()
            }
        }

        /// Controls for the state shared by both streams.
        #[must_use]
        pub fn streams(&self) -> &SharedStreamState { &self.state }

        /// Writer at [`Level::Default`].
        #[must_use]
        pub fn out_stream(&self) -> LevelStream<'_> { self.default_level().stream() }

        /// Writer at [`Level::Error`].
        #[must_use]
        pub fn err_stream(&self) -> LevelStream<'_> { self.error().stream() }
    }
}

mod default_level_verbs {
    use super::*;

    impl Logger {
        pub fn log(&self, text: impl Display) { self.default_level().log(text); }

        pub fn log_ln(&self, text: impl Display) { self.default_level().log_ln(text); }

        pub fn log_f(&self, args: Arguments<'_>) { self.default_level().log_f(args); }

        pub fn log_details(&self, text: impl Display) { self.default_level().log_details(text); }

        pub fn log_details_ln(&self, text: impl Display) {
            self.default_level().log_details_ln(text);
        }

        pub fn log_details_f(&self, args: Arguments<'_>) {
            self.default_level().log_details_f(args);
        }

        pub fn log_highlight(&self, text: impl Display) {
            self.default_level().log_highlight(text);
        }

        pub fn log_highlight_ln(&self, text: impl Display) {
            self.default_level().log_highlight_ln(text);
        }

        pub fn log_highlight_f(&self, args: Arguments<'_>) {
            self.default_level().log_highlight_f(args);
        }

        pub fn log_with_custom_style(&self, style: &Style, text: impl Display) {
            self.default_level().log_with_custom_style(style, text);
        }

        pub fn log_with_custom_style_ln(&self, style: &Style, text: impl Display) {
            self.default_level().log_with_custom_style_ln(style, text);
        }

        pub fn log_with_custom_style_f(&self, style: &Style, args: Arguments<'_>) {
            self.default_level().log_with_custom_style_f(style, args);
        }

        pub fn log_optional_ln(&self) { self.default_level().log_optional_ln(); }

        #[must_use]
        pub fn log_block(&self, title: impl Into<String>) -> LogBlock<'_> {
            self.default_level().log_block(title)
        }

        #[must_use]
        pub fn log_process_inline(&self, message: impl Into<String>) -> LogProcessInline<'_> {
            self.default_level().log_process_inline(message)
        }

        #[must_use]
        pub fn log_process(&self, message: impl Into<String>) -> LogProcess<'_> {
            self.default_level().log_process(message)
        }
    }
}

mod text {
    use super::*;

    impl Logger {
        /// Fits `text` to the content width of the out stream, without writing it.
        #[must_use]
        pub fn fit_text(&self, text: &str, options: FitTextOptions) -> String {
            self.out_stream.fit_text(text, options)
        }

        /// Applies `style`, unless styling is disabled for the streams.
        #[must_use]
        pub fn colorize(&self, style: &Style, text: impl Display) -> String {
            self.state.lock().format_with_style(style, &text.to_string())
        }
    }
}

mod resets {
    use super::*;

    impl Logger {
        /// Ends every active process, then resets the state and the modes of the
        /// streams.
        pub fn reset(&self) { self.out_stream.reset(); }

        pub fn reset_state(&self) { self.out_stream.reset_state(); }

        pub fn reset_modes(&self) { self.out_stream.reset_modes(); }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{LogProcessOptions, SinkMock, assert_eq2};

    fn test_config() -> LoggerConfig {
        LoggerConfig {
            style_enabled: false,
            gitlab_collapsible_sections_enabled: false,
            ..LoggerConfig::from_env()
        }
    }

    fn logger() -> (Logger, SinkMock, SinkMock) {
        let (out, out_mock) = LogSink::new_mock();
        let (err, err_mock) = LogSink::new_mock();
        (Logger::new_with_config(out, err, test_config()), out_mock, err_mock)
    }

    #[test]
    fn test_borders_are_shared_between_out_and_err() {
        let (logger, out_mock, err_mock) = logger();
        logger
            .log_process("build")
            .options(LogProcessOptions::default().without_elapsed_time())
            .run(|| {
                logger.error().log_ln("oops");
            });
        assert_eq2!(out_mock.get_copy_of_buffer_as_string(), "┌ build\n└ build\n");
        assert_eq2!(err_mock.get_copy_of_buffer_as_string(), "│ oops\n");
    }

    #[test]
    fn test_set_err_stream_levels() {
        let (logger, out_mock, err_mock) = logger();
        logger.set_err_stream_levels([Level::Default]);
        logger.log_ln("to err");
        logger.error().log_ln("to out");
        assert_eq2!(err_mock.get_copy_of_buffer_as_string(), "to err\n");
        assert_eq2!(out_mock.get_copy_of_buffer_as_string(), "to out\n");
    }

    #[test]
    fn test_sub_logger() {
        let (logger, _, _) = logger();
        logger.set_accepted_level(Level::Info);
        logger.info().set_style(Style::Bold);
        logger.streams().set_width(40);
        logger.streams().set_tag("tag");

        let (out, sub_out_mock) = LogSink::new_mock();
        let (err, _) = LogSink::new_mock();
        let sub_logger = logger.new_sub_logger(out, err);

        assert_eq2!(sub_logger.accepted_level(), Level::Info);
        assert_eq2!(sub_logger.level_style(Level::Info), Style::Bold);
        // "tag  " takes 5 columns of the parent.
        assert_eq2!(sub_logger.streams().width(), 35);
        assert!(!sub_logger.streams().ptr_eq(logger.streams()));

        sub_logger.log_ln("sub");
        assert_eq2!(sub_out_mock.get_copy_of_buffer_as_string(), "sub\n");
    }

    #[test]
    fn test_shared_logger() {
        let (logger, out_mock, _) = logger();
        let (out, shared_out_mock) = LogSink::new_mock();
        let (err, _) = LogSink::new_mock();
        let shared = logger.new_shared_logger(out, err);
        assert!(shared.streams().ptr_eq(logger.streams()));

        let mut process = logger
            .log_process("outer")
            .options(LogProcessOptions::default().without_elapsed_time());
        process.start();
        shared.log_ln("inner");
        process.end();

        assert_eq2!(out_mock.get_copy_of_buffer_as_string(), "┌ outer\n└ outer\n");
        assert_eq2!(shared_out_mock.get_copy_of_buffer_as_string(), "│ inner\n");
    }

    #[test]
    fn test_get_streams_settings_from() {
        let (logger, _, _) = logger();
        let (other, _, _) = logger_with_width(60);
        other.streams().set_tag("t");
        logger.get_streams_settings_from(&other);
        assert_eq2!(logger.streams().width(), 60);
        assert_eq2!(logger.streams().tag().value, "t");
        assert!(!logger.streams().ptr_eq(other.streams()));

        // Same state on both sides must not deadlock.
        logger.get_streams_settings_from(&logger);
    }

    fn logger_with_width(width: usize) -> (Logger, SinkMock, SinkMock) {
        let (out, out_mock) = LogSink::new_mock();
        let (err, err_mock) = LogSink::new_mock();
        let config = LoggerConfig {
            width,
            ..test_config()
        };
        (Logger::new_with_config(out, err, config), out_mock, err_mock)
    }

    #[test]
    fn test_reset_state_ends_active_processes() {
        let (logger, out_mock, _) = logger();
        let mut process = logger
            .log_process("left open")
            .options(LogProcessOptions::default().without_elapsed_time());
        process.start();
        logger.streams().increase_indent();
        logger.reset_state();

        assert_eq2!(logger.streams().indent_width(), 0);
        logger.log_ln("after");
        let output = out_mock.get_copy_of_buffer_as_string();
        assert!(output.starts_with("┌ left open\n└ left open ("));
        assert!(output.ends_with(" seconds)\nafter\n"));

        // Ending it afterwards renders nothing.
        process.end();
        assert!(
            out_mock
                .get_copy_of_buffer_as_string()
                .ends_with("after\n")
        );
    }

    #[test]
    fn test_colorize_and_fit_text() {
        let (logger, _, _) = logger_with_width(10);
        assert_eq2!(logger.colorize(&Style::Bold, "x"), "x");
        logger.streams().enable_style();
        assert_eq2!(logger.colorize(&Style::Bold, "x"), "\x1b[1mx\x1b[0m");
        assert_eq2!(
            logger.fit_text("foo bar data", FitTextOptions::default()),
            "foo bar   \ndata"
        );
    }

    #[test]
    fn test_concurrent_writers_do_not_interleave_lines() {
        let (logger, out_mock, _) = logger();
        thread::scope(|scope| {
            for id in 0..4 {
                let logger = &logger;
                scope.spawn(move || {
                    for _ in 0..50 {
                        logger.log_ln(format!("line from {id}"));
                    }
                });
            }
        });
        let output = out_mock.get_copy_of_buffer_as_string();
        assert_eq2!(output.lines().count(), 200);
        assert!(output.lines().all(|line| line.starts_with("line from ")));
    }
}
