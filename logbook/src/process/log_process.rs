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

use std::{convert::Infallible,
          fmt::{self, Debug, Display, Formatter}};

use crate::{LevelManager, LogProcessOptions, ProcessLifecycleError, RunDecision, Stream};

type InfoSection<'a> = Box<dyn FnOnce(&dyn Display) + 'a>;
type SuccessInfoSection<'a> = Box<dyn FnOnce() + 'a>;

/// A timed process with a bordered body. Created by [`LevelManager::log_process`].
///
/// It can be driven in two ways, and each instance only once:
///
/// 1. [`Self::run`] / [`Self::try_run`] around a body.
/// 2. [`Self::start`], any number of [`Self::step_end`], then [`Self::end`] or
///    [`Self::fail`].
///
/// Driving it out of order is a bug in the caller and panics with a
/// [`ProcessLifecycleError`].
///
/// ```
/// use r3bl_logbook::{LogProcessOptions, LogSink, Logger};
///
/// let (out, mock) = LogSink::new_mock();
/// let (err, _) = LogSink::new_mock();
/// let logger = Logger::new(out, err);
/// logger.streams().disable_style();
/// logger.streams().disable_gitlab_collapsible_sections();
///
/// let mut process = logger
///     .log_process("deploy")
///     .options(LogProcessOptions::default().without_elapsed_time());
/// process.start();
/// process.step_end("uploaded");
/// process.end();
///
/// assert_eq!(
///     mock.get_copy_of_buffer_as_string(),
///     "┌ deploy\n├ uploaded\n└ deploy\n"
/// );
/// ```
pub struct LogProcess<'a> {
    manager: LevelManager<'a>,
    stream: Stream,
    message: String,
    options: LogProcessOptions,
    info_section: Option<InfoSection<'a>>,
    success_info_section: Option<SuccessInfoSection<'a>>,
    is_disabled: bool,
    is_started: bool,
    is_launched: bool,
    /// Whether [`Self::start`] rendered the header, so the footer must be rendered too.
    is_rendered: bool,
}

impl Debug for LogProcess<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogProcess")
            .field("message", &self.message)
            .field("options", &self.options)
            .field("is_disabled", &self.is_disabled)
            .field("is_started", &self.is_started)
            .field("is_launched", &self.is_launched)
            .finish_non_exhaustive()
    }
}

mod constructors {
    use super::*;

    impl<'a> LogProcess<'a> {
        #[must_use]
        pub fn new(
            manager: LevelManager<'a>,
            stream: Stream,
            message: impl Into<String>,
        ) -> Self {
            let options = LogProcessOptions::default().or_style(&manager.style());
            Self {
                manager,
                stream,
                message: message.into(),
                options,
                info_section: None,
                success_info_section: None,
                is_disabled: false,
                is_started: false,
                is_launched: false,
                is_rendered: false,
            }
        }

        #[must_use]
        pub fn disable(mut self) -> Self {
            self.is_disabled = true;
            self
        }

        #[must_use]
        pub fn enable(mut self) -> Self {
            self.is_disabled = false;
            self
        }

        #[must_use]
        pub fn options(mut self, options: LogProcessOptions) -> Self {
            self.options = options.or_style(&self.manager.style());
            self
        }

        /// Runs after a failed body, under an `Info` header, before the footer. It gets
        /// the error of the body.
        #[must_use]
        pub fn info_section(mut self, section: impl FnOnce(&dyn Display) + 'a) -> Self {
            self.info_section = Some(Box::new(section));
            self
        }

        /// Like [`Self::info_section`], but runs after a successful body.
        #[must_use]
        pub fn success_info_section(mut self, section: impl FnOnce() + 'a) -> Self {
            self.success_info_section = Some(Box::new(section));
            self
        }
    }
}

mod run {
    use super::*;

    impl LogProcess<'_> {
        pub(super) fn decision(&self) -> RunDecision {
            RunDecision::decide(
                self.is_disabled,
                self.manager.is_accepted(),
                self.options.disable_if_level_not_accepted,
                self.is_muted(),
            )
        }

        pub(super) fn is_muted(&self) -> bool { self.options.mute || self.stream.state.is_muted() }

        /// # Panics
        ///
        /// If this process was already started or run.
        pub fn run(&mut self, body: impl FnOnce()) {
            let _ = self.try_run(|| {
                body();
                Ok::<(), Infallible>(())
            });
        }

        /// # Errors
        ///
        /// Whatever `body` returns. It is handed back unchanged, after the footer is
        /// rendered with `FAILED`.
        ///
        /// # Panics
        ///
        /// If this process was already started or run.
        pub fn try_run<E: Display>(
            &mut self,
            body: impl FnOnce() -> Result<(), E>,
        ) -> Result<(), E> {
            self.assert_fresh();
            self.is_launched = true;

            match self.decision() {
                RunDecision::Skip => Ok(()),
                RunDecision::RunSilently => body(),
                RunDecision::Render => self.stream.log_process(
                    &self.message,
                    &self.options,
                    body,
                    self.info_section.take(),
                    self.success_info_section.take(),
                ),
            }
        }
    }
}

mod lifecycle {
    use super::*;

    impl LogProcess<'_> {
        pub(super) fn assert_fresh(&self) {
            if self.is_started {
                panic!("{}", ProcessLifecycleError::AlreadyStarted);
            }
            if self.is_launched {
                panic!("{}", ProcessLifecycleError::AlreadyLaunched);
            }
        }

        fn assert_running(&self) {
            if !self.is_started {
                panic!("{}", ProcessLifecycleError::NotStarted);
            }
            if self.is_launched {
                panic!("{}", ProcessLifecycleError::AlreadyLaunched);
            }
        }

        /// # Panics
        ///
        /// If this process was already started or run.
        pub fn start(&mut self) {
            self.assert_fresh();
            self.is_started = true;

            if self.decision() != RunDecision::Render {
                return;
            }
            self.is_rendered = true;
            self.stream
                .log_process_start(&self.message, &self.options.resolved_style());
        }

        /// # Panics
        ///
        /// If this process was not started, or was already ended.
        pub fn step_end(&mut self, message: impl AsRef<str>) {
            self.assert_running();
            if !self.is_rendered || self.is_muted() {
                return;
            }
            self.stream
                .log_process_step_end(message.as_ref(), &self.options.resolved_style());
        }

        /// # Panics
        ///
        /// If this process was not started, or was already ended.
        pub fn end(&mut self) {
            self.assert_running();
            self.is_launched = true;
            if self.is_rendered {
                self.stream.log_process_end(&self.options);
            }
        }

        /// # Panics
        ///
        /// If this process was not started, or was already ended.
        pub fn fail(&mut self) {
            self.assert_running();
            self.is_launched = true;
            if self.is_rendered {
                self.stream.log_process_fail(&self.options);
            }
        }
    }
}
