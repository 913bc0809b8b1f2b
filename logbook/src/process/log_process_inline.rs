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

use std::convert::Infallible;

use crate::{LevelManager, LogProcessInlineOptions, RunDecision, Stream};

/// `message ... (0.12 seconds)` on a single line. Created by
/// [`LevelManager::log_process_inline`].
#[derive(Debug, Clone)]
pub struct LogProcessInline<'a> {
    manager: LevelManager<'a>,
    stream: Stream,
    message: String,
    options: LogProcessInlineOptions,
    is_disabled: bool,
}

impl<'a> LogProcessInline<'a> {
    #[must_use]
    pub fn new(manager: LevelManager<'a>, stream: Stream, message: impl Into<String>) -> Self {
        let options = LogProcessInlineOptions::default().or_style(&manager.style());
        Self {
            manager,
            stream,
            message: message.into(),
            options,
            is_disabled: false,
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
    pub fn options(mut self, options: LogProcessInlineOptions) -> Self {
        self.options = options.or_style(&self.manager.style());
        self
    }

    pub fn run(&self, body: impl FnOnce()) {
        let _ = self.try_run(|| {
            body();
            Ok::<(), Infallible>(())
        });
    }

    /// # Errors
    ///
    /// Whatever `body` returns. A failure is rendered as `FAILED` at the end of the line.
    pub fn try_run<E>(&self, body: impl FnOnce() -> Result<(), E>) -> Result<(), E> {
        match RunDecision::decide(
            self.is_disabled,
            self.manager.is_accepted(),
            self.options.disable_if_level_not_accepted,
            self.options.mute || self.stream.state.is_muted(),
        ) {
            RunDecision::Skip => Ok(()),
            RunDecision::RunSilently => body(),
            RunDecision::Render => {
                self.stream
                    .log_process_inline(&self.message, &self.options, body)
            }
        }
    }
}
