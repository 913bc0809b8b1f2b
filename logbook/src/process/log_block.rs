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

use crate::{LevelManager, LogBlockOptions, Stream};

/// What a structured operation does when it is run. Shared by all the builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunDecision {
    /// Neither render nor run the body.
    Skip,
    /// Run the body without rendering anything.
    RunSilently,
    Render,
}

impl RunDecision {
    /// Disabled builder, then level gating, then muting, in that order.
    #[must_use]
    pub fn decide(
        is_disabled: bool,
        is_level_accepted: bool,
        disable_if_level_not_accepted: bool,
        is_muted: bool,
    ) -> Self {
        if is_disabled {
            RunDecision::Skip
        } else if !is_level_accepted {
            if disable_if_level_not_accepted {
                RunDecision::Skip
            } else {
                RunDecision::RunSilently
            }
        } else if is_muted {
            RunDecision::RunSilently
        } else {
            RunDecision::Render
        }
    }
}

/// A titled block around a body. Created by [`LevelManager::log_block`].
///
/// ```text
/// ┌ title
/// │ body
/// └ title
/// ```
#[derive(Debug, Clone)]
pub struct LogBlock<'a> {
    manager: LevelManager<'a>,
    stream: Stream,
    title: String,
    options: LogBlockOptions,
    is_disabled: bool,
}

impl<'a> LogBlock<'a> {
    #[must_use]
    pub fn new(manager: LevelManager<'a>, stream: Stream, title: impl Into<String>) -> Self {
        let options = LogBlockOptions::default().or_style(&manager.style());
        Self {
            manager,
            stream,
            title: title.into(),
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

    /// Replaces the options. Without an explicit style, the style of the level is used.
    #[must_use]
    pub fn options(mut self, options: LogBlockOptions) -> Self {
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
    /// Whatever `body` returns. It is handed back unchanged.
    pub fn try_run<E>(&self, body: impl FnOnce() -> Result<(), E>) -> Result<(), E> {
        match RunDecision::decide(
            self.is_disabled,
            self.manager.is_accepted(),
            self.options.disable_if_level_not_accepted,
            self.options.mute || self.stream.state.is_muted(),
        ) {
            RunDecision::Skip => Ok(()),
            RunDecision::RunSilently => body(),
            RunDecision::Render => self.stream.log_block(&self.title, &self.options, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case(true,  true,  false, false => RunDecision::Skip        ; "disabled")]
    #[test_case(false, false, true,  false => RunDecision::Skip        ; "not accepted and disabled")]
    #[test_case(false, false, false, false => RunDecision::RunSilently ; "not accepted")]
    #[test_case(false, true,  false, true  => RunDecision::RunSilently ; "muted")]
    #[test_case(false, false, false, true  => RunDecision::RunSilently ; "not accepted and muted")]
    #[test_case(false, true,  true,  false => RunDecision::Render      ; "accepted")]
    fn test_decide(
        is_disabled: bool,
        is_level_accepted: bool,
        disable_if_level_not_accepted: bool,
        is_muted: bool,
    ) -> RunDecision {
        RunDecision::decide(
            is_disabled,
            is_level_accepted,
            disable_if_level_not_accepted,
            is_muted,
        )
    }
}
