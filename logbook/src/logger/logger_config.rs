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

use smallvec::{SmallVec, smallvec};

use crate::{DEFAULT_WIDTH, Level, StreamModes, is_gitlab_ci_from_env};

/// Levels that go to the error stream unless configured otherwise.
pub type ErrStreamLevels = SmallVec<[Level; 2]>;

/// Everything a [`crate::Logger`] starts out with. Every field can be changed later
/// through the logger itself.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub width: usize,
    pub accepted_level: Level,
    /// Levels routed to the error stream. Every other level goes to the out stream.
    pub err_stream_levels: ErrStreamLevels,
    pub style_enabled: bool,
    pub line_wrapping_enabled: bool,
    pub log_process_border_enabled: bool,
    pub gitlab_collapsible_sections_enabled: bool,
}

/// [`Level::Error`] and [`Level::Warn`].
#[must_use]
pub fn default_err_stream_levels() -> ErrStreamLevels { smallvec![Level::Error, Level::Warn] }

impl Default for LoggerConfig {
    fn default() -> Self { Self::from_env() }
}

impl LoggerConfig {
    /// Defaults, except for collapsible sections which are enabled when running in a
    /// GitLab CI job.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            accepted_level: Level::Default,
            err_stream_levels: default_err_stream_levels(),
            style_enabled: true,
            line_wrapping_enabled: true,
            log_process_border_enabled: true,
            gitlab_collapsible_sections_enabled: is_gitlab_ci_from_env(),
        }
    }

    #[must_use]
    pub fn stream_modes(&self) -> StreamModes {
        StreamModes {
            is_style_enabled: self.style_enabled,
            is_line_wrapping_enabled: self.line_wrapping_enabled,
            is_log_process_border_enabled: self.log_process_border_enabled,
            is_gitlab_collapsible_sections_enabled: self.gitlab_collapsible_sections_enabled,
            ..StreamModes::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::{GITLAB_CI_ENV_VAR, assert_eq2};

    #[test]
    #[serial]
    fn test_from_env() {
        let saved = std::env::var(GITLAB_CI_ENV_VAR).ok();

        // SAFETY: serialized with every other test that touches the environment.
        unsafe { std::env::set_var(GITLAB_CI_ENV_VAR, "true") };
        let config = LoggerConfig::from_env();
        assert!(config.gitlab_collapsible_sections_enabled);
        assert!(config.stream_modes().is_gitlab_collapsible_sections_enabled);

        unsafe { std::env::remove_var(GITLAB_CI_ENV_VAR) };
        let config = LoggerConfig::default();
        assert!(!config.gitlab_collapsible_sections_enabled);
        assert_eq2!(config.width, 140);
        assert_eq2!(config.accepted_level, Level::Default);
        assert_eq2!(config.err_stream_levels.as_slice(), &[Level::Error, Level::Warn]);

        if let Some(value) = saved {
            unsafe { std::env::set_var(GITLAB_CI_ENV_VAR, value) };
        }
    }

    #[test]
    fn test_stream_modes() {
        let config = LoggerConfig {
            style_enabled: false,
            line_wrapping_enabled: false,
            ..LoggerConfig::from_env()
        };
        let modes = config.stream_modes();
        assert!(!modes.is_style_enabled);
        assert!(!modes.is_line_wrapping_enabled);
        assert!(modes.is_log_process_border_enabled);
        assert!(!modes.is_muted);
    }
}
