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

/// Environment variable that GitLab CI sets to `"true"` in its job runners.
pub const GITLAB_CI_ENV_VAR: &str = "GITLAB_CI";

/// Checks whether collapsible section markers should be emitted by default.
#[must_use]
pub fn is_gitlab_ci_from_env() -> bool {
    std::env::var(GITLAB_CI_ENV_VAR).is_ok_and(|value| value == "true")
}

/// Flags that change how a stream renders, as opposed to what it renders.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamModes {
    pub is_muted: bool,
    pub is_style_enabled: bool,
    pub is_line_wrapping_enabled: bool,
    /// When disabled, proxied writes (eg: subprocess output) bypass fitting and the
    /// service part of the line, and go to the sink as is.
    pub is_proxy_stream_data_formatting_enabled: bool,
    pub is_gitlab_collapsible_sections_enabled: bool,
    pub is_log_process_border_enabled: bool,
}

impl Default for StreamModes {
    fn default() -> Self {
        Self {
            is_muted: false,
            is_style_enabled: true,
            is_line_wrapping_enabled: true,
            is_proxy_stream_data_formatting_enabled: true,
            is_gitlab_collapsible_sections_enabled: false,
            is_log_process_border_enabled: true,
        }
    }
}

impl StreamModes {
    /// Turns off everything that decorates output: proxy formatting, process borders
    /// and line wrapping.
    pub fn disable_pretty_log(&mut self) {
        self.is_proxy_stream_data_formatting_enabled = false;
        self.is_log_process_border_enabled = false;
        self.is_line_wrapping_enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    fn test_disable_pretty_log() {
        let mut modes = StreamModes::default();
        modes.disable_pretty_log();
        assert!(!modes.is_proxy_stream_data_formatting_enabled);
        assert!(!modes.is_log_process_border_enabled);
        assert!(!modes.is_line_wrapping_enabled);
        assert!(modes.is_style_enabled);
    }

    #[test]
    #[serial]
    fn test_gitlab_ci_env() {
        let saved = std::env::var(GITLAB_CI_ENV_VAR).ok();

        // SAFETY: serialized with every other test that touches the environment.
        unsafe { std::env::set_var(GITLAB_CI_ENV_VAR, "true") };
        assert!(is_gitlab_ci_from_env());
        unsafe { std::env::set_var(GITLAB_CI_ENV_VAR, "1") };
        assert!(!is_gitlab_ci_from_env());
        unsafe { std::env::remove_var(GITLAB_CI_ENV_VAR) };
        assert!(!is_gitlab_ci_from_env());

        if let Some(value) = saved {
            unsafe { std::env::set_var(GITLAB_CI_ENV_VAR, value) };
        }
    }
}
