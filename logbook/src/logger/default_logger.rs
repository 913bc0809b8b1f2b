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

use std::sync::LazyLock;

use crate::{LogSink, Logger};

static DEFAULT_LOGGER: LazyLock<Logger> =
    LazyLock::new(|| Logger::new(LogSink::new_stdout(), LogSink::new_stderr()));

/// Process wide logger that renders into stdout and stderr. It is created on first use.
/// Independent loggers can always be made with [`Logger::new`] instead.
pub fn default_logger() -> &'static Logger { &DEFAULT_LOGGER }

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::Level;

    #[test]
    #[serial]
    fn test_default_logger_is_a_singleton() {
        assert!(std::ptr::eq(default_logger(), default_logger()));

        let saved = default_logger().accepted_level();
        default_logger().set_accepted_level(Level::Debug);
        assert!(default_logger().is_accepted_level(Level::Debug));
        default_logger().set_accepted_level(saved);
    }
}
