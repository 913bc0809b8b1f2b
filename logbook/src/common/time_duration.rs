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

use std::{fmt::{Display, Formatter, Result},
          time::Duration};

use crate::ok;

/// Width (in columns) that a duration prefix is padded or truncated to, not counting
/// the trailing space separator.
pub const DURATION_PREFIX_WIDTH: usize = 12;

/// Wrapper around [Duration] used for the timing that is appended to process footers,
/// eg: `build (1.92 seconds)`.
///
/// ```rust
/// use std::time::Duration;
/// use r3bl_logbook::ElapsedTime;
/// let elapsed = ElapsedTime::from(Duration::from_millis(1_234));
/// assert_eq!(elapsed.to_string(), "1.23 seconds");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ElapsedTime {
    pub inner: Duration,
}

mod converters {
    use super::*;

    impl From<Duration> for ElapsedTime {
        fn from(duration: Duration) -> Self { Self { inner: duration } }
    }

    impl From<ElapsedTime> for Duration {
        fn from(elapsed: ElapsedTime) -> Self { elapsed.inner }
    }
}

mod display_formatter {
    use super::*;

    impl Display for ElapsedTime {
        fn fmt(&self, f: &mut Formatter<'_>) -> Result {
            write!(f, "{:.2} seconds", self.inner.as_secs_f64())?;
            ok!()
        }
    }
}

/// The widest footer timing that a process inline message reserves room for.
#[must_use]
pub fn reserved_elapsed_time_width() -> usize {
    ElapsedTime::from(Duration::from_secs(1234)).to_string().len()
}

/// Formats the time since some start instant for use as a line prefix. The debug
/// representation of [Duration] is used (eg: `1.5ms`, `2.000341s`), padded or truncated
/// to [`DURATION_PREFIX_WIDTH`] columns, then a single space separator.
#[must_use]
pub fn format_duration_prefix(duration: Duration) -> String {
    let mut text = format!("{duration:?}");
    if text.len() > DURATION_PREFIX_WIDTH {
        text.truncate(DURATION_PREFIX_WIDTH);
    }
    format!("{text:<DURATION_PREFIX_WIDTH$} ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_elapsed_time_display() {
        assert_eq2!(ElapsedTime::default().to_string(), "0.00 seconds");
        assert_eq2!(
            ElapsedTime::from(Duration::from_millis(1_005)).to_string(),
            "1.00 seconds"
        );
        assert_eq2!(
            ElapsedTime::from(Duration::from_secs(61)).to_string(),
            "61.00 seconds"
        );
    }

    #[test]
    fn test_reserved_width() {
        assert_eq2!(reserved_elapsed_time_width(), "1234.00 seconds".len());
    }

    #[test]
    fn test_duration_prefix_is_fixed_width() {
        let short = format_duration_prefix(Duration::from_millis(5));
        assert_eq2!(short, "5ms          ");
        assert_eq2!(short.len(), DURATION_PREFIX_WIDTH + 1);

        let long = format_duration_prefix(Duration::new(2, 123_456_789));
        assert_eq2!(long, "2.123456789s ");
        assert_eq2!(long.len(), DURATION_PREFIX_WIDTH + 1);

        let longer = format_duration_prefix(Duration::new(12, 123_456_789));
        assert_eq2!(longer, "12.123456789 ");
    }
}
