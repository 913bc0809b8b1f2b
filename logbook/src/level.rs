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

use strum_macros::{Display, EnumCount, EnumIter};

/// Ordered severity. A level is accepted when it is less than or equal to the accepted
/// level of the logger, so `Error` is always shown unless something lower is configured.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Display, EnumCount, EnumIter,
)]
#[repr(i8)]
pub enum Level {
    #[strum(serialize = "error")]
    Error = -2,
    #[strum(serialize = "warn")]
    Warn = -1,
    #[default]
    #[strum(serialize = "default")]
    Default = 0,
    #[strum(serialize = "info")]
    Info = 1,
    #[strum(serialize = "debug")]
    Debug = 2,
}

impl Level {
    #[must_use]
    pub fn as_i8(self) -> i8 { self as i8 }

    /// Inverse of [`Self::as_i8`]. Out of range values are clamped to the nearest level.
    #[rustfmt::skip]
    #[must_use]
    pub fn from_i8(value: i8) -> Self {
        match value {
            i8::MIN..=-2 => Level::Error,
            -1           => Level::Warn,
            0            => Level::Default,
            1            => Level::Info,
            2..=i8::MAX  => Level::Debug,
        }
    }

    /// Position in `0..Level::COUNT`, for per level tables.
    #[must_use]
    pub fn index(self) -> usize { usize::from((self.as_i8() + 2).unsigned_abs()) }

    #[must_use]
    pub fn is_accepted_by(self, accepted_level: Level) -> bool { self <= accepted_level }
}

#[cfg(test)]
mod tests {
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_order() {
        let levels: Vec<Level> = Level::iter().collect();
        let mut sorted = levels.clone();
        sorted.sort();
        assert_eq2!(levels, sorted);
        assert_eq2!(Level::COUNT, 5);
    }

    #[test]
    fn test_round_trip_and_index() {
        for (index, level) in Level::iter().enumerate() {
            assert_eq2!(Level::from_i8(level.as_i8()), level);
            assert_eq2!(level.index(), index);
        }
        assert_eq2!(Level::from_i8(-100), Level::Error);
        assert_eq2!(Level::from_i8(100), Level::Debug);
    }

    #[test]
    fn test_acceptance() {
        assert!(Level::Error.is_accepted_by(Level::Default));
        assert!(Level::Default.is_accepted_by(Level::Default));
        assert!(!Level::Info.is_accepted_by(Level::Default));
        assert!(Level::Info.is_accepted_by(Level::Debug));
        assert!(!Level::Warn.is_accepted_by(Level::Error));
    }

    #[test]
    fn test_display() {
        assert_eq2!(Level::Warn.to_string(), "warn");
        assert_eq2!(Level::default(), Level::Default);
    }
}
