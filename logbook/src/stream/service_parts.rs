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

//! The parts that are rendered in front of every line, in this order:
//!
//! ```text
//! <prefix><border> <border> <tag>  <indent>content
//! ```

use std::time::Instant;

use smallvec::SmallVec;

use crate::{Style, format_duration_prefix, plain_width};

/// Columns between the tag and the content.
pub const TAG_INDENT_WIDTH: usize = 2;

/// RFC 3339 with second precision, eg: `2025-03-01T10:22:07+01:00`.
pub const DEFAULT_PREFIX_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Tag {
    pub value: String,
    pub style: Style,
}

impl Tag {
    #[must_use]
    pub fn width(&self) -> usize {
        if self.value.is_empty() {
            0
        } else {
            usize::try_from(plain_width(&self.value)).unwrap_or(0) + TAG_INDENT_WIDTH
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum PrefixMode {
    #[default]
    None,
    Literal(String),
    /// Time since [`Prefix::start`], see [`format_duration_prefix`].
    DurationSinceStart,
    /// Local wall clock time, formatted with [`Prefix::time_format`].
    WallClockTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    pub mode: PrefixMode,
    pub style: Style,
    pub start: Instant,
    pub time_format: String,
}

impl Default for Prefix {
    fn default() -> Self {
        Self {
            mode: PrefixMode::None,
            style: Style::None,
            start: Instant::now(),
            time_format: DEFAULT_PREFIX_TIME_FORMAT.to_string(),
        }
    }
}

impl Prefix {
    /// The colorless prefix text for a line rendered right now.
    #[must_use]
    pub fn value(&self) -> String {
        match &self.mode {
            PrefixMode::None => String::new(),
            PrefixMode::Literal(value) => value.clone(),
            PrefixMode::DurationSinceStart => format_duration_prefix(self.start.elapsed()),
            PrefixMode::WallClockTime => {
                format!("{} ", chrono::Local::now().format(&self.time_format))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderGlyph {
    DownAndRight,
    Vertical,
    VerticalAndRight,
    UpAndRight,
}

impl BorderGlyph {
    #[rustfmt::skip]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BorderGlyph::DownAndRight     => "┌",
            BorderGlyph::Vertical         => "│",
            BorderGlyph::VerticalAndRight => "├",
            BorderGlyph::UpAndRight       => "└",
        }
    }
}

/// One level of the process border stack. The colorless value is used for width math,
/// the formatted one for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ProcessBorder {
    pub colorless: String,
    pub formatted: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ProcessBorders {
    pub stack: SmallVec<[ProcessBorder; 8]>,
}

impl ProcessBorders {
    pub fn push(&mut self, border: ProcessBorder) { self.stack.push(border); }

    pub fn pop(&mut self) -> Option<ProcessBorder> { self.stack.pop() }

    #[must_use]
    pub fn len(&self) -> usize { self.stack.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.stack.is_empty() }

    /// Borders joined by `between_width` spaces, followed by `indent_width` spaces.
    #[must_use]
    pub fn render(&self, between_width: usize, indent_width: usize) -> String {
        if self.stack.is_empty() {
            return String::new();
        }
        let separator = " ".repeat(between_width);
        let mut acc = self
            .stack
            .iter()
            .map(|it| it.formatted.as_str())
            .collect::<Vec<_>>()
            .join(&separator);
        acc.push_str(&" ".repeat(indent_width));
        acc
    }

    #[must_use]
    pub fn block_width(&self, between_width: usize, indent_width: usize) -> usize {
        if self.stack.is_empty() {
            return 0;
        }
        let glyphs: usize = self
            .stack
            .iter()
            .map(|it| usize::try_from(plain_width(&it.colorless)).unwrap_or(0))
            .sum();
        glyphs + between_width * (self.stack.len() - 1) + indent_width
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::assert_eq2;

    fn border(glyph: BorderGlyph) -> ProcessBorder {
        ProcessBorder {
            colorless: glyph.as_str().to_string(),
            formatted: glyph.as_str().to_string(),
        }
    }

    #[test]
    fn test_tag_width() {
        assert_eq2!(Tag::default().width(), 0);
        let tag = Tag {
            value: "app".to_string(),
            style: Style::Bold,
        };
        assert_eq2!(tag.width(), 5);
    }

    #[test]
    fn test_literal_prefix() {
        let prefix = Prefix {
            mode: PrefixMode::Literal("> ".to_string()),
            ..Default::default()
        };
        assert_eq2!(prefix.value(), "> ");
        assert_eq2!(Prefix::default().value(), "");
    }

    #[test]
    fn test_duration_prefix_has_fixed_width() {
        let prefix = Prefix {
            mode: PrefixMode::DurationSinceStart,
            start: Instant::now() - Duration::from_millis(1500),
            ..Default::default()
        };
        assert_eq2!(prefix.value().chars().count(), 13);
        assert!(prefix.value().starts_with("1.5"));
    }

    #[test]
    fn test_wall_clock_prefix() {
        let prefix = Prefix {
            mode: PrefixMode::WallClockTime,
            time_format: "%Y".to_string(),
            ..Default::default()
        };
        let value = prefix.value();
        assert_eq2!(value.len(), 5);
        assert!(value.ends_with(' '));
    }

    #[test]
    fn test_borders_render_and_width() {
        let mut borders = ProcessBorders::default();
        assert_eq2!(borders.render(1, 1), "");
        assert_eq2!(borders.block_width(1, 1), 0);

        borders.push(border(BorderGlyph::Vertical));
        borders.push(border(BorderGlyph::DownAndRight));
        assert_eq2!(borders.render(1, 1), "│ ┌ ");
        assert_eq2!(borders.block_width(1, 1), 4);

        borders.pop();
        assert_eq2!(borders.render(1, 1), "│ ");
        assert_eq2!(borders.len(), 1);
    }

    #[test]
    fn test_disabled_borders_take_no_space() {
        let mut borders = ProcessBorders::default();
        borders.push(ProcessBorder::default());
        borders.push(ProcessBorder::default());
        assert_eq2!(borders.render(0, 0), "");
        assert_eq2!(borders.block_width(0, 0), 0);
    }
}
