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

use unicode_width::UnicodeWidthChar;

pub const BACKSPACE: char = '\u{8}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SequenceKind {
    /// Still open for appending. Measured like [`SequenceKind::Plain`].
    #[default]
    Unset,
    Plain,
    Control,
}

/// A contiguous run of characters that is either visible text or a control code (an
/// escape sequence or a backspace).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Sequence {
    pub data: String,
    pub kind: SequenceKind,
}

/// Display width of a plain run. Characters without a defined width (C0 controls, etc)
/// count as zero.
#[must_use]
pub fn plain_width(text: &str) -> isize {
    let width: usize = text.chars().map(|ch| ch.width().unwrap_or(0)).sum();
    isize::try_from(width).unwrap_or(isize::MAX)
}

impl Sequence {
    #[must_use]
    pub fn new(data: impl Into<String>, kind: SequenceKind) -> Self {
        Self {
            data: data.into(),
            kind,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    #[must_use]
    pub fn is_committed(&self) -> bool { self.kind != SequenceKind::Unset }

    /// Assigns the kind. A kind is assigned at most once.
    ///
    /// # Panics
    ///
    /// In debug builds, if the kind has already been assigned.
    pub fn commit(&mut self, kind: SequenceKind) {
        debug_assert!(!self.is_committed(), "sequence kind assigned twice");
        self.kind = kind;
    }

    /// Visible width. Control runs are zero width, except a lone backspace, which takes
    /// one column back.
    #[must_use]
    pub fn width(&self) -> isize {
        match self.kind {
            SequenceKind::Control => {
                if self.data.len() == 1 && self.data.starts_with(BACKSPACE) {
                    -1
                } else {
                    0
                }
            }
            SequenceKind::Plain | SequenceKind::Unset => plain_width(&self.data),
        }
    }

    /// Takes at most `max_width` columns from the front of this sequence. Returns the
    /// taken text and the columns that are left over out of `max_width`.
    ///
    /// At least one character is always taken from a non empty sequence, even if it is
    /// wider than `max_width`, so callers slicing in a loop always make progress.
    pub fn slice(&mut self, max_width: isize) -> (String, isize) {
        let width = self.width();
        if width <= max_width {
            return (std::mem::take(&mut self.data), max_width - width);
        }

        let mut taken_width = 0;
        let mut split_at = 0;
        for (index, ch) in self.data.char_indices() {
            let ch_width = isize::try_from(ch.width().unwrap_or(0)).unwrap_or(0);
            if taken_width + ch_width > max_width && split_at > 0 {
                break;
            }
            taken_width += ch_width;
            split_at = index + ch.len_utf8();
            if taken_width >= max_width {
                break;
            }
        }

        let rest = self.data.split_off(split_at);
        let taken = std::mem::replace(&mut self.data, rest);
        (taken, (max_width - taken_width).max(0))
    }
}
