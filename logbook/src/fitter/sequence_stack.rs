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

use std::fmt::{Display, Formatter, Result};

use smallvec::{SmallVec, smallvec};

use super::{Sequence, SequenceKind};

pub type InlineVecSequences = SmallVec<[Sequence; 8]>;

/// An ordered list of [Sequence]s that holds one pending word or one pending line.
///
/// Invariants:
/// - The last sequence is the "open" one that new data is appended to; it is never
///   committed.
/// - Committed sequences are never empty.
/// - Clearing leaves exactly one empty open sequence behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceStack {
    sequences: InlineVecSequences,
}

impl Default for SequenceStack {
    fn default() -> Self {
        Self {
            sequences: smallvec![Sequence::default()],
        }
    }
}

impl Display for SequenceStack {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for sequence in &self.sequences {
            f.write_str(&sequence.data)?;
        }
        Ok(())
    }
}

mod accessors {
    use super::*;

    impl SequenceStack {
        #[must_use]
        pub fn new() -> Self { Self::default() }

        /// Sum of the visible widths of all the sequences.
        #[must_use]
        pub fn width(&self) -> isize { self.sequences.iter().map(Sequence::width).sum() }

        /// `true` when no sequence holds any data.
        #[must_use]
        pub fn is_blank(&self) -> bool { self.sequences.iter().all(Sequence::is_empty) }

        #[must_use]
        pub fn sequences(&self) -> &[Sequence] { &self.sequences }

        pub fn clear(&mut self) { *self = Self::default(); }
    }
}

mod mutators {
    use super::*;

    impl SequenceStack {
        pub(super) fn ensure_open_top(&mut self) {
            let needs_open = self
                .sequences
                .last()
                .is_none_or(Sequence::is_committed);
            if needs_open {
                self.sequences.push(Sequence::default());
            }
        }

        fn top_mut(&mut self) -> &mut Sequence {
            self.ensure_open_top();
            let last = self.sequences.len() - 1;
            &mut self.sequences[last]
        }

        /// Appends to the open sequence.
        pub fn write_data(&mut self, data: &str) { self.top_mut().data.push_str(data); }

        pub fn write_char(&mut self, ch: char) { self.top_mut().data.push(ch); }

        /// Commits the open sequence with the given kind and opens a fresh one. An empty
        /// open sequence is left alone.
        pub fn commit_top(&mut self, kind: SequenceKind) {
            let top = self.top_mut();
            if top.is_empty() {
                return;
            }
            top.commit(kind);
            self.sequences.push(Sequence::default());
        }

        /// Pushes `data` as its own plain sequence. Any pending open data is committed
        /// as plain first.
        pub fn write_plain_data(&mut self, data: &str) {
            self.commit_top(SequenceKind::Plain);
            self.write_data(data);
            self.commit_top(SequenceKind::Plain);
        }

        /// Pushes `data` as its own control sequence. Any pending open data is committed
        /// as plain first, so it keeps its width.
        pub fn write_control_data(&mut self, data: &str) {
            self.commit_top(SequenceKind::Plain);
            self.write_data(data);
            self.commit_top(SequenceKind::Control);
        }

        /// Called right after an escape character was appended to the open sequence. The
        /// characters before it are committed as plain, and the escape character starts
        /// a new open sequence.
        pub fn divide_last_char(&mut self) {
            let top = self.top_mut();
            if top.data.chars().nth(1).is_none() {
                return;
            }
            let Some(last) = top.data.pop() else {
                return;
            };
            self.commit_top(SequenceKind::Plain);
            self.write_char(last);
        }

        /// Moves all of `other` to the end of this stack. The open sequences of both are
        /// committed as plain.
        pub fn merge(&mut self, mut other: SequenceStack) {
            self.commit_top(SequenceKind::Plain);
            other.commit_top(SequenceKind::Plain);
            self.sequences.retain(|it| !it.is_empty());
            self.sequences
                .extend(other.sequences.into_iter().filter(|it| !it.is_empty()));
            self.ensure_open_top();
        }

        /// Removes a single leading space from the first visible sequence.
        pub fn trim_leading_space(&mut self) {
            let Some(index) = self.sequences.iter().position(|it| it.width() != 0) else {
                return;
            };
            let sequence = &mut self.sequences[index];
            if sequence.kind == SequenceKind::Control || !sequence.data.starts_with(' ') {
                return;
            }
            sequence.data.remove(0);
            if sequence.is_empty() && sequence.is_committed() {
                self.sequences.remove(index);
            }
            self.ensure_open_top();
        }
    }
}

mod slicing {
    use super::*;

    impl SequenceStack {
        /// Removes up to `slice_width` columns from the front of the stack and returns
        /// them, along with the columns that are left unfilled.
        ///
        /// - Zero width sequences (escape sequences) always go into the current slice.
        /// - A sequence that starts a word and doesn't fit in what's left, but does fit
        ///   in a whole slice, is moved to the next slice instead of being split.
        /// - Anything else is split.
        pub fn slice(&mut self, slice_width: isize) -> (String, isize) {
            let mut acc = String::new();
            let mut rest = slice_width;
            let mut consumed = 0;
            let mut at_word_start = true;

            for sequence in &mut self.sequences {
                let width = sequence.width();
                if width == 0 {
                    acc.push_str(&sequence.data);
                    sequence.data.clear();
                    consumed += 1;
                    continue;
                }
                if rest == 0 || (at_word_start && width > rest && width <= slice_width) {
                    break;
                }
                let (part, new_rest) = sequence.slice(rest);
                acc.push_str(&part);
                at_word_start = part.ends_with(' ');
                rest = new_rest;
                if !sequence.is_empty() {
                    break;
                }
                consumed += 1;
            }

            self.sequences.drain(..consumed);
            self.ensure_open_top();
            (acc, rest)
        }

        /// Slices the whole stack. Every slice but the last is padded with spaces to
        /// `slice_width`. The stack is empty afterwards.
        pub fn slices(&mut self, slice_width: isize) -> Vec<String> {
            let mut acc = vec![];
            loop {
                let (slice, rest) = self.slice(slice_width);
                if self.is_blank() {
                    acc.push(slice);
                    self.clear();
                    return acc;
                }
                acc.push(pad_slice(slice, rest));
            }
        }

        /// Like [`Self::slices`], except that the last slice is not returned. It stays in
        /// the stack (with its sequence kinds intact) so more words can be added to it.
        pub fn split_off_full_slices(&mut self, slice_width: isize) -> Vec<String> {
            let mut acc = vec![];
            loop {
                let before_slice = self.clone();
                let (slice, rest) = self.slice(slice_width);
                if self.is_blank() {
                    *self = before_slice;
                    return acc;
                }
                acc.push(pad_slice(slice, rest));
            }
        }
    }

    fn pad_slice(mut slice: String, rest: isize) -> String {
        let padding = usize::try_from(rest).unwrap_or(0);
        slice.extend(std::iter::repeat_n(' ', padding));
        slice
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    fn stack_from_words(words: &[&str]) -> SequenceStack {
        let mut stack = SequenceStack::new();
        for (index, word) in words.iter().enumerate() {
            if index > 0 {
                stack.write_plain_data(" ");
            }
            stack.write_data(word);
            stack.commit_top(SequenceKind::Plain);
        }
        stack
    }

    #[test]
    fn test_empty_stack_has_open_sequence() {
        let mut stack = SequenceStack::new();
        assert!(stack.is_blank());
        assert_eq2!(stack.sequences().len(), 1);
        stack.write_data("abc");
        stack.clear();
        assert_eq2!(stack.sequences().len(), 1);
        assert_eq2!(stack.width(), 0);
    }

    #[test]
    fn test_control_sequences_have_no_width() {
        let mut stack = SequenceStack::new();
        stack.write_control_data("\x1b[31m");
        stack.write_data("red");
        stack.write_control_data("\x1b[0m");
        assert_eq2!(stack.width(), 3);
        assert_eq2!(stack.to_string(), "\x1b[31mred\x1b[0m");
    }

    #[test]
    fn test_backspace_after_pending_data_keeps_its_width() {
        let mut stack = SequenceStack::new();
        stack.write_data("ab");
        stack.write_control_data("\u{8}");
        assert_eq2!(stack.width(), 1);
    }

    #[test]
    fn test_divide_last_char() {
        let mut stack = SequenceStack::new();
        stack.write_data("ab\x1b");
        stack.divide_last_char();
        assert_eq2!(stack.sequences().len(), 2);
        assert_eq2!(stack.sequences()[0], Sequence::new("ab", SequenceKind::Plain));
        assert_eq2!(stack.sequences()[1], Sequence::new("\x1b", SequenceKind::Unset));

        // Lone escape: nothing to divide.
        let mut stack = SequenceStack::new();
        stack.write_data("\x1b");
        stack.divide_last_char();
        assert_eq2!(stack.sequences().len(), 1);
    }

    #[test]
    fn test_merge() {
        let mut line = stack_from_words(&["foo"]);
        line.write_plain_data(" ");
        let mut word = SequenceStack::new();
        word.write_data("bar");
        line.merge(word);
        assert_eq2!(line.to_string(), "foo bar");
        assert_eq2!(line.width(), 7);
        assert!(!line.sequences().last().unwrap().is_committed());
    }

    #[test]
    fn test_slices_numbers() {
        let mut stack = SequenceStack::new();
        stack.write_data(&"1234567890".repeat(4));
        assert_eq2!(
            stack.slices(10),
            vec!["1234567890", "1234567890", "1234567890", "1234567890"]
        );
        assert!(stack.is_blank());
    }

    #[test]
    fn test_slices_move_whole_word_to_next_slice() {
        let mut stack = stack_from_words(&["foo", "bar", "data"]);
        assert_eq2!(stack.slices(10), vec!["foo bar   ", "data"]);
    }

    #[test]
    fn test_slices_split_long_word() {
        let mut stack = stack_from_words(&["foo", "bar", &"l".repeat(11)]);
        assert_eq2!(stack.slices(8), vec!["foo bar ", "llllllll", "lll"]);
    }

    #[test]
    fn test_split_off_full_slices_keeps_last() {
        let mut stack = stack_from_words(&["foo", "bar", "data"]);
        assert_eq2!(stack.split_off_full_slices(10), vec!["foo bar   "]);
        assert_eq2!(stack.to_string(), "data");
        assert_eq2!(stack.width(), 4);

        let mut stack = stack_from_words(&["short"]);
        assert!(stack.split_off_full_slices(10).is_empty());
        assert_eq2!(stack.to_string(), "short");
    }

    #[test]
    fn test_trim_leading_space() {
        let mut stack = SequenceStack::new();
        stack.write_control_data("\x1b[1m");
        stack.write_plain_data(" ");
        stack.write_data("x");
        stack.trim_leading_space();
        assert_eq2!(stack.to_string(), "\x1b[1mx");
        assert_eq2!(stack.width(), 1);
    }
}
