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

//! ANSI aware greedy word wrap.
//!
//! Text is consumed one character at a time. Ordinary characters build up a "word"; a
//! space moves the word into the "line". When a space arrives and the line, the word and
//! that space no longer fit in the content width, the line is cut into slices. All of them but the
//! last are emitted, and the last one keeps growing. A newline (or the end of the call,
//! unless the incomplete line is kept) flushes whatever is pending.
//!
//! When wrapped lines are marked, every forced break gets a `↵` in the last column.
//! That costs two columns per line: the marker and the space before it.
//!
//! Escape sequences are zero width and pass through untouched. After wrapping,
//! [`ColorState`] makes sure every forced break closes the active colors and re-opens
//! them on the next line.

use super::{BACKSPACE, ColorState, ControlSequenceEvent, ControlSequenceRecognizer,
            SequenceKind, SequenceStack};

pub const WRAP_MARKER: char = '↵';

/// Incremental fitting state. Create one per output that needs wrapping across many
/// writes (eg: a proxied subprocess stream), or use a fresh one for a single message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FitterState {
    line: SequenceStack,
    word: SequenceStack,
    recognizer: ControlSequenceRecognizer,
    color: ColorState,
}

/// Pads `line` (whose visible width is `line_width`) to one column short of
/// `content_width` and appends the [`WRAP_MARKER`].
///
/// ```
/// use r3bl_logbook::mark_line;
/// assert_eq!(mark_line("012345", 6, 10), "012345   ↵");
/// assert_eq!(mark_line("0000000000", 10, 10), "0000000000↵");
/// ```
#[must_use]
pub fn mark_line(line: &str, line_width: isize, content_width: isize) -> String {
    let padding = if line_width <= content_width - 1 {
        usize::try_from(content_width - line_width - 1).unwrap_or(0)
    } else {
        0
    };
    let mut acc = String::with_capacity(line.len() + padding + WRAP_MARKER.len_utf8());
    acc.push_str(line);
    acc.extend(std::iter::repeat_n(' ', padding));
    acc.push(WRAP_MARKER);
    acc
}

/// One shot fit of `text` with a fresh [`FitterState`]. Nothing is kept back.
#[must_use]
pub fn fit_text(text: &str, content_width: isize, mark_wrapped_line: bool) -> String {
    FitterState::default().fit(text, content_width, mark_wrapped_line, false)
}

fn slice_width(content_width: isize, mark_wrapped_line: bool) -> isize {
    if mark_wrapped_line {
        (content_width - 2).max(1)
    } else {
        content_width
    }
}

impl FitterState {
    /// Fits `text` into `content_width` columns.
    ///
    /// - `content_width <= 0` is treated as 1.
    /// - An empty `text` returns an empty string and leaves the state unchanged.
    /// - With `keep_incomplete_line`, a trailing fragment without a newline is held
    ///   back in the state and continues on the next call.
    pub fn fit(
        &mut self,
        text: &str,
        content_width: isize,
        mark_wrapped_line: bool,
        keep_incomplete_line: bool,
    ) -> String {
        if text.is_empty() {
            return String::new();
        }

        let content_width = content_width.max(1);
        let mut acc = String::new();

        for ch in text.chars() {
            self.wrap_char(ch, content_width, mark_wrapped_line, &mut acc);
            self.track_control_sequence(ch);
        }

        if !keep_incomplete_line {
            self.flush_line(content_width, mark_wrapped_line, &mut acc);
        }

        self.color.apply(&acc)
    }

    /// Emits whatever fragment is held back from earlier calls to [`Self::fit`].
    pub fn flush(&mut self, content_width: isize, mark_wrapped_line: bool) -> String {
        let mut acc = String::new();
        self.flush_line(content_width.max(1), mark_wrapped_line, &mut acc);
        self.color.apply(&acc)
    }

    /// `true` if a fragment is held back.
    #[must_use]
    pub fn has_incomplete_line(&self) -> bool {
        !self.line.is_blank() || !self.word.is_blank()
    }

    fn wrap_char(
        &mut self,
        ch: char,
        content_width: isize,
        mark_wrapped_line: bool,
        acc: &mut String,
    ) {
        match ch {
            BACKSPACE => {
                let mut backspace = [0; 4];
                let backspace = BACKSPACE.encode_utf8(&mut backspace);
                if self.word.is_blank() {
                    self.line.write_control_data(backspace);
                } else {
                    self.word.write_control_data(backspace);
                }
            }
            '\n' | '\r' => {
                self.flush_line(content_width, mark_wrapped_line, acc);
                acc.push(ch);
            }
            ' ' => {
                self.wrap_on_space(content_width, mark_wrapped_line, acc);
                self.line.write_plain_data(" ");
            }
            _ => self.word.write_char(ch),
        }
    }

    fn track_control_sequence(&mut self, ch: char) {
        match self.recognizer.feed(ch) {
            ControlSequenceEvent::Started => self.word.divide_last_char(),
            ControlSequenceEvent::Terminated { .. } => {
                self.word.commit_top(SequenceKind::Control);
            }
            ControlSequenceEvent::Outside
            | ControlSequenceEvent::Continued
            | ControlSequenceEvent::Aborted => {}
        }
    }

    fn wrap_on_space(
        &mut self,
        content_width: isize,
        mark_wrapped_line: bool,
        acc: &mut String,
    ) {
        // Text that fits is never wrapped, marked or not. The marker column only
        // matters once a break is forced.
        let overflows = self.line.width() + self.word.width() + 1 > content_width;

        let word = std::mem::take(&mut self.word);
        self.line.merge(word);

        if !overflows {
            return;
        }

        let slice_width = slice_width(content_width, mark_wrapped_line);
        let full_slices = self.line.split_off_full_slices(slice_width);
        if full_slices.is_empty() {
            return;
        }
        for slice in full_slices {
            acc.push_str(&render_wrapped_slice(
                slice,
                slice_width,
                content_width,
                mark_wrapped_line,
            ));
            acc.push('\n');
        }
        // The break itself stands in for the space that separated the two words.
        self.line.trim_leading_space();
    }

    fn flush_line(&mut self, content_width: isize, mark_wrapped_line: bool, acc: &mut String) {
        let word = std::mem::take(&mut self.word);
        self.line.merge(word);

        if self.line.width() <= content_width {
            acc.push_str(&self.line.to_string());
            self.line.clear();
            return;
        }

        let slice_width = slice_width(content_width, mark_wrapped_line);
        let slices = self.line.slices(slice_width);
        let last_index = slices.len().saturating_sub(1);
        for (index, slice) in slices.into_iter().enumerate() {
            if index == last_index {
                acc.push_str(&slice);
            } else {
                acc.push_str(&render_wrapped_slice(
                    slice,
                    slice_width,
                    content_width,
                    mark_wrapped_line,
                ));
                acc.push('\n');
            }
        }
    }
}

fn render_wrapped_slice(
    slice: String,
    slice_width: isize,
    content_width: isize,
    mark_wrapped_line: bool,
) -> String {
    if mark_wrapped_line {
        mark_line(&slice, slice_width, content_width)
    } else {
        slice
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::assert_eq2;

    const WIDTH: isize = 10;

    #[test_case("foo bar", "foo bar" ; "shorter")]
    #[test_case("foo bar da", "foo bar da" ; "equal")]
    #[test_case("foo bar data", "foo bar   \ndata" ; "word moves to next line")]
    #[test_case("foo bar lllllllllll", "foo bar ll\nlllllllll" ; "long word is split")]
    #[test_case("llllllllll lllllllllll", "llllllllll\n lllllllll\nll" ; "long words")]
    #[test_case("111111111", "111111111" ; "numbers shorter")]
    #[test_case("1111111111", "1111111111" ; "numbers equal")]
    #[test_case("11111111111", "1111111111\n1" ; "numbers bigger")]
    #[test_case("\x1b[30m111111111\x1b[0m", "\x1b[30m111111111\x1b[0m" ; "colored shorter")]
    #[test_case("\x1b[30m1111111111\x1b[0m", "\x1b[30m1111111111\x1b[0m" ; "colored equal")]
    #[test_case(
        "\x1b[30m11111111111\x1b[0m",
        "\x1b[30m1111111111\x1b[0m\n\x1b[30m1\x1b[0m"
        ; "colored bigger"
    )]
    fn test_fit_unmarked(input: &str, expected: &str) {
        assert_eq2!(fit_text(input, WIDTH, false), expected);
    }

    #[test_case("foo bar", "foo bar" ; "shorter")]
    #[test_case("foo bar da", "foo bar da" ; "equal")]
    #[test_case("foo bar data", "foo bar  ↵\ndata" ; "word moves to next line")]
    #[test_case("foo bar lllllllllll", "foo bar  ↵\nllllllll ↵\nlll" ; "long word is split")]
    #[test_case("llllllllll lllllllllll", "llllllll ↵\nll lllll ↵\nllllll" ; "long words")]
    #[test_case("111111111", "111111111" ; "numbers shorter")]
    #[test_case("1111111111", "1111111111" ; "numbers equal")]
    #[test_case("11111111111", "11111111 ↵\n111" ; "numbers bigger")]
    #[test_case("\x1b[30m111111111\x1b[0m", "\x1b[30m111111111\x1b[0m" ; "colored shorter")]
    #[test_case("\x1b[30m1111111111\x1b[0m", "\x1b[30m1111111111\x1b[0m" ; "colored equal")]
    #[test_case(
        "\x1b[30m11111111111\x1b[0m",
        "\x1b[30m11111111 ↵\x1b[0m\n\x1b[30m111\x1b[0m"
        ; "colored bigger"
    )]
    fn test_fit_marked(input: &str, expected: &str) {
        assert_eq2!(fit_text(input, WIDTH, true), expected);
    }

    #[test_case("foo bar d "   ; "trailing space at the boundary")]
    #[test_case("abcdefghi "   ; "long word and trailing space")]
    #[test_case("abcdefghi \n" ; "long word, trailing space and newline")]
    #[test_case("a b c d e "   ; "single letters")]
    #[test_case("foo bar da"   ; "exact width")]
    #[test_case("\x1b[31mfoo bar d \x1b[0m" ; "colored trailing space")]
    fn test_fitting_text_is_unchanged(input: &str) {
        assert_eq2!(fit_text(input, WIDTH, false), input);
        assert_eq2!(fit_text(input, WIDTH, true), input);
    }

    #[test_case("foo bar da ",  "foo bar  ↵\nda "       ; "one column over")]
    #[test_case("abcdefghi jk", "abcdefgh ↵\ni jk"      ; "long word then more")]
    #[test_case("foo bar d ef", "foo bar  ↵\nd ef"      ; "boundary space then more")]
    fn test_fit_marked_overflow_after_space(input: &str, expected: &str) {
        assert_eq2!(fit_text(input, WIDTH, true), expected);
    }

    #[test]
    fn test_fit_is_idempotent_for_fitting_lines() {
        let text = "the quick brown fox jumps over the lazy dog";
        for mark_wrapped_line in [false, true] {
            let fitted = fit_text(text, WIDTH, mark_wrapped_line);
            for line in fitted.split('\n') {
                if crate::plain_width(line) <= WIDTH && !line.contains(WRAP_MARKER) {
                    assert_eq2!(fit_text(line, WIDTH, mark_wrapped_line), line);
                }
            }
        }
    }

    #[test]
    fn test_mark_line() {
        assert_eq2!(mark_line("", 0, WIDTH), format!("{}↵", " ".repeat(9)));
        assert_eq2!(mark_line("012345", 6, WIDTH), "012345   ↵");
        assert_eq2!(mark_line("0000000000", 10, WIDTH), "0000000000↵");
        assert_eq2!(mark_line("000000000", 9, WIDTH), "000000000↵");
        assert_eq2!(mark_line("00000000", 8, WIDTH), "00000000 ↵");
    }

    #[test]
    fn test_split_numbers_unmarked_and_marked() {
        let input = "1234567890".repeat(4);
        assert_eq2!(
            fit_text(&input, WIDTH, false),
            "1234567890\n1234567890\n1234567890\n1234567890"
        );
        assert_eq2!(
            fit_text(&input, WIDTH, true),
            "12345678 ↵\n90123456 ↵\n78901234 ↵\n56789012 ↵\n34567890"
        );
    }

    #[test]
    fn test_empty_input_keeps_state() {
        let mut state = FitterState::default();
        state.fit("pending", WIDTH, true, true);
        let before = state.clone();
        assert_eq2!(state.fit("", WIDTH, true, false), "");
        assert_eq2!(state, before);
    }

    #[test]
    fn test_non_positive_width_is_one() {
        assert_eq2!(fit_text("abc", 0, false), "a\nb\nc");
        assert_eq2!(fit_text("abc", -5, false), "a\nb\nc");
    }

    #[test]
    fn test_newlines_flush_each_line() {
        assert_eq2!(fit_text("foo\nbar baz\r\n", WIDTH, false), "foo\nbar baz\r\n");
        assert_eq2!(
            fit_text("foo bar data\nx", WIDTH, false),
            "foo bar   \ndata\nx"
        );
    }

    #[test]
    fn test_wrapping_on_space_drops_the_space_at_the_break() {
        assert_eq2!(
            fit_text("foo bar data more words", WIDTH, false),
            "foo bar   \ndata more \nwords"
        );
    }

    #[test]
    fn test_keep_incomplete_line_across_calls() {
        let mut state = FitterState::default();
        assert_eq2!(state.fit("foo ba", WIDTH, false, true), "");
        assert!(state.has_incomplete_line());
        assert_eq2!(state.fit("r data\n", WIDTH, false, true), "foo bar   \ndata\n");
        assert!(!state.has_incomplete_line());
        assert_eq2!(state.fit("tail", WIDTH, false, true), "");
        assert_eq2!(state.flush(WIDTH, false), "tail");
    }

    #[test]
    fn test_escape_sequence_split_across_calls() {
        let mut state = FitterState::default();
        let first = state.fit("ab\x1b[3", WIDTH, false, true);
        let second = state.fit("1mcdefghijk\x1b[0m", WIDTH, false, false);
        assert_eq2!(
            format!("{first}{second}"),
            "ab\x1b[31mcdefghij\x1b[0m\n\x1b[31mk\x1b[0m"
        );
    }

    #[test]
    fn test_backspace_erases_width() {
        // 11 chars and one backspace fit in 10 columns.
        assert_eq2!(fit_text("12345678901\u{8}", WIDTH, false), "12345678901\u{8}");
    }

    #[test]
    fn test_plain_text_width_is_preserved() {
        let text = "the quick brown fox jumps over the lazy dog and keeps running";
        for line in fit_text(text, WIDTH, false).split('\n') {
            assert!(crate::plain_width(line) <= WIDTH, "line too wide: {line:?}");
        }
        let stripped: String = fit_text(text, WIDTH, false)
            .split('\n')
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq2!(stripped, text);
    }
}
