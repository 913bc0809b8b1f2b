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

use smallvec::SmallVec;

use super::{ControlSequenceEvent, ControlSequenceRecognizer, split_sgr_params};
use crate::{RESET_SEQUENCE, sgr_sequence_from_params};

/// Keeps colors from bleeding across line breaks. Runs over already wrapped text:
/// - Before a line break on a colored line, a reset is inserted.
/// - Before the first character of the next line, the active codes are re-opened.
///
/// The state persists between calls so streamed output keeps its colors across writes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorState {
    recognizer: ControlSequenceRecognizer,
    /// Ordered, de-duplicated. Insertion order is the order they are re-emitted in.
    active_codes: SmallVec<[String; 4]>,
    is_color_line: bool,
    prev_char: Option<char>,
    at_line_start: bool,
}

impl ColorState {
    #[must_use]
    pub fn active_codes(&self) -> &[String] { &self.active_codes }

    #[must_use]
    pub fn is_color_line(&self) -> bool { self.is_color_line }

    pub fn apply(&mut self, text: &str) -> String {
        let mut acc = String::with_capacity(text.len());

        for ch in text.chars() {
            if ch == '\n' || ch == '\r' {
                let prev_was_line_end = matches!(self.prev_char, Some('\r' | '\n'));
                if self.is_color_line && !prev_was_line_end {
                    acc.push_str(RESET_SEQUENCE);
                }
                self.at_line_start = true;
            } else {
                if self.at_line_start && !self.active_codes.is_empty() {
                    acc.push_str(&sgr_sequence_from_params(&self.active_codes));
                }
                self.at_line_start = false;
            }

            if let ControlSequenceEvent::Terminated {
                terminator: 'm',
                params,
            } = self.recognizer.feed(ch)
            {
                self.track_sgr_params(&params);
            }

            acc.push(ch);
            self.prev_char = Some(ch);
        }

        acc
    }

    fn track_sgr_params(&mut self, params: &str) {
        for code in split_sgr_params(params) {
            if code == "0" {
                self.active_codes.clear();
                self.is_color_line = false;
            } else {
                self.active_codes.retain(|it| *it != code);
                self.active_codes.push(code);
                self.is_color_line = true;
            }
        }
    }
}
