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

//! A tiny recognizer for CSI escape sequences (`ESC [ <digits and ;> <letter>`), fed one
//! character at a time, so sequences that are split across writes are still recognized.

use crate::ESC;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ControlSequenceStage {
    #[default]
    None,
    SawEscape,
    SawBracket,
    ConsumingParams,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ControlSequenceEvent {
    /// The character is not part of any sequence.
    Outside,
    /// An escape character started a new sequence.
    Started,
    /// The character extended the sequence in progress.
    Continued,
    /// The character terminated the sequence.
    Terminated { terminator: char, params: String },
    /// The character can't be part of a sequence, the one in progress is dropped.
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ControlSequenceRecognizer {
    pub stage: ControlSequenceStage,
    pub params: String,
}

impl ControlSequenceRecognizer {
    pub fn feed(&mut self, ch: char) -> ControlSequenceEvent {
        if ch == ESC {
            self.stage = ControlSequenceStage::SawEscape;
            self.params.clear();
            return ControlSequenceEvent::Started;
        }

        match self.stage {
            ControlSequenceStage::None => ControlSequenceEvent::Outside,
            ControlSequenceStage::SawEscape => {
                if ch == '[' {
                    self.stage = ControlSequenceStage::SawBracket;
                    ControlSequenceEvent::Continued
                } else {
                    self.reset();
                    ControlSequenceEvent::Aborted
                }
            }
            ControlSequenceStage::SawBracket | ControlSequenceStage::ConsumingParams => {
                if ch.is_ascii_digit() || ch == ';' {
                    self.stage = ControlSequenceStage::ConsumingParams;
                    self.params.push(ch);
                    ControlSequenceEvent::Continued
                } else if ch.is_ascii_alphabetic() {
                    let params = std::mem::take(&mut self.params);
                    self.reset();
                    ControlSequenceEvent::Terminated {
                        terminator: ch,
                        params,
                    }
                } else {
                    self.reset();
                    ControlSequenceEvent::Aborted
                }
            }
        }
    }

    pub fn reset(&mut self) {
        self.stage = ControlSequenceStage::None;
        self.params.clear();
    }

    #[must_use]
    pub fn is_inside_sequence(&self) -> bool { self.stage != ControlSequenceStage::None }
}

/// Splits the params of an SGR (`m`) sequence into units. Extended colors
/// (`38;5;n`, `38;2;r;g;b` and the `48` background forms) are kept together as one unit.
/// An empty param list means reset, same as `0`.
#[must_use]
pub fn split_sgr_params(params: &str) -> Vec<String> {
    if params.is_empty() {
        return vec!["0".to_string()];
    }

    let parts: Vec<&str> = params.split(';').collect();
    let mut acc = vec![];
    let mut index = 0;
    while index < parts.len() {
        let part = parts[index];
        let unit_len = match (part, parts.get(index + 1).copied()) {
            ("38" | "48", Some("5")) => 3,
            ("38" | "48", Some("2")) => 5,
            _ => 1,
        };
        let end = (index + unit_len).min(parts.len());
        acc.push(parts[index..end].join(";"));
        index = end;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    fn feed_all(
        recognizer: &mut ControlSequenceRecognizer,
        text: &str,
    ) -> Vec<ControlSequenceEvent> {
        text.chars().map(|ch| recognizer.feed(ch)).collect()
    }

    #[test]
    fn test_recognizes_sgr() {
        let mut recognizer = ControlSequenceRecognizer::default();
        let events = feed_all(&mut recognizer, "a\x1b[30;1m");
        assert_eq2!(events[0], ControlSequenceEvent::Outside);
        assert_eq2!(events[1], ControlSequenceEvent::Started);
        assert_eq2!(
            events.last().unwrap(),
            &ControlSequenceEvent::Terminated {
                terminator: 'm',
                params: "30;1".to_string()
            }
        );
        assert!(!recognizer.is_inside_sequence());
    }

    #[test]
    fn test_split_across_feeds() {
        let mut recognizer = ControlSequenceRecognizer::default();
        feed_all(&mut recognizer, "\x1b[3");
        assert!(recognizer.is_inside_sequence());
        let events = feed_all(&mut recognizer, "1m");
        assert_eq2!(
            events[1],
            ControlSequenceEvent::Terminated {
                terminator: 'm',
                params: "31".to_string()
            }
        );
    }

    #[test]
    fn test_aborts_on_unexpected_char() {
        let mut recognizer = ControlSequenceRecognizer::default();
        let events = feed_all(&mut recognizer, "\x1bx");
        assert_eq2!(events[1], ControlSequenceEvent::Aborted);
        let events = feed_all(&mut recognizer, "\x1b[1 ");
        assert_eq2!(events[3], ControlSequenceEvent::Aborted);
    }

    #[test]
    fn test_split_sgr_params() {
        assert_eq2!(split_sgr_params(""), vec!["0"]);
        assert_eq2!(split_sgr_params("30;1"), vec!["30", "1"]);
        assert_eq2!(split_sgr_params("38;5;5;1"), vec!["38;5;5", "1"]);
        assert_eq2!(split_sgr_params("48;2;1;2;3"), vec!["48;2;1;2;3"]);
    }
}
