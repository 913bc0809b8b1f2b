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

//! The mutable state behind a pair of output streams. Nothing in here does any I/O:
//! every method that renders returns the bytes to write, and the caller writes them
//! while it still holds the lock on the state. See [`crate::SharedStreamState`].

use std::time::Instant;

use crate::{BorderGlyph, FitMode, FitterState, OptionalLn, Prefix, ProcessBorder,
            ProcessBorders, StreamModes, Style, TAG_INDENT_WIDTH, Tag, colorize_lines,
            fit_text, plain_width};

/// Used when the width of the terminal is not known.
pub const DEFAULT_WIDTH: usize = 140;

/// Columns added by each indent step.
pub const INDENT_STEP: usize = 2;

/// One entry per started (and not yet ended) process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessDescriptor {
    pub started_at: Instant,
    pub message: String,
    /// Set when this process opened the collapsible section, so it must close it.
    pub section_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CursorState {
    pub is_on_new_line: bool,
    pub is_prev_carriage_return: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            is_on_new_line: true,
            is_prev_carriage_return: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StreamState {
    pub width: usize,
    pub modes: StreamModes,
    pub indent_width: usize,
    pub optional_ln: OptionalLn,
    pub tag: Tag,
    pub prefix: Prefix,
    pub borders: ProcessBorders,
    pub active_processes: Vec<ProcessDescriptor>,
    pub is_collapsible_section_active: bool,
    pub cursor: CursorState,
    /// Fitter used by streaming writes (eg: proxied subprocess output).
    pub fitter: FitterState,
}

impl Default for StreamState {
    fn default() -> Self { Self::new(DEFAULT_WIDTH, StreamModes::default()) }
}

mod constructors {
    use super::*;

    impl StreamState {
        #[must_use]
        pub fn new(width: usize, modes: StreamModes) -> Self {
            Self {
                width,
                modes,
                indent_width: 0,
                optional_ln: OptionalLn::default(),
                tag: Tag::default(),
                prefix: Prefix::default(),
                borders: ProcessBorders::default(),
                active_processes: vec![],
                is_collapsible_section_active: false,
                cursor: CursorState::default(),
                fitter: FitterState::default(),
            }
        }

        /// A fresh state for a nested context. Its width is this state's content width,
        /// and only the modes are carried over.
        #[must_use]
        pub fn sub_state(&self) -> Self {
            let width = usize::try_from(self.content_width()).unwrap_or(0);
            Self::new(width, self.modes)
        }

        /// Copies every persistent setting (width, modes, indent, tag, prefix). Borders,
        /// processes, the cursor and the fitter start over.
        #[must_use]
        pub fn copied_state(&self) -> Self {
            let mut acc = self.clone();
            acc.reset_transient();
            acc
        }
    }
}

mod resets {
    use super::*;

    impl StreamState {
        pub(super) fn reset_transient(&mut self) {
            self.optional_ln = OptionalLn::default();
            self.borders = ProcessBorders::default();
            self.active_processes.clear();
            self.is_collapsible_section_active = false;
            self.cursor = CursorState::default();
            self.fitter = FitterState::default();
        }

        /// Everything but the width, the modes and the tag goes back to its initial
        /// value. Active processes must have been ended before this is called.
        pub fn reset_state(&mut self) {
            self.reset_transient();
            self.indent_width = 0;
            self.prefix = Prefix::default();
        }

        pub fn reset_modes(&mut self) { self.modes = StreamModes::default(); }
    }
}

mod widths {
    use super::*;

    impl StreamState {
        #[must_use]
        pub fn between_borders_width(&self) -> usize {
            usize::from(self.modes.is_log_process_border_enabled)
        }

        #[must_use]
        pub fn after_borders_width(&self) -> usize {
            usize::from(self.modes.is_log_process_border_enabled)
        }

        #[must_use]
        pub fn prefix_width(&self) -> usize {
            usize::try_from(plain_width(&self.prefix.value())).unwrap_or(0)
        }

        #[must_use]
        pub fn borders_width(&self) -> usize {
            self.borders
                .block_width(self.between_borders_width(), self.after_borders_width())
        }

        /// Columns taken by everything rendered before the content on each line.
        #[must_use]
        pub fn service_width(&self) -> usize {
            self.prefix_width() + self.borders_width() + self.tag.width() + self.indent_width
        }

        /// Can be zero or negative when the service part takes the whole width.
        #[must_use]
        pub fn content_width(&self) -> isize {
            let width = isize::try_from(self.width).unwrap_or(isize::MAX);
            let service = isize::try_from(self.service_width()).unwrap_or(isize::MAX);
            width - service
        }
    }
}

mod indent {
    use super::*;

    impl StreamState {
        pub fn increase_indent(&mut self) {
            self.indent_width += INDENT_STEP;
            self.optional_ln.disarm();
        }

        /// No-op at zero indent.
        pub fn decrease_indent(&mut self) {
            if self.indent_width == 0 {
                return;
            }
            self.indent_width = self.indent_width.saturating_sub(INDENT_STEP);
            self.optional_ln.disarm();
        }

        pub fn reset_indent(&mut self) {
            if self.indent_width == 0 {
                return;
            }
            self.indent_width = 0;
            self.optional_ln.disarm();
        }

        /// Runs `f` with the indent set to zero, then restores it.
        pub fn without_indent<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
            let saved = std::mem::take(&mut self.indent_width);
            let result = f(self);
            self.indent_width = saved;
            result
        }
    }
}

mod borders {
    use super::*;

    impl StreamState {
        /// The glyph as rendered right now. Empty when borders are disabled.
        #[must_use]
        pub fn glyph(&self, glyph: BorderGlyph) -> &'static str {
            if self.modes.is_log_process_border_enabled {
                glyph.as_str()
            } else {
                ""
            }
        }

        pub fn push_border(&mut self, glyph: BorderGlyph, style: &Style) {
            let colorless = self.glyph(glyph).to_string();
            let formatted = self.format_with_style(style, &colorless);
            self.borders.push(ProcessBorder {
                colorless,
                formatted,
            });
        }

        pub fn pop_border(&mut self) -> Option<ProcessBorder> { self.borders.pop() }

        pub fn restore_border(&mut self, border: Option<ProcessBorder>) {
            if let Some(border) = border {
                self.borders.push(border);
            }
        }
    }
}

mod render {
    use super::*;

    impl StreamState {
        /// Plain `text` when styling is off or the style has no codes, otherwise every
        /// non empty line is colorized on its own.
        #[must_use]
        pub fn format_with_style(&self, style: &Style, text: &str) -> String {
            if !self.modes.is_style_enabled || style.is_none() {
                text.to_string()
            } else {
                colorize_lines(style, text)
            }
        }

        /// Styles and fits (when line wrapping is enabled) `text`, then inserts the service
        /// part. Renders nothing while muted.
        pub fn format_and_fit(&mut self, style: &Style, text: &str, mode: FitMode) -> String {
            if self.modes.is_muted {
                return String::new();
            }

            let mut text = self.format_with_style(style, text);

            if self.modes.is_line_wrapping_enabled {
                let content_width = self.content_width();
                text = match mode {
                    FitMode::OneShot => fit_text(&text, content_width, true),
                    FitMode::Streaming => self.fitter.fit(&text, content_width, true, true),
                };
            }

            self.process_text(&text)
        }

        /// Prefix, borders and tag, in that order.
        #[must_use]
        pub fn formatted_service(&self) -> String {
            let mut acc = String::new();

            let prefix = self.prefix.value();
            if !prefix.is_empty() {
                acc.push_str(&self.format_with_style(&self.prefix.style, &prefix));
            }

            acc.push_str(
                &self
                    .borders
                    .render(self.between_borders_width(), self.after_borders_width()),
            );

            if !self.tag.value.is_empty() {
                acc.push_str(&self.format_with_style(&self.tag.style, &self.tag.value));
                acc.push_str(&" ".repeat(TAG_INDENT_WIDTH));
            }

            acc
        }

        /// Renders the pending optional line, if there is one.
        pub fn take_optional_ln(&mut self) -> String {
            if !self.optional_ln.consume() {
                return String::new();
            }
            self.cursor.is_on_new_line = true;
            let mut acc = self.formatted_service();
            acc.push('\n');
            acc
        }

        /// Inserts the service part (and the indent) in front of every line of `text`.
        /// The cursor is tracked across calls, so a line can be written in pieces.
        ///
        /// - A line that holds only a line break gets the service part without the
        ///   indent.
        /// - `\r` returns to the start of the line, and the text that follows it does
        ///   not get a second service part.
        pub fn process_text(&mut self, text: &str) -> String {
            let mut acc = String::with_capacity(text.len());

            for ch in text.chars() {
                match ch {
                    '\r' | '\n' => {
                        if self.cursor.is_on_new_line && !self.cursor.is_prev_carriage_return {
                            acc.push_str(&self.formatted_service());
                        }
                        self.cursor.is_prev_carriage_return = ch == '\r';
                        self.cursor.is_on_new_line = true;
                    }
                    _ => {
                        acc.push_str(&self.take_optional_ln());
                        if self.cursor.is_on_new_line {
                            acc.push_str(&self.formatted_service());
                            acc.push_str(&" ".repeat(self.indent_width));
                            self.cursor.is_on_new_line = false;
                        }
                        self.cursor.is_prev_carriage_return = false;
                    }
                }
                acc.push(ch);
            }

            acc
        }
    }
}
