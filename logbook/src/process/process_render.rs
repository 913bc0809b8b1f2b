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

//! Rendering of blocks and processes on a [`Stream`]. The builders in this module's
//! siblings decide *whether* to render; everything here renders unconditionally (except
//! while muted, where the state is still kept balanced).
//!
//! ```text
//! ┌ title                    <- header, extra ┌ border for one line
//! │ body                     <- permanent │ border while the body runs
//! ├ step                     <- top border swapped for ├ for one line
//! └ title (0.12 seconds)     <- footer, extra └ border for one line
//! ```

use std::{fmt::Display,
          time::{Instant, SystemTime}};

use unicode_width::UnicodeWidthChar;

use crate::{BorderGlyph, ElapsedTime, FitMode, LogBlockOptions, LogProcessInlineOptions,
            LogProcessOptions, ProcessDescriptor, Stream, StreamState, Style, fail_style,
            plain_width, reserved_elapsed_time_width, section_end_marker, section_id,
            section_start_marker};

/// Separates the parts on the right of a process footer.
const RIGHT_PARTS_SEPARATOR: &str = " ";
/// Shown after a truncated header, and after the message of an inline process.
const PROGRESS_DOTS: &str = "...";
const INFO_SECTION_TITLE: &str = "Info";

/// Longest prefix of `text` that is at most `max_width` columns wide.
fn truncate_to_width(text: &str, max_width: usize) -> &str {
    let mut width = 0;
    for (index, ch) in text.char_indices() {
        width += ch.width().unwrap_or(0);
        if width > max_width {
            return &text[..index];
        }
    }
    text
}

fn width_of(text: &str) -> isize { plain_width(text) }

/// The left part of a header or footer line. It is cut to fit in the content width that
/// is left after the right parts, with ` ...` marking the cut when there is room for it.
fn prepare_left_part(
    state: &StreamState,
    message: &str,
    style: &Style,
    right_parts: &[&str],
) -> String {
    let space = state.content_width() - width_of(&right_parts.join(RIGHT_PARTS_SEPARATOR));
    let Ok(space) = usize::try_from(space) else {
        return String::new();
    };
    if space == 0 {
        return String::new();
    }

    let ellipsis = format!(" {PROGRESS_DOTS}");
    let left = if width_of(message) <= isize::try_from(space).unwrap_or(isize::MAX) {
        message.to_string()
    } else if space > ellipsis.len() {
        format!(
            "{}{ellipsis}",
            truncate_to_width(message, space - ellipsis.len())
        )
    } else {
        truncate_to_width(message, space).to_string()
    };

    state.format_with_style(style, &left)
}

/// Header or step line: rendered without the indent of the body.
fn render_title_line(state: &mut StreamState, message: &str, style: &Style) -> String {
    state.without_indent(|state| {
        let mut line = prepare_left_part(state, message, style, &[]);
        line.push('\n');
        state.process_text(&line)
    })
}

/// Opens a collapsible section, unless one is already open. Returns its id and marker.
fn open_collapsible_section(
    state: &mut StreamState,
    message: &str,
) -> Option<(String, String)> {
    if !state.modes.is_gitlab_collapsible_sections_enabled
        || state.is_collapsible_section_active
    {
        return None;
    }
    let now = SystemTime::now();
    let id = section_id(message, now);
    let marker = section_start_marker(&id, message, now);
    state.is_collapsible_section_active = true;
    tracing::debug!(message = "collapsible section opened", section_id = %id);
    Some((id, marker))
}

fn close_collapsible_section(state: &mut StreamState, id: &str) -> String {
    state.is_collapsible_section_active = false;
    tracing::debug!(message = "collapsible section closed", section_id = %id);
    section_end_marker(id, SystemTime::now())
}

mod borders {
    use super::*;

    impl Stream {
        /// Renders one line with `glyph` as an extra border after the current ones.
        pub(crate) fn emit_with_extra_border(
            &self,
            glyph: BorderGlyph,
            style: &Style,
            render: impl FnOnce(&mut StreamState) -> String,
        ) {
            self.emit(|state| {
                state.push_border(glyph, style);
                let output = render(state);
                state.pop_border();
                output
            });
        }

        /// Renders one line with the top border replaced by `glyph`.
        pub(crate) fn emit_with_replaced_top_border(
            &self,
            glyph: BorderGlyph,
            style: &Style,
            render: impl FnOnce(&mut StreamState) -> String,
        ) {
            self.emit(|state| {
                let top = state.pop_border();
                state.push_border(glyph, style);
                let output = render(state);
                state.pop_border();
                state.restore_border(top);
                output
            });
        }

        /// Runs `body` (without holding the lock) with an extra permanent border.
        pub(super) fn with_extra_border<R>(
            &self,
            glyph: BorderGlyph,
            style: &Style,
            body: impl FnOnce() -> R,
        ) -> R {
            self.lock_state().push_border(glyph, style);
            let result = body();
            self.lock_state().pop_border();
            result
        }

        pub(super) fn with_optional_indent<R>(
            &self,
            with_indent: bool,
            body: impl FnOnce() -> R,
        ) -> R {
            if with_indent {
                self.state.do_with_indent(body)
            } else {
                body()
            }
        }
    }
}

mod block {
    use super::*;

    impl Stream {
        /// Title, body between borders, then the title again as the footer. Nothing is
        /// left on the border stack afterwards.
        ///
        /// # Errors
        ///
        /// Whatever `body` returns.
        pub fn log_block<E>(
            &self,
            title: &str,
            options: &LogBlockOptions,
            body: impl FnOnce() -> Result<(), E>,
        ) -> Result<(), E> {
            let style = options.resolved_style();
            let render_title = |state: &mut StreamState| {
                let line = format!("{}\n", state.format_with_style(&style, title));
                state.process_text(&line)
            };

            let mut section = None;
            self.emit(|state| {
                let mut output = state.take_optional_ln();
                if let Some((id, marker)) = open_collapsible_section(state, title) {
                    output.push_str(&marker);
                    section = Some(id);
                }
                output
            });

            self.emit_with_extra_border(BorderGlyph::DownAndRight, &style, render_title);

            let result = self.with_extra_border(BorderGlyph::Vertical, &style, || {
                self.with_optional_indent(options.with_indent, body)
            });

            self.state.disable_optional_ln();

            self.emit_with_extra_border(BorderGlyph::UpAndRight, &style, render_title);

            self.emit(|state| {
                let output = match &section {
                    Some(id) => close_collapsible_section(state, id),
                    None => String::new(),
                };
                if !options.without_optional_ln {
                    state.optional_ln.arm();
                }
                output
            });

            result
        }
    }
}

mod inline {
    use super::*;

    impl Stream {
        /// `message ...` on one line, then the body, then the elapsed time (and `FAILED`
        /// when the body fails) at the end of the line.
        ///
        /// # Errors
        ///
        /// Whatever `body` returns.
        pub fn log_process_inline<E>(
            &self,
            message: &str,
            options: &LogProcessInlineOptions,
            body: impl FnOnce() -> Result<(), E>,
        ) -> Result<(), E> {
            let style = options.resolved_style();

            let reserved = 1 + PROGRESS_DOTS.len() + reserved_elapsed_time_width();
            let max_width =
                self.state.content_width() - isize::try_from(reserved).unwrap_or(isize::MAX);
            let message = match usize::try_from(max_width) {
                Ok(max_width) if max_width >= 1 => {
                    if width_of(message) > isize::try_from(max_width).unwrap_or(isize::MAX) {
                        truncate_to_width(message, max_width - 1)
                    } else {
                        message
                    }
                }
                _ => "",
            };

            self.format_and_log(
                &style,
                &format!("{message} {PROGRESS_DOTS}"),
                FitMode::OneShot,
            );

            let started_at = Instant::now();
            let result = self.state.do_with_indent(body);
            let elapsed = ElapsedTime::from(started_at.elapsed());

            let (result_style, result_text) = match &result {
                Ok(()) => (style, format!(" ({elapsed})\n")),
                Err(_) => (fail_style(), format!(" ({elapsed}) FAILED\n")),
            };
            self.format_and_log(&result_style, &result_text, FitMode::OneShot);

            result
        }
    }
}

mod process {
    use super::*;

    impl Stream {
        /// Start, body, optional info sections, then end or fail depending on what the
        /// body returns.
        ///
        /// # Errors
        ///
        /// Whatever `body` returns.
        pub fn log_process<E: Display>(
            &self,
            message: &str,
            options: &LogProcessOptions,
            body: impl FnOnce() -> Result<(), E>,
            info_section: Option<Box<dyn FnOnce(&dyn Display) + '_>>,
            success_info_section: Option<Box<dyn FnOnce() + '_>>,
        ) -> Result<(), E> {
            let style = options.resolved_style();

            self.log_process_start(message, &style);

            let result = self.with_optional_indent(options.with_indent, body);

            self.state.disable_optional_ln();

            match &result {
                Err(error) => {
                    if let Some(info_section) = info_section {
                        self.log_info_section(&style, options.with_indent, || {
                            info_section(error);
                        });
                    }
                    self.log_process_fail(options);
                }
                Ok(()) => {
                    if let Some(success_info_section) = success_info_section {
                        self.log_info_section(
                            &style,
                            options.with_indent,
                            success_info_section,
                        );
                    }
                    self.log_process_end(options);
                }
            }

            result
        }

        /// Renders the header and pushes the permanent border and the process.
        pub fn log_process_start(&self, message: &str, style: &Style) {
            let mut section = None;
            self.emit(|state| {
                let mut output = state.take_optional_ln();
                if let Some((id, marker)) = open_collapsible_section(state, message) {
                    output.push_str(&marker);
                    section = Some(id);
                }
                output
            });

            self.emit_with_extra_border(BorderGlyph::DownAndRight, style, |state| {
                render_title_line(state, message, style)
            });

            let mut state = self.lock_state();
            state.push_border(BorderGlyph::Vertical, style);
            state.active_processes.push(ProcessDescriptor {
                started_at: Instant::now(),
                message: message.to_string(),
                section_id: section,
            });
            tracing::debug!(
                message = "process started",
                process = message,
                depth = state.active_processes.len()
            );
        }

        /// Marks an intermediate step with `├`. The process stays active.
        pub fn log_process_step_end(&self, message: &str, style: &Style) {
            tracing::debug!(message = "process step ended", step = message);
            self.emit_with_replaced_top_border(BorderGlyph::VerticalAndRight, style, |state| {
                render_title_line(state, message, style)
            });
        }

        /// `Info` header with `├`, then `body` with the top border replaced by `│`.
        fn log_info_section(&self, style: &Style, with_indent: bool, body: impl FnOnce()) {
            self.emit_with_replaced_top_border(BorderGlyph::VerticalAndRight, style, |state| {
                render_title_line(state, INFO_SECTION_TITLE, style)
            });

            let top = {
                let mut state = self.lock_state();
                let top = state.pop_border();
                state.push_border(BorderGlyph::Vertical, style);
                top
            };
            self.with_optional_indent(with_indent, body);
            let mut state = self.lock_state();
            state.pop_border();
            state.restore_border(top);
        }

        pub fn log_process_end(&self, options: &LogProcessOptions) {
            self.log_process_footer(options, false);
        }

        pub fn log_process_fail(&self, options: &LogProcessOptions) {
            self.log_process_footer(options, true);
        }

        /// Pops the border and the process, and renders the footer. Does nothing when
        /// there is no active process (eg: the state was reset while it ran).
        fn log_process_footer(&self, options: &LogProcessOptions, is_fail: bool) {
            let style = options.resolved_style();

            self.emit(|state| {
                state.pop_border();

                let Some(process) = state.active_processes.pop() else {
                    return String::new();
                };

                let elapsed = ElapsedTime::from(process.started_at.elapsed());
                tracing::debug!(
                    message = "process ended",
                    process = %process.message,
                    is_fail,
                    %elapsed
                );

                state.optional_ln.disarm();

                let mut output = String::new();

                if !state.modes.is_muted {
                    let time_part = match (options.without_elapsed_time, is_fail) {
                        (false, false) => format!(" ({elapsed})"),
                        (false, true) => format!(" ({elapsed}) FAILED"),
                        (true, false) => String::new(),
                        (true, true) => " FAILED".to_string(),
                    };
                    let right_style = if is_fail { fail_style() } else { style.clone() };

                    state.push_border(BorderGlyph::UpAndRight, &style);
                    state.without_indent(|state| {
                        let left = prepare_left_part(
                            state,
                            &process.message,
                            &right_style,
                            &[time_part.as_str()],
                        );
                        output.push_str(&state.process_text(&left));
                        output.push_str(&state.format_and_fit(
                            &right_style,
                            &format!("{time_part}\n"),
                            FitMode::OneShot,
                        ));
                    });
                    state.pop_border();
                }

                if let Some(id) = &process.section_id {
                    let marker = close_collapsible_section(state, id);
                    if !state.modes.is_muted {
                        output.push_str(&marker);
                    }
                }

                if !options.without_optional_ln {
                    state.optional_ln.arm();
                }

                output
            });
        }

        /// Ends every active process, innermost first.
        pub fn end_all_active_processes(&self) {
            while !self.lock_state().active_processes.is_empty() {
                self.log_process_end(&LogProcessOptions::default());
            }
        }
    }
}
