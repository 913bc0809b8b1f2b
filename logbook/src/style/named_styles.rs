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

//! The fixed named styles that the logging verbs use.

use super::{AnsiBasicColor, Style};

/// Used by `log_highlight*` verbs.
#[must_use]
pub fn highlight_style() -> Style { Style::Bold }

/// Used by `log_details*` verbs.
#[must_use]
pub fn details_style() -> Style { Style::fg(AnsiBasicColor::Blue).and(Style::Bold) }

/// Used for failed process footers and the `FAILED` marker.
#[must_use]
pub fn fail_style() -> Style { Style::fg(AnsiBasicColor::Red).and(Style::Bold) }

#[must_use]
pub fn none_style() -> Style { Style::None }
