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

//! Options for the structured operations. They are plain values: build one with the
//! consuming methods (or struct update syntax), hand it to a builder, and it does not
//! change after that.
//!
//! ```
//! use r3bl_logbook::{LogProcessOptions, Style};
//!
//! let options = LogProcessOptions::default()
//!     .with_indent()
//!     .without_elapsed_time()
//!     .style(Style::Bold);
//! assert!(options.with_indent);
//! assert_eq!(options.style, Some(Style::Bold));
//! ```

use crate::Style;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LogBlockOptions {
    /// Skip the body too (not only the rendering) when the level is not accepted.
    pub disable_if_level_not_accepted: bool,
    /// Run the body, but render nothing.
    pub mute: bool,
    pub with_indent: bool,
    pub without_optional_ln: bool,
    /// When [`None`], the default style of the level is used.
    pub style: Option<Style>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LogProcessInlineOptions {
    pub disable_if_level_not_accepted: bool,
    pub mute: bool,
    pub style: Option<Style>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct LogProcessOptions {
    pub disable_if_level_not_accepted: bool,
    pub mute: bool,
    pub with_indent: bool,
    pub without_optional_ln: bool,
    /// Leaves the `(N.NN seconds)` part out of the footer.
    pub without_elapsed_time: bool,
    pub style: Option<Style>,
}

/// Consuming setters shared by all the option types.
macro_rules! impl_common_setters {
    ($type:ty) => {
        impl $type {
            #[must_use]
            pub fn disable_if_level_not_accepted(mut self) -> Self {
                self.disable_if_level_not_accepted = true;
                self
            }

            #[must_use]
            pub fn mute(mut self) -> Self {
                self.mute = true;
                self
            }

            #[must_use]
            pub fn style(mut self, style: Style) -> Self {
                self.style = Some(style);
                self
            }

            /// Fills in the style only if none was set explicitly.
            #[must_use]
            pub fn or_style(mut self, style: &Style) -> Self {
                if self.style.is_none() {
                    self.style = Some(style.clone());
                }
                self
            }

            #[must_use]
            pub fn resolved_style(&self) -> Style { self.style.clone().unwrap_or_default() }
        }
    };
}

impl_common_setters!(LogBlockOptions);
impl_common_setters!(LogProcessInlineOptions);
impl_common_setters!(LogProcessOptions);

impl LogBlockOptions {
    #[must_use]
    pub fn with_indent(mut self) -> Self {
        self.with_indent = true;
        self
    }

    #[must_use]
    pub fn without_optional_ln(mut self) -> Self {
        self.without_optional_ln = true;
        self
    }
}

impl LogProcessOptions {
    #[must_use]
    pub fn with_indent(mut self) -> Self {
        self.with_indent = true;
        self
    }

    #[must_use]
    pub fn without_optional_ln(mut self) -> Self {
        self.without_optional_ln = true;
        self
    }

    #[must_use]
    pub fn without_elapsed_time(mut self) -> Self {
        self.without_elapsed_time = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_or_style_keeps_explicit_style() {
        let options = LogBlockOptions::default().style(Style::Bold);
        assert_eq2!(options.or_style(&Style::None).style, Some(Style::Bold));

        let options = LogProcessInlineOptions::default().or_style(&Style::Bold);
        assert_eq2!(options.resolved_style(), Style::Bold);
        assert_eq2!(LogProcessOptions::default().resolved_style(), Style::None);
    }

    #[test]
    fn test_setters() {
        let options = LogBlockOptions::default()
            .disable_if_level_not_accepted()
            .mute()
            .with_indent()
            .without_optional_ln();
        assert_eq2!(
            options,
            LogBlockOptions {
                disable_if_level_not_accepted: true,
                mute: true,
                with_indent: true,
                without_optional_ln: true,
                style: None,
            }
        );
    }
}
