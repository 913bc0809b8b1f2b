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

use super::{AnsiBasicColor, RESET_SEQUENCE, SgrCode, sgr_sequence_from_params};

pub type InlineVecSgrCodes = SmallVec<[SgrCode; 4]>;

/// Anything that can decorate a run of text with escape sequences.
pub trait Colorize {
    fn colorize(&self, text: &str) -> String;
}

/// How a piece of text is painted. All the variants render into a single
/// `ESC[<params>m` opening sequence followed by the text and a [`RESET_SEQUENCE`].
///
/// ```
/// use r3bl_logbook::{AnsiBasicColor, Colorize, Style};
///
/// let style = Style::fg(AnsiBasicColor::Blue).and(Style::Bold);
/// assert_eq!(style.colorize("hi"), "\x1b[34;1mhi\x1b[0m");
/// assert_eq!(Style::None.colorize("hi"), "hi");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Style {
    #[default]
    None,
    Bold,
    Colored(InlineVecSgrCodes),
    Composite(Vec<Style>),
}

mod constructors {
    use super::*;

    impl Style {
        #[must_use]
        pub fn fg(color: AnsiBasicColor) -> Self {
            Self::Colored(smallvec::smallvec![SgrCode::Foreground(color)])
        }

        #[must_use]
        pub fn bg(color: AnsiBasicColor) -> Self {
            Self::Colored(smallvec::smallvec![SgrCode::Background(color)])
        }

        #[must_use]
        pub fn colored(codes: impl IntoIterator<Item = SgrCode>) -> Self {
            Self::Colored(codes.into_iter().collect())
        }

        /// Combines two styles. The codes of `self` come first in the rendered
        /// sequence.
        #[must_use]
        pub fn and(self, other: Style) -> Self {
            match self {
                Style::None => other,
                Style::Composite(mut styles) => {
                    styles.push(other);
                    Style::Composite(styles)
                }
                it => Style::Composite(vec![it, other]),
            }
        }
    }
}

mod render {
    use super::*;

    impl Style {
        /// Parameter codes of this style in render order, eg: `["34", "1"]`.
        #[must_use]
        pub fn params(&self) -> SmallVec<[String; 4]> {
            let mut acc = SmallVec::new();
            self.collect_params(&mut acc);
            acc
        }

        fn collect_params(&self, acc: &mut SmallVec<[String; 4]>) {
            match self {
                Style::None => {}
                Style::Bold => acc.push(SgrCode::Bold.param_string()),
                Style::Colored(codes) => {
                    acc.extend(codes.iter().map(SgrCode::param_string));
                }
                Style::Composite(styles) => {
                    for style in styles {
                        style.collect_params(acc);
                    }
                }
            }
        }

        /// A style that emits no escape sequences at all.
        #[must_use]
        pub fn is_none(&self) -> bool { self.params().is_empty() }
    }

    impl SgrCode {
        fn param_string(&self) -> String {
            let mut acc = String::new();
            // Writing into a String can't fail.
            let _ = self.write_params(&mut acc);
            acc
        }
    }

    impl Colorize for Style {
        fn colorize(&self, text: &str) -> String {
            let params = self.params();
            if params.is_empty() || text.is_empty() {
                return text.to_string();
            }
            let mut acc = sgr_sequence_from_params(&params);
            acc.push_str(text);
            acc.push_str(RESET_SEQUENCE);
            acc
        }
    }
}

/// Colorizes each non empty line of `text` separately, so that every line carries its
/// own opening and reset codes and empty lines stay empty.
#[must_use]
pub fn colorize_lines(style: &impl Colorize, text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                style.colorize(line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_none_is_identity() {
        assert_eq2!(Style::None.colorize("text"), "text");
        assert!(Style::None.is_none());
        assert!(Style::Composite(vec![Style::None]).is_none());
    }

    #[test]
    fn test_bold() {
        assert_eq2!(Style::Bold.colorize("text"), "\x1b[1mtext\x1b[0m");
    }

    #[test]
    fn test_composite_order() {
        let style = Style::fg(AnsiBasicColor::Red).and(Style::Bold);
        assert_eq2!(style.colorize("x"), "\x1b[31;1mx\x1b[0m");
        let style = Style::Bold.and(Style::fg(AnsiBasicColor::Red));
        assert_eq2!(style.colorize("x"), "\x1b[1;31mx\x1b[0m");
    }

    #[test]
    fn test_colored_keeps_code_order() {
        let style = Style::colored([SgrCode::Foreground(AnsiBasicColor::Red), SgrCode::Bold]);
        assert_eq2!(style.colorize("x"), "\x1b[31;1mx\x1b[0m");
        assert!(!style.is_none());
    }

    #[test]
    fn test_empty_text_is_not_wrapped() {
        assert_eq2!(Style::Bold.colorize(""), "");
    }

    #[test]
    fn test_colorize_lines() {
        assert_eq2!(
            colorize_lines(&Style::Bold, "a\n\nb\n"),
            "\x1b[1ma\x1b[0m\n\n\x1b[1mb\x1b[0m\n"
        );
    }
}
