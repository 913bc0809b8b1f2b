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

//! SGR (select graphic rendition) escape codes.
//!
//! More info:
//! - <https://notes.burke.libbey.me/ansi-escape-codes/>
//! - <https://en.wikipedia.org/wiki/ANSI_escape_code>

use std::fmt::{Display, Formatter, Result, Write};

use crate::ok;

pub const CSI: &str = "\x1b[";
pub const SGR: &str = "m";
pub const ESC: char = '\x1b';

/// `ESC[0m`, emitted after every styled run and before every forced wrap of a colored
/// line.
pub const RESET_SEQUENCE: &str = "\x1b[0m";

/// The eight basic terminal colors. Foreground codes are `30..=37`, background codes are
/// `40..=47`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnsiBasicColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl AnsiBasicColor {
    #[rustfmt::skip]
    #[must_use]
    pub fn offset(self) -> u8 {
        match self {
            AnsiBasicColor::Black   => 0,
            AnsiBasicColor::Red     => 1,
            AnsiBasicColor::Green   => 2,
            AnsiBasicColor::Yellow  => 3,
            AnsiBasicColor::Blue    => 4,
            AnsiBasicColor::Magenta => 5,
            AnsiBasicColor::Cyan    => 6,
            AnsiBasicColor::White   => 7,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SgrCode {
    Reset,
    Bold,
    Dim,
    Italic,
    Underline,
    Invert,
    Strikethrough,
    Foreground(AnsiBasicColor),
    Background(AnsiBasicColor),
    ForegroundAnsi256(u8),
    BackgroundAnsi256(u8),
    ForegroundRGB(u8, u8, u8),
    BackgroundRGB(u8, u8, u8),
}

impl SgrCode {
    /// Writes only the parameter part (eg: `38;5;150`) without the `CSI` and `m`. Lets
    /// multiple codes be combined into one escape sequence, eg: `ESC[34;1m`.
    ///
    /// # Errors
    ///
    /// Only if the underlying [Write] fails.
    #[rustfmt::skip]
    pub fn write_params(&self, buf: &mut impl Write) -> Result {
        match *self {
            SgrCode::Reset                     => buf.write_str("0"),
            SgrCode::Bold                      => buf.write_str("1"),
            SgrCode::Dim                       => buf.write_str("2"),
            SgrCode::Italic                    => buf.write_str("3"),
            SgrCode::Underline                 => buf.write_str("4"),
            SgrCode::Invert                    => buf.write_str("7"),
            SgrCode::Strikethrough             => buf.write_str("9"),
            SgrCode::Foreground(color)         => write!(buf, "{}", 30 + color.offset()),
            SgrCode::Background(color)         => write!(buf, "{}", 40 + color.offset()),
            SgrCode::ForegroundAnsi256(index)  => write!(buf, "38;5;{index}"),
            SgrCode::BackgroundAnsi256(index)  => write!(buf, "48;5;{index}"),
            SgrCode::ForegroundRGB(r, g, b)    => write!(buf, "38;2;{r};{g};{b}"),
            SgrCode::BackgroundRGB(r, g, b)    => write!(buf, "48;2;{r};{g};{b}"),
        }
    }
}

impl Display for SgrCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(CSI)?;
        self.write_params(f)?;
        f.write_str(SGR)?;
        ok!()
    }
}

/// Renders `ESC[` + the given parameter codes joined with `;` + `m`. Returns an empty
/// string when there are no codes.
#[must_use]
pub fn sgr_sequence_from_params<T: AsRef<str>>(params: &[T]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let mut acc = String::from(CSI);
    for (index, param) in params.iter().enumerate() {
        if index > 0 {
            acc.push(';');
        }
        acc.push_str(param.as_ref());
    }
    acc.push_str(SGR);
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_eq2;

    #[test]
    fn test_reset_matches_constant() {
        assert_eq2!(SgrCode::Reset.to_string(), RESET_SEQUENCE);
    }

    #[test]
    fn test_basic_colors() {
        assert_eq2!(
            SgrCode::Foreground(AnsiBasicColor::Black).to_string(),
            "\x1b[30m"
        );
        assert_eq2!(
            SgrCode::Background(AnsiBasicColor::White).to_string(),
            "\x1b[47m"
        );
    }

    #[test]
    fn test_extended_colors() {
        assert_eq2!(SgrCode::ForegroundAnsi256(150).to_string(), "\x1b[38;5;150m");
        assert_eq2!(
            SgrCode::BackgroundRGB(1, 2, 3).to_string(),
            "\x1b[48;2;1;2;3m"
        );
    }

    #[test]
    fn test_sequence_from_params() {
        assert_eq2!(sgr_sequence_from_params(&["34", "1"]), "\x1b[34;1m");
        assert_eq2!(sgr_sequence_from_params::<&str>(&[]), "");
    }
}
