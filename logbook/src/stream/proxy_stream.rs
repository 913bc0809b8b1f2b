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

use std::io::{self, Write};

use smallvec::SmallVec;

use crate::{FitMode, Stream, Style};

/// [`Write`] adapter that pipes arbitrary bytes (eg: the output of a child process)
/// through the formatting pipeline of a [`Stream`]:
///
/// - While the stream is muted, writes are swallowed (and reported as written).
/// - With proxy formatting disabled, bytes go to the sink untouched.
/// - Otherwise the bytes are decoded as UTF-8, styled, fitted with the streaming fitter
///   of the state, and given the service part of each line. A multi byte character
///   that is split across two writes is held back until it is complete.
///
/// Sink failures are returned as [`io::Error`]s.
#[derive(Debug, Clone)]
pub struct ProxyStream {
    stream: Stream,
    style: Style,
    utf8_carry: SmallVec<[u8; 4]>,
}

impl ProxyStream {
    #[must_use]
    pub fn new(stream: Stream, style: Style) -> Self {
        Self {
            stream,
            style,
            utf8_carry: SmallVec::new(),
        }
    }

    /// Prepends the bytes held back by the previous write and decodes as much as
    /// possible. An incomplete character at the end is held back again. Invalid bytes
    /// become `U+FFFD`.
    fn decode(&mut self, buf: &[u8]) -> String {
        let mut bytes: Vec<u8> = self.utf8_carry.drain(..).collect();
        bytes.extend_from_slice(buf);

        let mut acc = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    acc.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, after_valid) = rest.split_at(error.valid_up_to());
                    // Never lossy, `valid` holds only the checked prefix.
                    acc.push_str(&String::from_utf8_lossy(valid));
                    match error.error_len() {
                        None => {
                            self.utf8_carry.extend_from_slice(after_valid);
                            break;
                        }
                        Some(invalid_len) => {
                            acc.push(char::REPLACEMENT_CHARACTER);
                            rest = &after_valid[invalid_len..];
                        }
                    }
                }
            }
        }
        acc
    }
}

impl Write for ProxyStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let modes = self.stream.state.modes();

        if modes.is_muted {
            return Ok(buf.len());
        }

        if !modes.is_proxy_stream_data_formatting_enabled {
            self.stream.sink.write_bytes(buf).map_err(io::Error::other)?;
            return Ok(buf.len());
        }

        let text = self.decode(buf);
        if !text.is_empty() {
            self.stream
                .try_format_and_log(&self.style, &text, FitMode::Streaming)
                .map_err(io::Error::other)?;
        }

        Ok(buf.len())
    }

    /// Emits the fragment that the streaming fitter holds back, then flushes the sink.
    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush_fitter().map_err(io::Error::other)?;
        self.stream.sink.flush().map_err(io::Error::other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BorderGlyph, LogSink, SharedStreamState, SinkMock, StreamModes, assert_eq2};

    fn proxy_with_width(width: usize) -> (ProxyStream, SinkMock) {
        let (sink, mock) = LogSink::new_mock();
        let stream = Stream::new(sink, SharedStreamState::new(width, StreamModes::default()));
        (stream.proxy(), mock)
    }

    #[test]
    fn test_proxy_adds_service_and_wraps() {
        let (mut proxy, mock) = proxy_with_width(12);
        proxy
            .stream
            .lock_state()
            .push_border(BorderGlyph::Vertical, &Style::None);

        write!(proxy, "foo bar ").unwrap();
        writeln!(proxy, "data").unwrap();
        assert_eq2!(
            mock.get_copy_of_buffer_as_string(),
            "│ foo bar  ↵\n│ data\n"
        );
    }

    #[test]
    fn test_proxy_holds_back_split_utf8() {
        let (mut proxy, mock) = proxy_with_width(40);
        let bytes = "héllo\n".as_bytes();
        assert_eq2!(proxy.write(&bytes[..2]).unwrap(), 2);
        assert_eq2!(proxy.write(&bytes[2..]).unwrap(), bytes.len() - 2);
        assert_eq2!(mock.get_copy_of_buffer_as_string(), "héllo\n");
    }

    #[test]
    fn test_proxy_replaces_invalid_utf8() {
        let (mut proxy, mock) = proxy_with_width(40);
        proxy.write_all(b"a\xffb\n").unwrap();
        assert_eq2!(mock.get_copy_of_buffer_as_string(), "a\u{FFFD}b\n");
    }

    #[test]
    fn test_proxy_flush_emits_incomplete_line() {
        let (mut proxy, mock) = proxy_with_width(40);
        proxy.write_all(b"no newline").unwrap();
        assert_eq2!(mock.get_copy_of_buffer_as_string(), "");
        proxy.flush().unwrap();
        assert_eq2!(mock.get_copy_of_buffer_as_string(), "no newline");
    }

    #[test]
    fn test_proxy_muted_and_raw() {
        let (mut proxy, mock) = proxy_with_width(5);
        proxy.stream.state.mute();
        assert_eq2!(proxy.write(b"hidden").unwrap(), 6);
        assert_eq2!(mock.get_copy_of_buffer_as_string(), "");

        proxy.stream.state.unmute();
        proxy.stream.state.disable_proxy_stream_data_formatting();
        proxy.write_all(b"raw text that is long\n").unwrap();
        assert_eq2!(
            mock.get_copy_of_buffer_as_string(),
            "raw text that is long\n"
        );
    }
}
