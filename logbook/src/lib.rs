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

//! # r3bl_logbook
//!
//! A terminal output renderer for command line tools. It turns a stream of log calls
//! into width aware, color correct output, with a visual hierarchy of nested processes
//! and blocks drawn with box drawing borders.
//!
//! ```text
//! ┌ build
//! │ compiling 3 crates
//! │ ┌ link
//! │ └ link (0.41 seconds)
//! └ build (1.92 seconds)
//! ```
//!
//! The main pieces, leaf first:
//!
//! 1. [`fitter`]: ANSI aware greedy word wrap ([`FitterState`], [`mark_line`]). Control
//!    sequences have zero width, and color state survives a forced wrap.
//! 2. [`stream`]: per sink state ([`StreamState`]) shared behind a lock
//!    ([`SharedStreamState`]). It tracks the width, indent, tag, prefix, border stack and
//!    optional newline, and renders the service part of each line.
//! 3. [`process`]: lifecycle of blocks and processes ([`LogBlock`], [`LogProcess`],
//!    [`LogProcessInline`]).
//! 4. [`logger`]: level gating and routing ([`Level`], [`LevelManager`]) composed into
//!    the [`Logger`] facade. A lazily created process wide [`default_logger()`] exists,
//!    but any number of independent loggers can be created.
//!
//! ```
//! use r3bl_logbook::{LogSink, Logger};
//!
//! let (out, out_mock) = LogSink::new_mock();
//! let (err, _err_mock) = LogSink::new_mock();
//! let logger = Logger::new(out, err);
//! logger.streams().disable_style();
//! logger.streams().disable_gitlab_collapsible_sections();
//!
//! logger.log_process("build").run(|| {
//!     logger.info().log_ln("compiling");
//! });
//!
//! let output = out_mock.get_copy_of_buffer_as_string();
//! assert!(output.starts_with("┌ build\n"));
//! ```

// https://github.com/rust-lang/rust-clippy
// https://rust-lang.github.io/rust-clippy/master/index.html
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach sources.
pub mod common;
pub mod decl_macros;
pub mod fitter;
pub mod level;
pub mod logger;
pub mod process;
pub mod sink;
pub mod stream;
pub mod style;

// Re-export.
pub use common::*;
pub use fitter::*;
pub use level::*;
pub use logger::*;
pub use process::*;
pub use sink::*;
pub use stream::*;
pub use style::*;
