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

//! Renders a small process tree. It is the binary under test for the stdout and stderr
//! routing tests in `tests/demo_bin_routing.rs`, since there is no easy way to capture
//! the real stdout and stderr without spawning a new process.
//!
//! Arguments (any combination):
//! - `stdout`: render the process tree into stdout.
//! - `stderr`: render warnings and errors, which are routed to stderr.
//! - `trace`: print the diagnostics of the renderer itself to stderr.
//! - `plain`: disable styling.

use std::io::Write;

use miette::IntoDiagnostic;
use r3bl_logbook::{LogProcessOptions, Style, default_logger, fail_style};
use tracing_core::LevelFilter;

fn main() -> miette::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let has_arg = |name: &str| args.iter().any(|arg| arg == name);

    if has_arg("trace") {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(LevelFilter::DEBUG)
            .with_ansi(false)
            .init();
    }

    let logger = default_logger();
    if has_arg("plain") {
        logger.streams().disable_style();
    }

    if has_arg("stdout") {
        logger
            .log_process("build")
            .options(LogProcessOptions::default().with_indent())
            .try_run(|| -> miette::Result<()> {
                logger.log_ln("compiling 3 crates");
                logger.log_process_inline("linking").run(|| {});

                let mut out = logger.out_stream();
                writeln!(out, "piped output of a child process").into_diagnostic()?;
                out.flush().into_diagnostic()?;

                logger.log_block("summary").run(|| {
                    logger.log_details_ln("3 crates, 0 warnings");
                });
                Ok(())
            })?;
    }

    if has_arg("stderr") {
        logger.warn().log_ln("deprecated flag");
        logger
            .error()
            .log_with_custom_style_ln(&fail_style(), "build failed");
        logger.error().log_with_custom_style_ln(&Style::None, "see log above");
    }

    Ok(())
}
