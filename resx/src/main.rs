// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Entry point: bootstrap-layer CLI parsing (`resx_bootstrap`), then
//! hand off to [`resx::presentation`] to drive the resource service
//! façade and map its result onto a Unix exit code (§7).

use resx::presentation;
use resx_bootstrap::{bootstrap_cli, result_to_exit_code};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = match bootstrap_cli() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("resx: {err}");
            return ExitCode::from(64); // EX_USAGE
        }
    };

    resx::infrastructure::logging::init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("resx: failed to start async runtime: {err}");
            return ExitCode::from(70); // EX_SOFTWARE
        }
    };

    result_to_exit_code(runtime.block_on(presentation::run(cli)))
}
